use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::core::error::AnalysisError;

/// Number of ordered classes produced by the classifier (1 = most negative, 5 = most positive).
pub const CLASS_COUNT: usize = 5;

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 5.0;

/// Allowed drift of a distribution's sum away from 1.0.
pub const DISTRIBUTION_TOLERANCE: f64 = 1e-3;

/// Validated probability distribution over the five ordinal classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct ClassProbabilityVector([f64; CLASS_COUNT]);

impl ClassProbabilityVector {
    pub fn new(probs: &[f64]) -> Result<Self, AnalysisError> {
        if probs.len() != CLASS_COUNT {
            return Err(AnalysisError::invalid_distribution(format!(
                "expected {CLASS_COUNT} class probabilities, got {}",
                probs.len()
            )));
        }

        if let Some((idx, p)) = probs
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || **p < 0.0)
        {
            return Err(AnalysisError::invalid_distribution(format!(
                "class {} has invalid probability {p}",
                idx + 1
            )));
        }

        let sum: f64 = probs.iter().sum();
        if (sum - 1.0).abs() > DISTRIBUTION_TOLERANCE {
            return Err(AnalysisError::invalid_distribution(format!(
                "probabilities sum to {sum:.6}, expected 1.0"
            )));
        }

        let mut values = [0.0; CLASS_COUNT];
        values.copy_from_slice(probs);
        Ok(Self(values))
    }

    /// Expected class label under this distribution, kept inside [1.0, 5.0].
    pub fn expected_class(&self) -> f64 {
        let expected: f64 = self
            .0
            .iter()
            .enumerate()
            .map(|(idx, p)| (idx + 1) as f64 * p)
            .sum();
        expected.clamp(MIN_SCORE, MAX_SCORE)
    }
}

impl TryFrom<Vec<f64>> for ClassProbabilityVector {
    type Error = AnalysisError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ClassProbabilityVector> for Vec<f64> {
    fn from(value: ClassProbabilityVector) -> Self {
        value.0.to_vec()
    }
}

/// One segment of a document together with the raw classifier output for it.
///
/// The probabilities are kept unvalidated so a malformed classifier response
/// can be reported against the unit it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisUnit {
    pub index: usize,
    pub text: String,
    pub probabilities: Vec<f64>,
}

impl AnalysisUnit {
    pub fn new(index: usize, text: impl Into<String>, probabilities: Vec<f64>) -> Self {
        Self {
            index,
            text: text.into(),
            probabilities,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SentimentCategory {
    Negative,
    Neutral,
    Positive,
}

impl SentimentCategory {
    /// Caller-facing label; neutral documents are presented as "suggestive".
    pub fn label(&self) -> &'static str {
        match self {
            SentimentCategory::Negative => "negative",
            SentimentCategory::Neutral => "suggestive",
            SentimentCategory::Positive => "positive",
        }
    }
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SentimentCategory::Negative => "Negative",
            SentimentCategory::Neutral => "Neutral",
            SentimentCategory::Positive => "Positive",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreVerdict {
    pub category: SentimentCategory,
    #[serde(serialize_with = "serialize_two_decimals")]
    pub continuous_score: f64,
    pub intensity: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitVerdict {
    pub index: usize,
    pub text: String,
    #[serde(flatten)]
    pub verdict: ScoreVerdict,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkippedUnit {
    pub index: usize,
    pub text: String,
    pub reason: String,
}

/// Document-level verdict plus the per-unit detail it was derived from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVerdict {
    #[serde(flatten)]
    pub verdict: ScoreVerdict,
    /// Set when no unit could be scored; the verdict is then the fixed sentinel.
    pub no_data: bool,
    pub units: Vec<UnitVerdict>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedUnit>,
}

impl DocumentVerdict {
    pub fn category(&self) -> SentimentCategory {
        self.verdict.category
    }

    pub fn continuous_score(&self) -> f64 {
        self.verdict.continuous_score
    }

    pub fn intensity(&self) -> u8 {
        self.verdict.intensity
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Neutral,
    Negative,
}

impl Polarity {
    /// Buckets a lexicon compound score; both thresholds are inclusive.
    pub fn from_compound(compound: f64, positive_threshold: f64, negative_threshold: f64) -> Self {
        if compound >= positive_threshold {
            Polarity::Positive
        } else if compound <= negative_threshold {
            Polarity::Negative
        } else {
            Polarity::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Neutral => "neutral",
            Polarity::Negative => "negative",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional restriction of a keyword ranking to one polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SentimentFilter {
    #[default]
    All,
    Only(Polarity),
}

impl SentimentFilter {
    pub fn matches(&self, polarity: Polarity) -> bool {
        match self {
            SentimentFilter::All => true,
            SentimentFilter::Only(wanted) => *wanted == polarity,
        }
    }
}

impl FromStr for SentimentFilter {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "all" => Ok(SentimentFilter::All),
            "positive" => Ok(SentimentFilter::Only(Polarity::Positive)),
            "neutral" | "suggestive" => Ok(SentimentFilter::Only(Polarity::Neutral)),
            "negative" => Ok(SentimentFilter::Only(Polarity::Negative)),
            other => Err(AnalysisError::UnknownFilter(other.to_string())),
        }
    }
}

impl fmt::Display for SentimentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentFilter::All => f.write_str("none"),
            SentimentFilter::Only(polarity) => f.write_str(polarity.as_str()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordEntry {
    pub term: String,
    pub frequency: usize,
    pub polarity: Polarity,
}

/// Keywords ordered by frequency (descending) then term (ascending).
///
/// Serializes as an ordered map `term -> {count, sentiment}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedKeywords {
    entries: Vec<KeywordEntry>,
}

impl RankedKeywords {
    pub fn new(entries: Vec<KeywordEntry>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeywordEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn terms(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.term.as_str()).collect()
    }

    pub fn get(&self, term: &str) -> Option<&KeywordEntry> {
        self.entries.iter().find(|e| e.term == term)
    }
}

#[derive(Serialize)]
struct KeywordCount {
    count: usize,
    sentiment: Polarity,
}

impl Serialize for RankedKeywords {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(
                &entry.term,
                &KeywordCount {
                    count: entry.frequency,
                    sentiment: entry.polarity,
                },
            )?;
        }
        map.end()
    }
}

/// Verdict for one source document, as handed to exporters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentReport {
    pub source: String,
    /// `negative`, `suggestive` or `positive`.
    pub label: String,
    #[serde(flatten)]
    pub verdict: DocumentVerdict,
}

impl DocumentReport {
    pub fn new(source: impl Into<String>, verdict: DocumentVerdict) -> Self {
        Self {
            source: source.into(),
            label: verdict.category().label().to_string(),
            verdict,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeywordReport {
    /// Document name, or a joined list of names for a combined corpus.
    pub source: String,
    pub sentiment: String,
    pub top_n: usize,
    pub keywords: RankedKeywords,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisReport {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<DocumentReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<KeywordReport>,
}

fn serialize_two_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 100.0).round() / 100.0)
}
