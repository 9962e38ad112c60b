use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Normalization constant used to squash a summed valence into [-1, 1].
const COMPOUND_ALPHA: f64 = 15.0;

/// Word-level polarity source.
pub trait PolarityLexicon: Send + Sync {
    /// Compound polarity of a single term, in [-1, 1]. Unknown terms are 0.
    fn polarity_of(&self, term: &str) -> Result<f64>;
}

/// Valence table on the [-4, 4] scale, turned into a compound score with
/// `v / sqrt(v² + 15)`.
#[derive(Debug, Clone, Default)]
pub struct ValenceLexicon {
    valences: HashMap<String, f64>,
}

impl ValenceLexicon {
    /// Small general-purpose table geared toward feedback and review text.
    pub fn builtin() -> Self {
        let valences = BUILTIN_VALENCES
            .iter()
            .map(|(word, valence)| (word.to_string(), *valence))
            .collect();
        Self { valences }
    }

    /// Loads a tab-separated lexicon (`token<TAB>mean valence[<TAB>...]`).
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read lexicon {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("failed to parse lexicon {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let mut valences = HashMap::new();
        for (line_no, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t');
            let (Some(token), Some(mean)) = (fields.next(), fields.next()) else {
                anyhow::bail!("line {}: expected 'token<TAB>valence'", line_no + 1);
            };
            let valence: f64 = mean
                .trim()
                .parse()
                .with_context(|| format!("line {}: bad valence '{mean}'", line_no + 1))?;
            valences.insert(token.trim().to_lowercase(), valence);
        }
        Ok(Self { valences })
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }

    pub fn valence(&self, term: &str) -> Option<f64> {
        self.valences.get(term).copied()
    }
}

impl PolarityLexicon for ValenceLexicon {
    fn polarity_of(&self, term: &str) -> Result<f64> {
        Ok(self
            .valence(&term.to_lowercase())
            .map(compound)
            .unwrap_or(0.0))
    }
}

pub fn compound(valence: f64) -> f64 {
    (valence / (valence * valence + COMPOUND_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

const BUILTIN_VALENCES: &[(&str, f64)] = &[
    ("excellent", 2.7),
    ("outstanding", 3.0),
    ("great", 3.1),
    ("good", 1.9),
    ("best", 3.2),
    ("better", 1.9),
    ("love", 3.2),
    ("like", 1.5),
    ("happy", 2.7),
    ("glad", 2.0),
    ("pleased", 1.9),
    ("satisfied", 1.8),
    ("helpful", 1.7),
    ("useful", 1.9),
    ("clear", 1.6),
    ("transparent", 1.3),
    ("fair", 1.3),
    ("efficient", 1.7),
    ("effective", 2.1),
    ("improve", 1.9),
    ("improved", 2.1),
    ("improvement", 2.0),
    ("benefit", 2.0),
    ("benefits", 1.9),
    ("support", 1.7),
    ("supportive", 2.1),
    ("welcome", 2.0),
    ("appreciate", 1.7),
    ("thank", 1.5),
    ("thanks", 1.9),
    ("positive", 2.6),
    ("success", 2.7),
    ("successful", 2.8),
    ("progress", 1.8),
    ("safe", 1.9),
    ("easy", 1.9),
    ("wonderful", 2.7),
    ("amazing", 2.8),
    ("fantastic", 2.6),
    ("nice", 1.8),
    ("agree", 1.5),
    ("encourage", 2.3),
    ("innovative", 1.9),
    ("strong", 2.3),
    ("trust", 2.3),
    ("valuable", 2.1),
    ("reasonable", 1.3),
    ("comprehensive", 1.5),
    ("bad", -2.5),
    ("worse", -2.1),
    ("worst", -3.1),
    ("poor", -2.1),
    ("terrible", -2.1),
    ("awful", -2.0),
    ("horrible", -2.5),
    ("useless", -1.8),
    ("hate", -2.7),
    ("dislike", -1.6),
    ("unhappy", -1.8),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("frustrated", -2.4),
    ("frustrating", -1.9),
    ("angry", -2.3),
    ("confusing", -1.3),
    ("confused", -1.3),
    ("unclear", -1.0),
    ("unfair", -2.1),
    ("problem", -1.7),
    ("problems", -1.7),
    ("issue", -0.6),
    ("issues", -0.5),
    ("concern", -1.0),
    ("concerns", -1.2),
    ("worried", -1.2),
    ("fail", -2.5),
    ("failed", -2.3),
    ("failure", -2.3),
    ("delay", -1.3),
    ("delays", -1.3),
    ("waste", -1.8),
    ("wasted", -2.2),
    ("expensive", -1.0),
    ("difficult", -1.5),
    ("slow", -0.8),
    ("badly", -2.1),
    ("mismanaged", -1.9),
    ("corrupt", -3.0),
    ("reject", -1.7),
    ("oppose", -1.3),
    ("against", -1.1),
    ("risk", -1.1),
    ("harm", -2.5),
    ("harmful", -2.6),
    ("damage", -2.2),
    ("lack", -1.3),
    ("missing", -1.2),
    ("ignored", -1.2),
    ("inadequate", -1.7),
    ("ineffective", -2.0),
    ("burden", -1.9),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_is_bounded_and_signed() {
        assert!(compound(3.1) > 0.6 && compound(3.1) < 1.0);
        assert!(compound(-2.5) < -0.5);
        assert_eq!(compound(0.0), 0.0);
        assert!(compound(1000.0) <= 1.0);
    }

    #[test]
    fn unknown_terms_are_neutral() -> Result<()> {
        let lexicon = ValenceLexicon::builtin();
        assert_eq!(lexicon.polarity_of("municipality")?, 0.0);
        assert!(lexicon.polarity_of("Excellent")? > 0.05);
        assert!(lexicon.polarity_of("useless")? < -0.05);
        Ok(())
    }

    #[test]
    fn parses_tab_separated_lexicon() -> Result<()> {
        let lexicon = ValenceLexicon::parse("# header\nsplendid\t2.8\t0.6\t[3, 3]\nmeh\t-0.4\n\n")?;
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.valence("splendid"), Some(2.8));
        assert_eq!(lexicon.valence("meh"), Some(-0.4));
        Ok(())
    }

    #[test]
    fn rejects_malformed_lexicon_line() {
        assert!(ValenceLexicon::parse("splendid 2.8").is_err());
        assert!(ValenceLexicon::parse("splendid\tlots").is_err());
    }
}
