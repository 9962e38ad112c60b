use crate::core::model::{
    AnalysisUnit, DocumentVerdict, ScoreVerdict, SentimentCategory, SkippedUnit, UnitVerdict,
};
use crate::scoring::ordinal::OrdinalScorer;

/// Verdict reported when a document has no scorable units. Its intensity (50)
/// cannot be produced by the scoring rule for 3.0, which yields 51.
pub const NO_DATA_VERDICT: ScoreVerdict = ScoreVerdict {
    category: SentimentCategory::Neutral,
    continuous_score: 3.0,
    intensity: 50,
};

/// Combines per-unit scores into one document verdict.
///
/// The document score is the mean of unit continuous scores, re-run through
/// the same category/intensity rule. Units whose classifier output is not a
/// valid distribution are skipped and reported, never scored.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitAggregator {
    scorer: OrdinalScorer,
}

impl UnitAggregator {
    pub fn new(scorer: OrdinalScorer) -> Self {
        Self { scorer }
    }

    pub fn aggregate(&self, units: &[AnalysisUnit]) -> DocumentVerdict {
        let mut scored = Vec::with_capacity(units.len());
        let mut skipped = Vec::new();

        for unit in units {
            match self.scorer.score(&unit.probabilities) {
                Ok(verdict) => scored.push(UnitVerdict {
                    index: unit.index,
                    text: unit.text.clone(),
                    verdict,
                }),
                Err(e) => {
                    tracing::warn!(index = unit.index, error = %e, "skipping unit");
                    skipped.push(SkippedUnit {
                        index: unit.index,
                        text: unit.text.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if scored.is_empty() {
            tracing::debug!(skipped = skipped.len(), "no scorable units, reporting no data");
            return DocumentVerdict {
                verdict: NO_DATA_VERDICT,
                no_data: true,
                units: scored,
                skipped,
            };
        }

        let mean = scored
            .iter()
            .map(|unit| unit.verdict.continuous_score)
            .sum::<f64>()
            / scored.len() as f64;

        tracing::debug!(
            units = scored.len(),
            skipped = skipped.len(),
            mean,
            "aggregated document score"
        );

        DocumentVerdict {
            verdict: self.scorer.verdict_for(mean),
            no_data: false,
            units: scored,
            skipped,
        }
    }
}
