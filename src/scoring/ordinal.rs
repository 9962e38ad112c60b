use crate::core::config::ScoringConfig;
use crate::core::error::AnalysisError;
use crate::core::model::{
    ClassProbabilityVector, ScoreVerdict, SentimentCategory, MAX_SCORE, MIN_SCORE,
};

const INTENSITY_MIN: f64 = 1.0;
const INTENSITY_MAX: f64 = 100.0;

/// Scores are snapped to this many steps per unit before banding, so sums
/// like `Σ i·p[i]` that land a hair off a cut-point or a rounding tie behave
/// like the exact value.
const SCORE_STEPS: f64 = 1e9;

/// Maps a five-class distribution to a continuous score, a category and a
/// band-relative intensity.
///
/// Each category band is rescaled independently onto 1..=100, so intensity
/// reads as "how strongly this band applies" rather than an absolute star
/// count. Cut-points are inclusive toward the lower category.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrdinalScorer {
    config: ScoringConfig,
}

impl OrdinalScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScoringConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Validates raw classifier output and scores it.
    pub fn score(&self, probabilities: &[f64]) -> Result<ScoreVerdict, AnalysisError> {
        let vector = ClassProbabilityVector::new(probabilities)?;
        Ok(self.score_vector(&vector))
    }

    pub fn score_vector(&self, vector: &ClassProbabilityVector) -> ScoreVerdict {
        self.verdict_for(vector.expected_class())
    }

    /// Applies the category and intensity rule to an already computed
    /// continuous score.
    pub fn verdict_for(&self, continuous_score: f64) -> ScoreVerdict {
        let continuous_score =
            ((continuous_score * SCORE_STEPS).round() / SCORE_STEPS).clamp(MIN_SCORE, MAX_SCORE);
        let category = self.categorize(continuous_score);
        ScoreVerdict {
            category,
            continuous_score,
            intensity: self.intensity(continuous_score, category),
        }
    }

    pub fn categorize(&self, continuous_score: f64) -> SentimentCategory {
        if continuous_score <= self.config.negative_cutoff {
            SentimentCategory::Negative
        } else if continuous_score <= self.config.positive_cutoff {
            SentimentCategory::Neutral
        } else {
            SentimentCategory::Positive
        }
    }

    fn intensity(&self, continuous_score: f64, category: SentimentCategory) -> u8 {
        let ScoringConfig {
            negative_cutoff,
            positive_cutoff,
        } = self.config;
        let (distance, width) = match category {
            SentimentCategory::Negative => {
                (negative_cutoff - continuous_score, negative_cutoff - MIN_SCORE)
            }
            SentimentCategory::Neutral => {
                (continuous_score - negative_cutoff, positive_cutoff - negative_cutoff)
            }
            SentimentCategory::Positive => {
                (continuous_score - positive_cutoff, MAX_SCORE - positive_cutoff)
            }
        };
        band_intensity(distance, width)
    }
}

fn band_intensity(distance: f64, width: f64) -> u8 {
    let scaled = (distance / width * (INTENSITY_MAX - INTENSITY_MIN)).round() + INTENSITY_MIN;
    scaled.clamp(INTENSITY_MIN, INTENSITY_MAX) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(probs: [f64; 5]) -> ScoreVerdict {
        OrdinalScorer::new().score(&probs).unwrap()
    }

    #[test]
    fn all_mass_on_top_class_is_fully_positive() {
        let verdict = score([0.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(verdict.continuous_score, 5.0);
        assert_eq!(verdict.category, SentimentCategory::Positive);
        assert_eq!(verdict.intensity, 100);
    }

    #[test]
    fn all_mass_on_bottom_class_is_fully_negative() {
        let verdict = score([1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(verdict.continuous_score, 1.0);
        assert_eq!(verdict.category, SentimentCategory::Negative);
        assert_eq!(verdict.intensity, 100);
    }

    #[test]
    fn middle_class_is_neutral_at_51() {
        let verdict = score([0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(verdict.continuous_score, 3.0);
        assert_eq!(verdict.category, SentimentCategory::Neutral);
        assert_eq!(verdict.intensity, 51);
    }

    #[test]
    fn float_drift_at_three_still_scores_51() {
        // 0.1 + 0.2 + 1.8 + 0.4 + 0.5 sums to just under 3.0.
        let verdict = score([0.1, 0.1, 0.6, 0.1, 0.1]);
        assert_eq!(verdict.continuous_score, 3.0);
        assert_eq!(verdict.category, SentimentCategory::Neutral);
        assert_eq!(verdict.intensity, 51);
        assert_ne!(verdict, crate::scoring::NO_DATA_VERDICT);
    }

    #[test]
    fn continuous_score_is_expected_class() {
        let verdict = score([0.1, 0.2, 0.3, 0.2, 0.2]);
        let expected = 0.1 + 0.4 + 0.9 + 0.8 + 1.0;
        assert!((verdict.continuous_score - expected).abs() < 1e-9);
    }

    #[test]
    fn cut_points_belong_to_the_lower_category() {
        let scorer = OrdinalScorer::new();
        let lower = scorer.verdict_for(2.5);
        assert_eq!(lower.category, SentimentCategory::Negative);
        assert_eq!(lower.intensity, 1);

        let upper = scorer.verdict_for(3.5);
        assert_eq!(upper.category, SentimentCategory::Neutral);
        assert_eq!(upper.intensity, 100);

        assert_eq!(scorer.categorize(2.5001), SentimentCategory::Neutral);
        assert_eq!(scorer.categorize(3.5001), SentimentCategory::Positive);
    }

    #[test]
    fn bands_are_rescaled_independently() {
        let scorer = OrdinalScorer::new();
        // Halfway through each band lands on the same intensity.
        assert_eq!(scorer.verdict_for(1.75).intensity, 51);
        assert_eq!(scorer.verdict_for(3.0).intensity, 51);
        assert_eq!(scorer.verdict_for(4.25).intensity, 51);
    }

    #[test]
    fn scoring_is_idempotent() {
        let probs = [0.05, 0.1, 0.2, 0.4, 0.25];
        assert_eq!(score(probs), score(probs));
    }

    #[test]
    fn score_stays_in_range_for_valid_vectors() {
        let scorer = OrdinalScorer::new();
        let grid = [
            [0.2, 0.2, 0.2, 0.2, 0.2],
            [0.5, 0.5, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.5, 0.5],
            [0.9, 0.0, 0.0, 0.0, 0.1],
            [0.0, 0.0, 0.0, 0.0005, 0.9999],
        ];
        for probs in grid {
            let verdict = scorer.score(&probs).unwrap();
            assert!((MIN_SCORE..=MAX_SCORE).contains(&verdict.continuous_score));
            assert!((1..=100).contains(&verdict.intensity));
        }
    }

    #[test]
    fn malformed_vectors_are_rejected() {
        let scorer = OrdinalScorer::new();
        assert!(scorer.score(&[0.25, 0.25, 0.25, 0.25]).is_err());
        assert!(scorer.score(&[0.5, 0.5, 0.5, 0.0, 0.0]).is_err());
        assert!(scorer.score(&[1.5, -0.5, 0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn custom_cut_points_move_the_bands() {
        let scorer = OrdinalScorer::with_config(ScoringConfig {
            negative_cutoff: 2.0,
            positive_cutoff: 4.0,
        })
        .unwrap();
        assert_eq!(scorer.categorize(2.4), SentimentCategory::Neutral);
        assert_eq!(scorer.verdict_for(3.0).intensity, 51);
        assert!(OrdinalScorer::with_config(ScoringConfig {
            negative_cutoff: 0.5,
            positive_cutoff: 4.0,
        })
        .is_err());
    }
}
