use std::sync::Arc;

use anyhow::Result;

use crate::classifier::Classifier;
use crate::core::model::CLASS_COUNT;
use crate::keywords::lexicon::PolarityLexicon;
use crate::keywords::tokenize::TokenNormalizer;

/// Width of the bell placed over the class labels; smaller is more peaked.
const SPREAD: f64 = 0.75;

/// Offline fallback classifier built on a word polarity lexicon.
///
/// The mean compound polarity `c` of the words the lexicon has an opinion on
/// picks a target label `3 + 2c`, and class probabilities fall off with the
/// squared distance from that target. Text with no opinionated words centers
/// on class 3.
#[derive(Clone)]
pub struct LexiconClassifier {
    lexicon: Arc<dyn PolarityLexicon>,
    normalizer: TokenNormalizer,
}

impl LexiconClassifier {
    pub fn new(lexicon: Arc<dyn PolarityLexicon>) -> Self {
        Self {
            lexicon,
            normalizer: TokenNormalizer::new(),
        }
    }

    fn mean_polarity(&self, text: &str) -> Result<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for token in self.normalizer.normalize(text) {
            let polarity = self.lexicon.polarity_of(&token)?;
            if polarity != 0.0 {
                sum += polarity;
                count += 1;
            }
        }
        Ok(if count == 0 { 0.0 } else { sum / count as f64 })
    }
}

impl Classifier for LexiconClassifier {
    fn classify(&self, text: &str) -> Result<Vec<f64>> {
        let polarity = self.mean_polarity(text)?.clamp(-1.0, 1.0);
        let target = 3.0 + 2.0 * polarity;

        let weights: Vec<f64> = (1..=CLASS_COUNT)
            .map(|class| {
                let distance = class as f64 - target;
                (-(distance * distance) / SPREAD).exp()
            })
            .collect();
        let total: f64 = weights.iter().sum();
        Ok(weights.into_iter().map(|w| w / total).collect())
    }
}

impl std::fmt::Debug for LexiconClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexiconClassifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::SentimentCategory;
    use crate::keywords::lexicon::ValenceLexicon;
    use crate::scoring::OrdinalScorer;

    fn classifier() -> LexiconClassifier {
        LexiconClassifier::new(Arc::new(ValenceLexicon::builtin()))
    }

    #[test]
    fn produces_valid_distribution() -> Result<()> {
        let probs = classifier().classify("Very helpful and transparent process!")?;
        assert_eq!(probs.len(), CLASS_COUNT);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(probs.iter().all(|p| *p >= 0.0));
        Ok(())
    }

    #[test]
    fn opinion_words_move_the_category() -> Result<()> {
        let scorer = OrdinalScorer::new();
        let c = classifier();
        let positive = scorer.score(&c.classify("Very helpful and transparent process!")?)?;
        let negative = scorer.score(&c.classify("This consultation is useless and badly managed.")?)?;
        let neutral = scorer.score(&c.classify("The meeting is scheduled for Tuesday.")?)?;
        assert_eq!(positive.category, SentimentCategory::Positive);
        assert_eq!(negative.category, SentimentCategory::Negative);
        assert_eq!(neutral.category, SentimentCategory::Neutral);
        Ok(())
    }

    #[test]
    fn batch_preserves_order() -> Result<()> {
        let texts = vec![
            "excellent work".to_string(),
            "terrible outcome".to_string(),
        ];
        let batch = classifier().classify_batch(&texts)?;
        assert_eq!(batch.len(), 2);
        assert!(batch[0][4] > batch[0][0]);
        assert!(batch[1][0] > batch[1][4]);
        Ok(())
    }
}
