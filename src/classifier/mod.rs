pub mod bridge;
pub mod lexicon_classifier;

pub use bridge::ClassifierBridge;
pub use lexicon_classifier::LexiconClassifier;

use anyhow::Result;
use rayon::prelude::*;

/// Ordinal sentiment classifier: text in, probabilities over five ordered
/// classes out (class 1 most negative, class 5 most positive).
///
/// Output is returned as-is; validation happens when a unit is scored.
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Vec<f64>>;

    /// Classifies every text, preserving input order.
    fn classify_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        texts.par_iter().map(|text| self.classify(text)).collect()
    }
}
