pub mod lines;
pub mod sentences;

pub use lines::LineSegmenter;
pub use sentences::SentenceSegmenter;

use anyhow::Result;

/// Splits document text into the ordered, non-empty spans that get scored.
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Result<Vec<String>>;
}
