pub mod candidates;
pub mod lexicon;
pub mod ranker;
pub mod tokenize;

pub use candidates::{CandidateExtractor, FrequencyExtractor};
pub use lexicon::{PolarityLexicon, ValenceLexicon};
pub use ranker::KeywordRanker;
pub use tokenize::TokenNormalizer;
