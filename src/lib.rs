pub mod classifier;
pub mod core;
pub mod export;
pub mod keywords;
pub mod pipeline;
pub mod scoring;
pub mod segment;
pub mod source;

pub use core::config::Settings;
pub use core::error::AnalysisError;
pub use core::model::{
    AnalysisReport, AnalysisUnit, ClassProbabilityVector, DocumentReport, DocumentVerdict,
    KeywordEntry, Polarity, RankedKeywords, ScoreVerdict, SentimentCategory, SentimentFilter,
};
pub use keywords::KeywordRanker;
pub use pipeline::SentimentPipeline;
pub use scoring::{OrdinalScorer, UnitAggregator};
