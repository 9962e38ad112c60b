use thiserror::Error;

type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    /// Classifier output that is not a probability distribution over the five classes.
    #[error("invalid class distribution: {reason}")]
    InvalidDistribution { reason: String },

    /// Candidate extraction or polarity lookup failed.
    #[error("keyword extraction failed: {source}")]
    ExtractionFailure {
        #[source]
        source: BoxedError,
    },

    #[error("classifier call failed: {source}")]
    ClassificationFailure {
        #[source]
        source: BoxedError,
    },

    #[error("unknown sentiment filter '{0}' (expected positive, neutral, suggestive, negative or none)")]
    UnknownFilter(String),

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl AnalysisError {
    pub fn invalid_distribution(reason: impl Into<String>) -> Self {
        Self::InvalidDistribution {
            reason: reason.into(),
        }
    }

    pub fn extraction(err: anyhow::Error) -> Self {
        Self::ExtractionFailure { source: err.into() }
    }

    pub fn classification(err: anyhow::Error) -> Self {
        Self::ClassificationFailure { source: err.into() }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
