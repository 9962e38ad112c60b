use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::error::AnalysisError;
use crate::core::model::{MAX_SCORE, MIN_SCORE};

pub const ENV_CONFIG_PATH: &str = "DOCSENTIMENT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "docsentiment.yaml";

/// Category cut-points on the continuous score.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Scores at or below this are Negative.
    pub negative_cutoff: f64,
    /// Scores above this are Positive; everything between is Neutral.
    pub positive_cutoff: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            negative_cutoff: 2.5,
            positive_cutoff: 3.5,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let ordered = MIN_SCORE < self.negative_cutoff
            && self.negative_cutoff < self.positive_cutoff
            && self.positive_cutoff < MAX_SCORE;
        if !ordered {
            return Err(AnalysisError::invalid_config(format!(
                "cut-points must satisfy {MIN_SCORE} < negative ({}) < positive ({}) < {MAX_SCORE}",
                self.negative_cutoff, self.positive_cutoff
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// Multiplier applied to the requested top-N when asking for candidates.
    pub oversampling_factor: usize,
    pub positive_threshold: f64,
    pub negative_threshold: f64,
    pub default_top_n: usize,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            oversampling_factor: 3,
            positive_threshold: 0.05,
            negative_threshold: -0.05,
            default_top_n: 20,
        }
    }
}

impl KeywordConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.oversampling_factor == 0 {
            return Err(AnalysisError::invalid_config(
                "oversampling_factor must be at least 1",
            ));
        }
        if !self.negative_threshold.is_finite() || !self.positive_threshold.is_finite() {
            return Err(AnalysisError::invalid_config(
                "polarity thresholds must be finite numbers",
            ));
        }
        if self.negative_threshold >= self.positive_threshold {
            return Err(AnalysisError::invalid_config(format!(
                "negative_threshold ({}) must be below positive_threshold ({})",
                self.negative_threshold, self.positive_threshold
            )));
        }
        Ok(())
    }
}

/// External classifier process settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub interpreter: String,
    pub script: PathBuf,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            script: PathBuf::from("classifier/bridge/classify.py"),
            model: "nlptown/bert-base-multilingual-uncased-sentiment".to_string(),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scoring: ScoringConfig,
    pub keywords: KeywordConfig,
    pub bridge: BridgeConfig,
}

impl Settings {
    /// Loads settings from an explicit path, `$DOCSENTIMENT_CONFIG`, or
    /// `docsentiment.yaml`, in that order.
    ///
    /// An explicit path must exist and parse. The implicit locations fall
    /// back to defaults with a warning.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let settings = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = std::env::var(ENV_CONFIG_PATH)
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
                Self::load_implicit(&path)
            }
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let settings = Self::from_yaml(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(settings)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.scoring.validate()?;
        self.keywords.validate()
    }

    fn load_implicit(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unusable config file");
                Self::default()
            }
        }
    }
}
