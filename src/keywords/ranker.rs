use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;

use crate::core::config::KeywordConfig;
use crate::core::error::AnalysisError;
use crate::core::model::{KeywordEntry, Polarity, RankedKeywords, SentimentFilter};
use crate::keywords::candidates::CandidateExtractor;
use crate::keywords::lexicon::PolarityLexicon;
use crate::keywords::tokenize::TokenNormalizer;

/// Ranks frequent, salient terms of a text and tags them with polarity.
///
/// Candidates are requested with an oversampling factor over the requested
/// size so that enough of them survive the polarity filter. The output order
/// is frequency descending, then term ascending.
#[derive(Clone)]
pub struct KeywordRanker {
    normalizer: TokenNormalizer,
    extractor: Arc<dyn CandidateExtractor>,
    lexicon: Arc<dyn PolarityLexicon>,
    config: KeywordConfig,
}

impl KeywordRanker {
    pub fn new(extractor: Arc<dyn CandidateExtractor>, lexicon: Arc<dyn PolarityLexicon>) -> Self {
        Self {
            normalizer: TokenNormalizer::new(),
            extractor,
            lexicon,
            config: KeywordConfig::default(),
        }
    }

    pub fn with_config(mut self, config: KeywordConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &KeywordConfig {
        &self.config
    }

    pub fn rank(
        &self,
        text: &str,
        top_n: usize,
        filter: SentimentFilter,
    ) -> Result<RankedKeywords, AnalysisError> {
        let tokens = self.normalizer.normalize(text);
        self.rank_tokens(&tokens, top_n, filter)
    }

    /// Ranks an already normalized token stream.
    pub fn rank_tokens(
        &self,
        tokens: &[String],
        top_n: usize,
        filter: SentimentFilter,
    ) -> Result<RankedKeywords, AnalysisError> {
        if tokens.is_empty() || top_n == 0 {
            return Ok(RankedKeywords::default());
        }

        let mut frequencies: HashMap<&str, usize> = HashMap::new();
        for token in tokens {
            *frequencies.entry(token.as_str()).or_insert(0) += 1;
        }

        let requested = top_n.saturating_mul(self.config.oversampling_factor);
        let candidates = self
            .extractor
            .extract_candidates(tokens, requested)
            .map_err(AnalysisError::extraction)?;

        let qualifying: Vec<(&str, usize)> = candidates
            .iter()
            .filter_map(|term| {
                frequencies
                    .get_key_value(term.as_str())
                    .map(|(term, freq)| (*term, *freq))
            })
            .collect();

        tracing::debug!(
            tokens = tokens.len(),
            requested,
            candidates = candidates.len(),
            qualifying = qualifying.len(),
            "keyword candidates extracted"
        );

        let tagged = qualifying
            .par_iter()
            .map(|&(term, frequency)| {
                let polarity = self.classify_polarity(term)?;
                Ok(KeywordEntry {
                    term: term.to_string(),
                    frequency,
                    polarity,
                })
            })
            .collect::<Result<Vec<_>, AnalysisError>>()?;

        let mut kept: Vec<KeywordEntry> = tagged
            .into_iter()
            .filter(|entry| filter.matches(entry.polarity))
            .collect();
        kept.sort_by(|a, b| {
            b.frequency
                .cmp(&a.frequency)
                .then_with(|| a.term.cmp(&b.term))
        });
        kept.truncate(top_n);

        Ok(RankedKeywords::new(kept))
    }

    fn classify_polarity(&self, term: &str) -> Result<Polarity, AnalysisError> {
        let compound = self
            .lexicon
            .polarity_of(term)
            .map_err(AnalysisError::extraction)?;
        if !compound.is_finite() || !(-1.0..=1.0).contains(&compound) {
            return Err(AnalysisError::extraction(anyhow::anyhow!(
                "lexicon returned out-of-range polarity {compound} for '{term}'"
            )));
        }
        Ok(Polarity::from_compound(
            compound,
            self.config.positive_threshold,
            self.config.negative_threshold,
        ))
    }
}

impl std::fmt::Debug for KeywordRanker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordRanker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
