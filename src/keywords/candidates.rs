use std::collections::{HashMap, HashSet};

use anyhow::Result;

/// Proposes salient terms from a normalized token stream.
pub trait CandidateExtractor: Send + Sync {
    /// Returns at most `top_n` candidate terms.
    fn extract_candidates(&self, tokens: &[String], top_n: usize) -> Result<HashSet<String>>;
}

/// Picks the most frequent distinct tokens, breaking ties alphabetically.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrequencyExtractor;

impl FrequencyExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl CandidateExtractor for FrequencyExtractor {
    fn extract_candidates(&self, tokens: &[String], top_n: usize) -> Result<HashSet<String>> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for token in tokens {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        Ok(ranked
            .into_iter()
            .take(top_n)
            .map(|(term, _)| term.to_string())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn keeps_most_frequent_terms() -> Result<()> {
        let stream = tokens(&["policy", "policy", "policy", "budget", "budget", "road"]);
        let candidates = FrequencyExtractor::new().extract_candidates(&stream, 2)?;
        assert_eq!(candidates.len(), 2);
        assert!(candidates.contains("policy"));
        assert!(candidates.contains("budget"));
        Ok(())
    }

    #[test]
    fn ties_resolve_alphabetically() -> Result<()> {
        let stream = tokens(&["zoning", "access", "metro"]);
        let candidates = FrequencyExtractor::new().extract_candidates(&stream, 2)?;
        assert!(candidates.contains("access"));
        assert!(candidates.contains("metro"));
        assert!(!candidates.contains("zoning"));
        Ok(())
    }
}
