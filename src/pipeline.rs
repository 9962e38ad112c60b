use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::classifier::{Classifier, ClassifierBridge, LexiconClassifier};
use crate::core::config::Settings;
use crate::core::error::AnalysisError;
use crate::core::model::{
    AnalysisReport, AnalysisUnit, DocumentReport, DocumentVerdict, KeywordReport, RankedKeywords,
    SentimentFilter,
};
use crate::export::json_export::JsonExporter;
use crate::export::text_export::TextExporter;
use crate::export::Exporter;
use crate::keywords::{FrequencyExtractor, KeywordRanker, PolarityLexicon, ValenceLexicon};
use crate::scoring::{OrdinalScorer, UnitAggregator};
use crate::segment::{LineSegmenter, Segmenter, SentenceSegmenter};
use crate::source;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmenterKind {
    #[default]
    Lines,
    Sentences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierKind {
    #[default]
    Lexicon,
    Bridge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub settings: Settings,
    pub segmenter: SegmenterKind,
    pub classifier: ClassifierKind,
    /// Tab-separated lexicon file replacing the built-in table.
    pub lexicon: Option<PathBuf>,
}

/// Document verdicts and keyword rankings over injected collaborators.
pub struct SentimentPipeline {
    segmenter: Box<dyn Segmenter>,
    classifier: Box<dyn Classifier>,
    aggregator: UnitAggregator,
    ranker: KeywordRanker,
}

impl SentimentPipeline {
    pub fn new(
        segmenter: Box<dyn Segmenter>,
        classifier: Box<dyn Classifier>,
        aggregator: UnitAggregator,
        ranker: KeywordRanker,
    ) -> Self {
        Self {
            segmenter,
            classifier,
            aggregator,
            ranker,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let settings = &config.settings;

        let lexicon: Arc<dyn PolarityLexicon> = match &config.lexicon {
            Some(path) => Arc::new(ValenceLexicon::from_file(path)?),
            None => Arc::new(ValenceLexicon::builtin()),
        };

        let segmenter: Box<dyn Segmenter> = match config.segmenter {
            SegmenterKind::Lines => Box::new(LineSegmenter::new()),
            SegmenterKind::Sentences => Box::new(SentenceSegmenter::new()),
        };

        let classifier: Box<dyn Classifier> = match config.classifier {
            ClassifierKind::Lexicon => Box::new(LexiconClassifier::new(lexicon.clone())),
            ClassifierKind::Bridge => Box::new(ClassifierBridge::from_config(&settings.bridge)),
        };

        let scorer = OrdinalScorer::with_config(settings.scoring)?;
        let ranker = KeywordRanker::new(Arc::new(FrequencyExtractor::new()), lexicon)
            .with_config(settings.keywords)?;

        Ok(Self::new(
            segmenter,
            classifier,
            UnitAggregator::new(scorer),
            ranker,
        ))
    }

    pub fn default_top_n(&self) -> usize {
        self.ranker.config().default_top_n
    }

    /// Segments, classifies and aggregates one document's text.
    ///
    /// A malformed classifier result only skips its unit; a classifier that
    /// fails outright fails the whole document.
    pub fn analyze_text(&self, text: &str) -> Result<DocumentVerdict> {
        let spans = self
            .segmenter
            .segment(text)
            .context("failed to segment document text")?;

        if spans.is_empty() {
            return Ok(self.aggregator.aggregate(&[]));
        }

        let probabilities = self
            .classifier
            .classify_batch(&spans)
            .map_err(AnalysisError::classification)?;

        if probabilities.len() != spans.len() {
            return Err(AnalysisError::classification(anyhow::anyhow!(
                "classifier returned {} results for {} units",
                probabilities.len(),
                spans.len()
            ))
            .into());
        }

        let units: Vec<AnalysisUnit> = spans
            .into_iter()
            .zip(probabilities)
            .enumerate()
            .map(|(idx, (text, probs))| AnalysisUnit::new(idx + 1, text, probs))
            .collect();

        Ok(self.aggregator.aggregate(&units))
    }

    pub fn analyze_document(&self, path: &Path) -> Result<DocumentReport> {
        let text = source::load_text(path)?;
        let verdict = self
            .analyze_text(&text)
            .with_context(|| format!("failed to analyze {}", path.display()))?;
        tracing::info!(
            source = %path.display(),
            category = %verdict.category(),
            intensity = verdict.intensity(),
            no_data = verdict.no_data,
            "document analyzed"
        );
        Ok(DocumentReport::new(display_name(path), verdict))
    }

    pub fn rank_keywords(
        &self,
        text: &str,
        top_n: usize,
        filter: SentimentFilter,
    ) -> Result<RankedKeywords> {
        Ok(self.ranker.rank(text, top_n, filter)?)
    }

    /// Keyword rankings for each document, or a single ranking over the
    /// whitespace-joined text of all of them when `combined` is set.
    pub fn keyword_reports(
        &self,
        paths: &[PathBuf],
        top_n: usize,
        filter: SentimentFilter,
        combined: bool,
    ) -> Result<Vec<KeywordReport>> {
        let report = |source: String, text: &str| -> Result<KeywordReport> {
            let keywords = self
                .rank_keywords(text, top_n, filter)
                .with_context(|| format!("keyword ranking failed for {source}"))?;
            Ok(KeywordReport {
                source,
                sentiment: filter.to_string(),
                top_n,
                keywords,
            })
        };

        if combined {
            let mut corpus = Vec::with_capacity(paths.len());
            for path in paths {
                corpus.push(source::load_text(path)?);
            }
            let names = paths.iter().map(|p| display_name(p)).collect::<Vec<_>>().join(", ");
            return Ok(vec![report(names, corpus.join(" ").trim())?]);
        }

        paths
            .iter()
            .map(|path| report(display_name(path), &source::load_text(path)?))
            .collect()
    }
}

pub fn export_report(report: &AnalysisReport, output: &Path, formats: &[ExportFormat]) -> Result<()> {
    for format in formats {
        match format {
            ExportFormat::Json => JsonExporter::new(output.to_path_buf()).export(report)?,
            ExportFormat::Text => TextExporter::new(output.to_path_buf()).export(report)?,
        }
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
