use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::model::{AnalysisReport, DocumentReport, KeywordReport};
use crate::export::Exporter;

#[derive(Debug, Clone)]
pub struct TextExporter {
    out_dir: PathBuf,
}

impl TextExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl Exporter for TextExporter {
    fn export(&self, report: &AnalysisReport) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join("report.txt");
        fs::write(path, render(report, true))?;
        Ok(())
    }
}

/// Human-readable rendering shared by the exporter and the CLI.
pub fn render(report: &AnalysisReport, with_units: bool) -> String {
    let mut out = String::new();
    for document in &report.documents {
        render_document(&mut out, document, with_units);
        out.push('\n');
    }
    for keywords in &report.keywords {
        render_keywords(&mut out, keywords);
        out.push('\n');
    }
    out
}

fn render_document(out: &mut String, document: &DocumentReport, with_units: bool) {
    let verdict = &document.verdict;
    let _ = writeln!(out, "=== Sentiment for {} ===", document.source);

    if with_units {
        for unit in &verdict.units {
            let _ = writeln!(out, "Unit {}: {}", unit.index, unit.text);
            let _ = writeln!(
                out,
                "  -> {} (score {:.2}, intensity {})",
                unit.verdict.category, unit.verdict.continuous_score, unit.verdict.intensity
            );
        }
        for skipped in &verdict.skipped {
            let _ = writeln!(out, "Unit {} skipped: {}", skipped.index, skipped.reason);
        }
        if !verdict.units.is_empty() || !verdict.skipped.is_empty() {
            out.push('\n');
        }
    }

    if verdict.no_data {
        let _ = writeln!(out, "No scorable text found (no data)");
    }
    let _ = writeln!(out, "Category: {} ({})", verdict.category(), document.label);
    let _ = writeln!(out, "Score: {:.2}", verdict.continuous_score());
    let _ = writeln!(out, "Intensity: {}", verdict.intensity());
}

fn render_keywords(out: &mut String, report: &KeywordReport) {
    let _ = writeln!(
        out,
        "=== Keywords for {} (sentiment: {}, top {}) ===",
        report.source, report.sentiment, report.top_n
    );
    if report.keywords.is_empty() {
        let _ = writeln!(out, "No keywords detected.");
        return;
    }
    for entry in report.keywords.iter() {
        let _ = writeln!(
            out,
            "{}: count={}, sentiment={}",
            entry.term, entry.frequency, entry.polarity
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{
        DocumentVerdict, KeywordEntry, Polarity, RankedKeywords, ScoreVerdict, SentimentCategory,
        UnitVerdict,
    };
    use crate::scoring::NO_DATA_VERDICT;

    fn document(no_data: bool) -> DocumentReport {
        let verdict = if no_data {
            DocumentVerdict {
                verdict: NO_DATA_VERDICT,
                no_data: true,
                units: vec![],
                skipped: vec![],
            }
        } else {
            let score = ScoreVerdict {
                category: SentimentCategory::Neutral,
                continuous_score: 3.0,
                intensity: 51,
            };
            DocumentVerdict {
                verdict: score,
                no_data: false,
                units: vec![UnitVerdict {
                    index: 1,
                    text: "It was okay, nothing special.".to_string(),
                    verdict: score,
                }],
                skipped: vec![],
            }
        };
        DocumentReport::new("feedback.pdf", verdict)
    }

    #[test]
    fn renders_document_with_units() {
        let report = AnalysisReport {
            documents: vec![document(false)],
            keywords: vec![],
        };
        let text = render(&report, true);
        assert!(text.contains("=== Sentiment for feedback.pdf ==="));
        assert!(text.contains("Unit 1: It was okay, nothing special."));
        assert!(text.contains("Category: Neutral (suggestive)"));
        assert!(text.contains("Intensity: 51"));
        assert!(!render(&report, false).contains("Unit 1"));
    }

    #[test]
    fn marks_no_data_documents() {
        let report = AnalysisReport {
            documents: vec![document(true)],
            keywords: vec![],
        };
        let text = render(&report, true);
        assert!(text.contains("(no data)"));
        assert!(text.contains("Intensity: 50"));
    }

    #[test]
    fn renders_keywords_in_rank_order() {
        let keywords = RankedKeywords::new(vec![
            KeywordEntry {
                term: "delay".to_string(),
                frequency: 3,
                polarity: Polarity::Negative,
            },
            KeywordEntry {
                term: "awful".to_string(),
                frequency: 2,
                polarity: Polarity::Negative,
            },
        ]);
        let report = AnalysisReport {
            documents: vec![],
            keywords: vec![KeywordReport {
                source: "feedback.pdf".to_string(),
                sentiment: "negative".to_string(),
                top_n: 20,
                keywords,
            }],
        };
        let text = render(&report, true);
        let delay = text.find("delay: count=3, sentiment=negative").unwrap();
        let awful = text.find("awful: count=2, sentiment=negative").unwrap();
        assert!(delay < awful);
    }
}
