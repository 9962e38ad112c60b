use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::segment::Segmenter;

/// A blank line (possibly holding spaces) between two paragraphs.
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t\r]*\n").expect("paragraph pattern is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
/// Terminal punctuation, trailing closing quotes or brackets, then the
/// whitespace that separates it from the next sentence.
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([.!?]+["')\]\x{201d}\x{2019}]*)\s+"#).expect("sentence pattern is valid")
});

/// Sentence-level units.
///
/// Blank lines end a paragraph; single line breaks inside a paragraph are
/// treated as spaces, since extracted PDF text wraps mid-sentence. A run of
/// `.`, `!` or `?` (optionally followed by closing quotes or brackets) ends a
/// sentence when whitespace or the end of the paragraph follows.
#[derive(Debug, Default, Clone, Copy)]
pub struct SentenceSegmenter;

impl SentenceSegmenter {
    pub fn new() -> Self {
        Self
    }
}

impl Segmenter for SentenceSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<String>> {
        let mut sentences = Vec::new();
        for paragraph in PARAGRAPH_BREAK.split(text) {
            let paragraph = WHITESPACE.replace_all(paragraph.trim(), " ");
            split_sentences(&paragraph, &mut sentences);
        }
        Ok(sentences)
    }
}

fn split_sentences(paragraph: &str, out: &mut Vec<String>) {
    let mut start = 0;
    for caps in SENTENCE_END.captures_iter(paragraph) {
        let (Some(terminal), Some(whole)) = (caps.get(1), caps.get(0)) else {
            continue;
        };
        push_trimmed(out, &paragraph[start..terminal.end()]);
        start = whole.end();
    }
    push_trimmed(out, &paragraph[start..]);
}

fn push_trimmed(out: &mut Vec<String>, span: &str) {
    let span = span.trim();
    if !span.is_empty() {
        out.push(span.to_string());
    }
}
