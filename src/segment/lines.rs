use anyhow::Result;

use crate::segment::Segmenter;

/// One unit per non-blank line, trimmed.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineSegmenter;

impl LineSegmenter {
    pub fn new() -> Self {
        Self
    }
}

impl Segmenter for LineSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<String>> {
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn drops_blank_lines_and_trims() -> Result<()> {
        let units = LineSegmenter::new().segment("  first comment \n\n\t\nsecond comment\r\n")?;
        assert_eq!(units, vec!["first comment", "second comment"]);
        Ok(())
    }

    #[test]
    fn empty_text_has_no_units() -> Result<()> {
        assert!(LineSegmenter::new().segment("\n \n")?.is_empty());
        Ok(())
    }
}
