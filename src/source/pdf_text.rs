use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Text extraction through poppler's `pdfinfo` and `pdftotext`.
#[derive(Debug, Clone)]
pub struct PdfTextReader {
    path: PathBuf,
}

impl PdfTextReader {
    pub fn new(path: PathBuf) -> Result<Self> {
        if !path.is_file() {
            anyhow::bail!("PDF file does not exist: {}", path.display());
        }
        Ok(Self { path })
    }

    pub fn page_count(&self) -> Result<usize> {
        get_page_count(&self.path)
    }

    /// Text of one page (0-based index).
    pub fn page_text(&self, page_idx: usize) -> Result<String> {
        // pdftotext uses 1-based page indices
        let page_number = (page_idx + 1).to_string();
        let output = Command::new("pdftotext")
            .arg("-enc")
            .arg("UTF-8")
            .arg("-f")
            .arg(&page_number)
            .arg("-l")
            .arg(&page_number)
            .arg(&self.path)
            .arg("-")
            .output()
            .with_context(|| "failed to invoke pdftotext; is poppler-utils installed?")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("pdftotext failed on page {page_number}: {}", stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// All pages joined with newlines; pages without text are skipped.
    pub fn extract_text(&self) -> Result<String> {
        let page_count = self.page_count()?;
        let mut text = String::new();
        for page_idx in 0..page_count {
            let page = self.page_text(page_idx)?;
            let page = page.trim_end_matches(['\n', '\x0c']);
            if page.trim().is_empty() {
                continue;
            }
            text.push_str(page);
            text.push('\n');
        }
        tracing::debug!(path = %self.path.display(), pages = page_count, chars = text.len(), "extracted PDF text");
        Ok(text)
    }
}

fn get_page_count(pdf_path: &Path) -> Result<usize> {
    let output = Command::new("pdfinfo")
        .arg(pdf_path)
        .output()
        .with_context(|| format!("failed to invoke pdfinfo on {}", pdf_path.display()))?;

    if !output.status.success() {
        anyhow::bail!("pdfinfo failed with status: {}", output.status);
    }

    parse_page_count(&String::from_utf8_lossy(&output.stdout)).with_context(|| {
        format!(
            "pdfinfo output did not contain a usable 'Pages:' line for {}",
            pdf_path.display()
        )
    })
}

fn parse_page_count(pdfinfo_output: &str) -> Result<usize> {
    for line in pdfinfo_output.lines() {
        if let Some(rest) = line.strip_prefix("Pages:") {
            let num_str = rest.trim();
            return num_str
                .parse()
                .with_context(|| format!("failed to parse page count from 'Pages:' line: {num_str}"));
        }
    }
    anyhow::bail!("no 'Pages:' line")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pages_line() -> Result<()> {
        let output = "Title:          Feedback\nPages:          12\nEncrypted:      no\n";
        assert_eq!(parse_page_count(output)?, 12);
        Ok(())
    }

    #[test]
    fn missing_pages_line_is_an_error() {
        assert!(parse_page_count("Title: x\n").is_err());
        assert!(parse_page_count("Pages: many\n").is_err());
    }

    #[test]
    fn missing_file_is_rejected() {
        assert!(PdfTextReader::new(PathBuf::from("/nonexistent/feedback.pdf")).is_err());
    }
}
