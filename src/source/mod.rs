pub mod pdf_text;

pub use pdf_text::PdfTextReader;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions accepted when a directory is given as input.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt"];

pub fn is_pdf(path: &Path) -> bool {
    has_extension(path, "pdf")
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// Reads the text of one document: PDFs through poppler, anything else as UTF-8.
pub fn load_text(path: &Path) -> Result<String> {
    if is_pdf(path) {
        PdfTextReader::new(path.to_path_buf())?.extract_text()
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

/// Expands directories into the supported documents they contain, sorted by
/// file name. Plain file arguments are kept as given.
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = fs::read_dir(input)
                .with_context(|| format!("failed to list {}", input.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| {
                    path.is_file()
                        && SUPPORTED_EXTENSIONS
                            .iter()
                            .any(|ext| has_extension(path, ext))
                })
                .collect();
            found.sort();
            tracing::debug!(dir = %input.display(), files = found.len(), "expanded input directory");
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("{prefix}-{}-{now}", std::process::id()))
    }

    #[test]
    fn recognizes_pdf_extension_case_insensitively() {
        assert!(is_pdf(Path::new("report.PDF")));
        assert!(!is_pdf(Path::new("notes.txt")));
        assert!(!is_pdf(Path::new("pdf")));
    }

    #[test]
    fn expands_directories_in_name_order() -> Result<()> {
        let dir = temp_dir("docsentiment-inputs");
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("b.txt"), "second")?;
        fs::write(dir.join("a.txt"), "first")?;
        fs::write(dir.join("ignored.csv"), "x")?;

        let explicit = PathBuf::from("explicit.txt");
        let files = expand_inputs(&[dir.clone(), explicit.clone()])?;
        assert_eq!(files, vec![dir.join("a.txt"), dir.join("b.txt"), explicit]);
        assert_eq!(load_text(&files[0])?, "first");

        let _ = fs::remove_dir_all(&dir);
        Ok(())
    }
}
