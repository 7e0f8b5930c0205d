use crate::error::PartlistError;
use crate::extraction::table::detect_tables;
use crate::extraction::{PageContent, PdfExtractor};
use std::io::Write;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -layout` so column alignment survives, then detects
/// tables in the aligned text.
pub struct PdftotextExtractor {
    header_keywords: Vec<String>,
}

impl PdftotextExtractor {
    pub fn new(header_keywords: Vec<String>) -> Self {
        PdftotextExtractor { header_keywords }
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, PartlistError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| PartlistError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| PartlistError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg(tmpfile.path())
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PartlistError::PdftotextNotFound
                } else {
                    PartlistError::Extraction(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(PartlistError::PdftotextFailed { code, stderr });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(split_pages(&text, &self.header_keywords))
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Split `pdftotext -layout` output into pages and detect tables on each.
///
/// pdftotext terminates every page with a form feed, so the trailing
/// empty chunk after the last page is dropped.
fn split_pages(text: &str, header_keywords: &[String]) -> Vec<PageContent> {
    let mut chunks: Vec<&str> = text.split('\x0c').collect();
    if chunks.len() > 1 && chunks.last().is_some_and(|c| c.trim().is_empty()) {
        chunks.pop();
    }

    chunks
        .into_iter()
        .enumerate()
        .map(|(i, page_text)| {
            let lines: Vec<&str> = page_text.lines().collect();
            PageContent {
                page_number: i + 1,
                text: page_text.to_string(),
                tables: detect_tables(&lines, header_keywords),
            }
        })
        .collect()
}
