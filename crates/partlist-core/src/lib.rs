pub mod config;
pub mod error;
pub mod extraction;
pub mod import;
pub mod model;
pub mod parsing;
pub mod spreadsheet;

use std::path::Path;

use tracing::{error, info, warn};

use config::Config;
use error::PartlistError;
use extraction::{PageContent, PdfExtractor};
use parsing::ParsedCatalog;

/// Main API entry point: extract normalized part records from a PDF.
///
/// A failing extractor is logged and treated as a document without pages.
/// When no record can be recovered, the raw page text is written to
/// `config.paths.raw_text_dump` (if there is any text) and
/// `NoRowsExtracted` is returned, carrying the dump path when one was
/// written. A failed dump write is logged, not returned.
pub fn extract_records(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    config: &Config,
) -> Result<ParsedCatalog, PartlistError> {
    let pages = match extractor.extract_pages(pdf_bytes) {
        Ok(pages) => pages,
        Err(e) => {
            error!(backend = extractor.backend_name(), "extraction failed: {e}");
            Vec::new()
        }
    };
    info!(pages = pages.len(), backend = extractor.backend_name(), "extracted pages");

    let catalog = parsing::parse_pages(&pages, &config.extraction);

    if catalog.records.is_empty() {
        warn!("no rows extracted");
        let path = &config.paths.raw_text_dump;
        let dump = match write_raw_text_dump(&pages, path) {
            Ok(true) => {
                info!(path = %path.display(), "raw page text saved for inspection");
                Some(path.clone())
            }
            Ok(false) => None,
            Err(e) => {
                error!(path = %path.display(), "could not save raw page text: {e}");
                None
            }
        };
        return Err(PartlistError::NoRowsExtracted { dump });
    }

    info!(
        records = catalog.records.len(),
        table_pages = catalog.pages_with(parsing::PageMethod::Tables),
        "records extracted"
    );
    Ok(catalog)
}

/// Write the non-empty page texts, separated by a blank line.
///
/// Returns `false` without touching the filesystem when there is no text.
pub fn write_raw_text_dump(pages: &[PageContent], path: &Path) -> Result<bool, PartlistError> {
    let texts: Vec<&str> = pages
        .iter()
        .map(|p| p.text.as_str())
        .filter(|t| !t.trim().is_empty())
        .collect();
    if texts.is_empty() {
        return Ok(false);
    }
    std::fs::write(path, texts.join("\n\n"))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: usize, text: &str) -> PageContent {
        PageContent {
            page_number: n,
            text: text.to_string(),
            tables: vec![],
        }
    }

    #[test]
    fn test_dump_joins_non_empty_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.txt");
        let pages = [page(1, "first"), page(2, "  \n"), page(3, "third")];
        assert!(write_raw_text_dump(&pages, &path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\n\nthird");
    }

    #[test]
    fn test_dump_skipped_without_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.txt");
        assert!(!write_raw_text_dump(&[page(1, "")], &path).unwrap());
        assert!(!path.exists());
    }
}
