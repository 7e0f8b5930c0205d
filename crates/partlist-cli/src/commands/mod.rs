pub mod convert;
pub mod import;
pub mod parse;

use partlist_core::config::Config;
use partlist_core::error::PartlistError;
use partlist_core::extraction::pdftotext::PdftotextExtractor;
use partlist_core::parsing::ParsedCatalog;

/// Read the configured PDF and extract its records.
pub(crate) fn extract(config: &Config) -> Result<ParsedCatalog, PartlistError> {
    if !PdftotextExtractor::is_available() {
        return Err(PartlistError::PdftotextNotFound);
    }
    let path = &config.paths.input_pdf;
    eprintln!("Reading {}", path.display());
    let pdf_bytes = std::fs::read(path)?;
    let extractor = PdftotextExtractor::new(config.extraction.header_keywords.clone());

    let result = partlist_core::extract_records(&pdf_bytes, &extractor, config);
    if let Err(PartlistError::NoRowsExtracted { dump: Some(path) }) = &result {
        eprintln!(
            "No rows found. Raw page text is in {} for inspection.",
            path.display()
        );
    }
    result
}
