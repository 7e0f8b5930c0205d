use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PartlistError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("no rows extracted from PDF")]
    NoRowsExtracted {
        /// Where the raw page text was saved, if anything was written.
        dump: Option<PathBuf>,
    },

    #[error("no records to write")]
    EmptyRecords,

    #[error("failed to write spreadsheet {path}: {reason}")]
    SpreadsheetWrite { path: PathBuf, reason: String },

    #[error("failed to read spreadsheet: {0}")]
    SpreadsheetRead(String),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("cannot reach inventory API at {url}: {reason}")]
    ApiUnavailable { url: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
