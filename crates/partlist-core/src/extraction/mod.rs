pub mod pdftotext;
pub mod table;

use crate::error::PartlistError;

/// Untyped cell text as detected in a table. `None` for a missing cell.
pub type RawCell = Option<String>;
pub type RawRow = Vec<RawCell>;
pub type RawTable = Vec<RawRow>;

/// Content extracted from a single page of a PDF.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub page_number: usize,
    /// Plain page text, used for the line fallback and the raw-text dump.
    pub text: String,
    /// Tables detected on the page, in reading order.
    pub tables: Vec<RawTable>,
}

impl PageContent {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// Trait for PDF extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, PartlistError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
