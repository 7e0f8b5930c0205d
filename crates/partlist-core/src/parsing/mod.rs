pub mod fallback;
pub mod header;
pub mod rows;
pub mod values;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::ExtractionConfig;
use crate::extraction::PageContent;
use crate::model::NormalizedRecord;
use fallback::records_from_lines;
use rows::records_from_table;

/// Records recovered from a document, plus per-page diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedCatalog {
    pub records: Vec<NormalizedRecord>,
    pub pages: Vec<PageSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    pub page_number: usize,
    pub method: PageMethod,
    pub tables: usize,
    pub records: usize,
}

/// How rows were recovered from a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageMethod {
    Tables,
    TextFallback,
}

impl ParsedCatalog {
    pub fn pages_with(&self, method: PageMethod) -> usize {
        self.pages.iter().filter(|p| p.method == method).count()
    }
}

/// Parse extracted pages into normalized records, in page order.
///
/// Pages with detected tables use the table rows; pages without any table
/// fall back to line heuristics over the page text.
pub fn parse_pages(pages: &[PageContent], config: &ExtractionConfig) -> ParsedCatalog {
    let mut catalog = ParsedCatalog::default();
    let total = pages.len();

    for page in pages {
        if page.page_number % 10 == 0 {
            info!("processing page {}/{}", page.page_number, total);
        }

        let (method, records) = if page.tables.is_empty() {
            (
                PageMethod::TextFallback,
                records_from_lines(page.lines(), &config.fallback_positions),
            )
        } else {
            let records: Vec<NormalizedRecord> = page
                .tables
                .iter()
                .flat_map(|table| records_from_table(table, config))
                .collect();
            (PageMethod::Tables, records)
        };

        debug!(
            page = page.page_number,
            tables = page.tables.len(),
            records = records.len(),
            ?method,
            "parsed page"
        );

        catalog.pages.push(PageSummary {
            page_number: page.page_number,
            method,
            tables: page.tables.len(),
            records: records.len(),
        });
        catalog.records.extend(records);
    }

    catalog
}
