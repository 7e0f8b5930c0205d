use partlist_core::config::Config;
use partlist_core::error::PartlistError;
use partlist_core::import::record::ImportRecord;
use partlist_core::spreadsheet::write_records;
use tracing::error;

use crate::commands::import::{confirm, submit, IMPORT_PROMPT};
use crate::output;

/// What to do once the spreadsheet is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportChoice {
    Ask,
    Yes,
    Skip,
}

pub fn run(config: &Config, choice: ImportChoice) -> Result<(), PartlistError> {
    let catalog = super::extract(config)?;
    output::table::print_catalog_summary(&catalog);

    let out = &config.paths.output_xlsx;
    let written = write_records(&catalog.records, &config.extraction.columns, out);
    match &written {
        Ok(rows) => println!("Saved {rows} rows to {}", out.display()),
        Err(e) => {
            error!("spreadsheet export failed: {e}");
            eprintln!("Could not save {}: {e}", out.display());
        }
    }

    let wants_import = match choice {
        ImportChoice::Yes => true,
        ImportChoice::Skip => false,
        ImportChoice::Ask => confirm(IMPORT_PROMPT)?,
    };
    if wants_import {
        let records: Vec<ImportRecord> = catalog.records.iter().map(ImportRecord::from).collect();
        submit(&config.api, &records)?;
    } else {
        println!("Import skipped.");
    }

    written.map(|_| ())
}
