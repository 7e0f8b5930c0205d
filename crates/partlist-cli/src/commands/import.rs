use std::io::{self, BufRead, Write};

use partlist_core::config::{ApiConfig, Config};
use partlist_core::error::PartlistError;
use partlist_core::import::client::{HttpPartsApi, PartsApi};
use partlist_core::import::record::ImportRecord;
use partlist_core::import::{import_records, records_from_spreadsheet, ImportOptions, ImportSummary};
use tracing::info;

use crate::output;

pub const IMPORT_PROMPT: &str = "Do you want to import items to the app now? (y/n)";

pub fn run(config: &Config, yes: bool) -> Result<(), PartlistError> {
    let path = &config.paths.output_xlsx;
    let records = records_from_spreadsheet(path)?;
    if records.is_empty() {
        return Err(PartlistError::EmptyRecords);
    }
    println!("Loaded {} items from {}", records.len(), path.display());

    if yes || confirm(IMPORT_PROMPT)? {
        submit(&config.api, &records)?;
    } else {
        println!("Import skipped.");
    }
    Ok(())
}

/// Push records to the API and print the summary. An unreachable API
/// still prints a summary, with zero counts, before the error is returned.
pub fn submit(config: &ApiConfig, records: &[ImportRecord]) -> Result<ImportSummary, PartlistError> {
    let api = HttpPartsApi::new(config)?;
    println!("Importing {} items to {}...", records.len(), api.base_url());

    let result = import_records(&api, records, &ImportOptions::from(config), |done, total| {
        if done % 10 == 0 {
            info!("imported {done}/{total} items");
        }
    });

    if let Some(summary) = summary_to_print(&result) {
        output::table::print_import_summary(&summary);
    }
    result
}

fn summary_to_print(result: &Result<ImportSummary, PartlistError>) -> Option<ImportSummary> {
    match result {
        Ok(summary) => Some(summary.clone()),
        Err(PartlistError::ApiUnavailable { .. }) => Some(ImportSummary::default()),
        Err(_) => None,
    }
}

/// Ask a yes/no question on stdin. Only "y" or "yes" count as yes.
pub fn confirm(prompt: &str) -> Result<bool, PartlistError> {
    print!("{prompt} ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn test_unreachable_api_prints_zero_summary() {
        let result = Err(PartlistError::ApiUnavailable {
            url: "http://localhost:3001/api".into(),
            reason: "connection refused".into(),
        });
        let summary = summary_to_print(&result).unwrap();
        assert_eq!(summary, ImportSummary::default());
        assert_eq!(summary.success, 0);
        assert_eq!(summary.error_count, 0);
    }

    #[test]
    fn test_summary_to_print() {
        let done = ImportSummary {
            success: 3,
            ..Default::default()
        };
        assert_eq!(summary_to_print(&Ok(done.clone())), Some(done));
        assert_eq!(summary_to_print(&Err(PartlistError::EmptyRecords)), None);
    }

    #[test]
    fn test_unreachable_server_yields_error_and_zero_summary() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = ApiConfig {
            base_url: format!("http://127.0.0.1:{port}/api"),
            ..ApiConfig::default()
        };
        let records = [ImportRecord {
            part_no: "A100".into(),
            ..Default::default()
        }];
        let result = submit(&config, &records);
        assert!(matches!(result, Err(PartlistError::ApiUnavailable { .. })));
        assert_eq!(summary_to_print(&result), Some(ImportSummary::default()));
    }
}
