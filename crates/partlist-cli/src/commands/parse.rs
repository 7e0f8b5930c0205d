use partlist_core::config::Config;
use partlist_core::error::PartlistError;

use crate::output;

pub fn run(config: &Config, output_format: &str) -> Result<(), PartlistError> {
    let catalog = super::extract(config)?;

    match output_format {
        "json" => output::json::print(&catalog)?,
        _ => {
            output::table::print_records(&catalog.records, &config.extraction.columns);
            output::table::print_catalog_summary(&catalog);
        }
    }

    Ok(())
}
