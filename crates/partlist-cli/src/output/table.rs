use partlist_core::import::ImportSummary;
use partlist_core::model::{CanonicalColumn, NormalizedRecord};
use partlist_core::parsing::{PageMethod, ParsedCatalog};

/// Print records as an aligned text table. Columns empty in every record
/// are left out.
pub fn print_records(records: &[NormalizedRecord], columns: &[CanonicalColumn]) {
    if records.is_empty() {
        println!("  (no records)");
        return;
    }

    let shown: Vec<CanonicalColumn> = columns
        .iter()
        .copied()
        .filter(|c| records.iter().any(|r| !r.get(*c).is_empty()))
        .collect();

    let widths: Vec<usize> = shown
        .iter()
        .map(|c| {
            records
                .iter()
                .map(|r| r.get(*c).chars().count())
                .chain(std::iter::once(c.as_str().len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = shown
        .iter()
        .zip(&widths)
        .map(|(c, &w)| format!("{:<w$}", c.as_str()))
        .collect();
    println!("  {}", header.join("  ").trim_end());
    println!("  {}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));

    for record in records {
        let cells: Vec<String> = shown
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{:<w$}", record.get(*c)))
            .collect();
        println!("  {}", cells.join("  ").trim_end());
    }
    println!();
}

pub fn print_catalog_summary(catalog: &ParsedCatalog) {
    println!(
        "Extracted {} records from {} pages ({} with tables, {} via text fallback)",
        catalog.records.len(),
        catalog.pages.len(),
        catalog.pages_with(PageMethod::Tables),
        catalog.pages_with(PageMethod::TextFallback),
    );
}

pub fn print_import_summary(summary: &ImportSummary) {
    println!("\nImport summary:");
    println!("  Success: {}", summary.success);
    println!("  Errors:  {}", summary.error_count);
    if summary.stock_movements > 0 {
        println!("  Stock movements: {}", summary.stock_movements);
    }

    let shown = summary.first_errors();
    if !shown.is_empty() {
        println!("\nFirst {} errors:", shown.len());
        for message in shown {
            println!("  {message}");
        }
    }
}
