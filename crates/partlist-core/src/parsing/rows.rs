use crate::config::ExtractionConfig;
use crate::extraction::{RawRow, RawTable};
use crate::model::{CanonicalColumn, NormalizedRecord, RecordBuffer};
use crate::parsing::header::{column_mapping, find_header_row};

/// Turn one detected table into normalized records.
///
/// Tables with fewer than two rows carry no data and are skipped. Rows
/// after the header row become records; blank rows and rows without a
/// value in the leading `meaningful_columns` are dropped.
pub fn records_from_table(table: &RawTable, config: &ExtractionConfig) -> Vec<NormalizedRecord> {
    if table.len() < 2 {
        return Vec::new();
    }

    let header_idx = find_header_row(table, &config.header_keywords, config.header_scan_rows);
    let mapping = column_mapping(&table[header_idx]);

    table[header_idx + 1..]
        .iter()
        .filter(|row| !is_blank_row(row))
        .filter_map(|row| build_record(row, &mapping, config.meaningful_columns))
        .collect()
}

/// Build a record from a data row using a position → column mapping.
///
/// Returns `None` when the row is not meaningful.
pub fn build_record(
    row: &RawRow,
    mapping: &[Option<CanonicalColumn>],
    meaningful_columns: usize,
) -> Option<NormalizedRecord> {
    let mut buffer = RecordBuffer::new();
    for (cell, column) in row.iter().zip(mapping) {
        if let Some(column) = column {
            buffer.set(*column, cell.as_deref().unwrap_or("").trim());
        }
    }

    if buffer.has_value_in_first(meaningful_columns) {
        Some(buffer.finish())
    } else {
        None
    }
}

fn is_blank_row(row: &RawRow) -> bool {
    row.iter()
        .all(|cell| cell.as_deref().map_or(true, |c| c.trim().is_empty()))
}
