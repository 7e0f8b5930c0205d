use std::path::Path;

use calamine::{Reader, Xlsx};
use rust_xlsxwriter::{Color, Format, Workbook};
use tracing::info;

use crate::error::PartlistError;
use crate::model::{CanonicalColumn, NormalizedRecord};

pub const SHEET_NAME: &str = "Items";

/// Rows of cell text in the order of `columns`, skipping rows that render
/// entirely empty.
pub fn render_rows(records: &[NormalizedRecord], columns: &[CanonicalColumn]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            r.render(columns)
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .collect()
}

/// Write records to an xlsx workbook with a header row of canonical names.
///
/// Returns the number of data rows written.
pub fn write_records(
    records: &[NormalizedRecord],
    columns: &[CanonicalColumn],
    path: &Path,
) -> Result<usize, PartlistError> {
    if records.is_empty() {
        return Err(PartlistError::EmptyRecords);
    }

    let rows = render_rows(records, columns);
    let write_err = |e: rust_xlsxwriter::XlsxError| PartlistError::SpreadsheetWrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let mut workbook = Workbook::new();
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xE0E0E0));

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME).map_err(write_err)?;

    for (col, column) in columns.iter().enumerate() {
        let col = col as u16;
        sheet
            .write_string_with_format(0, col, column.as_str(), &header_format)
            .map_err(write_err)?;
        sheet
            .set_column_width(col, column_width(*column))
            .map_err(write_err)?;
    }
    sheet.set_freeze_panes(1, 0).map_err(write_err)?;

    for (i, cells) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in cells.iter().enumerate() {
            if !value.is_empty() {
                sheet
                    .write_string(row, col as u16, value.as_str())
                    .map_err(write_err)?;
            }
        }
    }

    workbook.save(path).map_err(write_err)?;
    info!(rows = rows.len(), path = %path.display(), "spreadsheet written");

    Ok(rows.len())
}

fn column_width(column: CanonicalColumn) -> f64 {
    match column {
        CanonicalColumn::Decc => 40.0,
        CanonicalColumn::PartNo | CanonicalColumn::SsPartNo => 20.0,
        CanonicalColumn::ApplicationGrade | CanonicalColumn::Remarks => 18.0,
        _ => 12.0,
    }
}

/// A spreadsheet row as header text → cell text, in column order.
pub type SheetRow = Vec<(String, String)>;

/// Read the first worksheet of an xlsx file. Row 0 is the header; rows
/// without any non-empty cell are skipped.
pub fn read_rows(path: &Path) -> Result<Vec<SheetRow>, PartlistError> {
    let mut workbook: Xlsx<_> = calamine::open_workbook(path).map_err(|e: calamine::XlsxError| {
        PartlistError::SpreadsheetRead(format!("failed to open {}: {e}", path.display()))
    })?;

    let sheet = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PartlistError::SpreadsheetRead("workbook has no sheets".into()))?
        .map_err(|e| PartlistError::SpreadsheetRead(e.to_string()))?;

    let mut rows = sheet.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .map(|c| cell_as_string(c).unwrap_or_default())
            .collect(),
        None => return Ok(Vec::new()),
    };

    let out = rows
        .map(|row| {
            headers
                .iter()
                .zip(row.iter())
                .filter(|(h, _)| !h.is_empty())
                .map(|(h, c)| (h.clone(), cell_as_string(c).unwrap_or_default()))
                .collect::<SheetRow>()
        })
        .filter(|row| row.iter().any(|(_, v)| !v.is_empty()))
        .collect();

    Ok(out)
}

fn cell_as_string(cell: &calamine::Data) -> Option<String> {
    match cell {
        calamine::Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        calamine::Data::Float(f) => Some(f.to_string()),
        calamine::Data::Int(i) => Some(i.to_string()),
        calamine::Data::DateTime(dt) => Some(dt.to_string()),
        calamine::Data::Empty => None,
        _ => Some(format!("{cell}")),
    }
}
