use crate::extraction::{RawRow, RawTable};
use crate::model::CanonicalColumn;

/// Header aliases in match order. The first alias contained in the header
/// text wins, so `part no` shadows `ss part no`.
const ALIASES: &[(&str, CanonicalColumn)] = &[
    ("part no", CanonicalColumn::PartNo),
    ("part no.", CanonicalColumn::PartNo),
    ("part number", CanonicalColumn::PartNo),
    ("part#", CanonicalColumn::PartNo),
    ("part #", CanonicalColumn::PartNo),
    ("ss part no", CanonicalColumn::SsPartNo),
    ("ss part no.", CanonicalColumn::SsPartNo),
    ("ss part number", CanonicalColumn::SsPartNo),
    ("origin", CanonicalColumn::Origin),
    ("decc", CanonicalColumn::Decc),
    ("desc", CanonicalColumn::Decc),
    ("description", CanonicalColumn::Decc),
    ("application grade", CanonicalColumn::ApplicationGrade),
    ("app grade", CanonicalColumn::ApplicationGrade),
    ("grade", CanonicalColumn::ApplicationGrade),
    ("main", CanonicalColumn::Main),
    ("sub", CanonicalColumn::Sub),
    ("subcategory", CanonicalColumn::Sub),
    ("size", CanonicalColumn::Size),
    ("brand", CanonicalColumn::Brand),
    ("brand name", CanonicalColumn::Brand),
    ("remarks", CanonicalColumn::Remarks),
    ("remark", CanonicalColumn::Remarks),
    ("loc", CanonicalColumn::Loc),
    ("location", CanonicalColumn::Loc),
    ("cost", CanonicalColumn::Cost),
    ("mkt", CanonicalColumn::Mkt),
    ("market", CanonicalColumn::Mkt),
    ("price a", CanonicalColumn::PriceA),
    ("pricea", CanonicalColumn::PriceA),
    ("price_a", CanonicalColumn::PriceA),
    ("price b", CanonicalColumn::PriceB),
    ("priceb", CanonicalColumn::PriceB),
    ("price_b", CanonicalColumn::PriceB),
    ("model", CanonicalColumn::Model),
    ("qty", CanonicalColumn::Qty),
    ("quantity", CanonicalColumn::Qty),
];

/// Map header text to its canonical column by substring match.
///
/// Returns `None` for absent, blank or unrecognized headers.
pub fn normalize_header(header: Option<&str>) -> Option<CanonicalColumn> {
    let lower = header?.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }
    ALIASES
        .iter()
        .find(|(alias, _)| lower.contains(*alias))
        .map(|(_, column)| *column)
}

/// Index of the header row within a table.
///
/// The first of the leading `scan_rows` rows whose joined text contains a
/// header keyword; row 0 when none does.
pub fn find_header_row(table: &RawTable, keywords: &[String], scan_rows: usize) -> usize {
    table
        .iter()
        .take(scan_rows)
        .position(|row| {
            let text = row_text(row);
            keywords.iter().any(|kw| text.contains(kw.as_str()))
        })
        .unwrap_or(0)
}

/// Position → canonical column mapping for a header row.
pub fn column_mapping(header: &RawRow) -> Vec<Option<CanonicalColumn>> {
    header
        .iter()
        .map(|cell| normalize_header(cell.as_deref()))
        .collect()
}

fn row_text(row: &RawRow) -> String {
    row.iter()
        .map(|cell| cell.as_deref().unwrap_or("").to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
