use crate::model::{CanonicalColumn, NormalizedRecord, RecordBuffer};
use crate::parsing::header::normalize_header;

/// Best-effort record recovery from plain page text, used for pages where
/// no table was detected.
///
/// Two line shapes are understood:
/// - `Key: value` lines set the column the key normalizes to.
/// - Lines with 3+ values separated by a tab or a double space fill
///   `part no.` from the first value and further columns by position.
///
/// A record is emitted as soon as `part no.` is known after a delimited
/// line; whatever is buffered at the end of the page is dropped.
pub struct LineFallback<'a> {
    positions: &'a [CanonicalColumn],
    buffer: RecordBuffer,
    records: Vec<NormalizedRecord>,
}

impl<'a> LineFallback<'a> {
    /// `positions[i]` is the column for token `i + 1` of a delimited line.
    pub fn new(positions: &'a [CanonicalColumn]) -> Self {
        Self {
            positions,
            buffer: RecordBuffer::new(),
            records: Vec::new(),
        }
    }

    pub fn feed(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let parts: Vec<&str> = line.split(':').collect();
        if parts.len() == 2 {
            if let Some(column) = normalize_header(Some(parts[0].trim())) {
                self.buffer.set(column, parts[1].trim());
            }
            return;
        }

        let Some(values) = split_delimited(line) else {
            return;
        };
        if values.len() < 3 {
            return;
        }

        if !self.buffer.is_set(CanonicalColumn::PartNo) {
            self.buffer.set(CanonicalColumn::PartNo, values[0]);
        }
        for (value, column) in values[1..].iter().zip(self.positions) {
            if !self.buffer.is_set(*column) {
                self.buffer.set(*column, *value);
            }
        }

        if self.buffer.is_set(CanonicalColumn::PartNo) {
            let done = std::mem::take(&mut self.buffer);
            self.records.push(done.finish());
        }
    }

    pub fn finish(self) -> Vec<NormalizedRecord> {
        self.records
    }
}

/// Parse all lines of one page.
pub fn records_from_lines<'l>(
    lines: impl IntoIterator<Item = &'l str>,
    positions: &[CanonicalColumn],
) -> Vec<NormalizedRecord> {
    let mut parser = LineFallback::new(positions);
    for line in lines {
        parser.feed(line);
    }
    parser.finish()
}

/// Split on tabs when present, otherwise on double spaces. Returns the
/// trimmed non-empty values, or `None` if the line has neither delimiter.
fn split_delimited(line: &str) -> Option<Vec<&str>> {
    let raw: Vec<&str> = if line.contains('\t') {
        line.split('\t').collect()
    } else if line.contains("  ") {
        line.split("  ").collect()
    } else {
        return None;
    };

    Some(
        raw.into_iter()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect(),
    )
}
