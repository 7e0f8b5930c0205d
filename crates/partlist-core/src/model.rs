use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// The fixed set of output columns every extracted row is normalized into.
///
/// Declaration order is the spreadsheet column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalColumn {
    #[serde(rename = "part no.")]
    PartNo,
    #[serde(rename = "ss part no")]
    SsPartNo,
    #[serde(rename = "origin")]
    Origin,
    #[serde(rename = "decc")]
    Decc,
    #[serde(rename = "application grade")]
    ApplicationGrade,
    #[serde(rename = "main")]
    Main,
    #[serde(rename = "sub")]
    Sub,
    #[serde(rename = "size")]
    Size,
    #[serde(rename = "brand")]
    Brand,
    #[serde(rename = "remarks")]
    Remarks,
    #[serde(rename = "loc")]
    Loc,
    #[serde(rename = "cost")]
    Cost,
    #[serde(rename = "mkt")]
    Mkt,
    #[serde(rename = "price a")]
    PriceA,
    #[serde(rename = "price b")]
    PriceB,
    #[serde(rename = "model")]
    Model,
    #[serde(rename = "qty")]
    Qty,
}

impl CanonicalColumn {
    pub const COUNT: usize = 17;

    pub const ALL: [CanonicalColumn; Self::COUNT] = [
        CanonicalColumn::PartNo,
        CanonicalColumn::SsPartNo,
        CanonicalColumn::Origin,
        CanonicalColumn::Decc,
        CanonicalColumn::ApplicationGrade,
        CanonicalColumn::Main,
        CanonicalColumn::Sub,
        CanonicalColumn::Size,
        CanonicalColumn::Brand,
        CanonicalColumn::Remarks,
        CanonicalColumn::Loc,
        CanonicalColumn::Cost,
        CanonicalColumn::Mkt,
        CanonicalColumn::PriceA,
        CanonicalColumn::PriceB,
        CanonicalColumn::Model,
        CanonicalColumn::Qty,
    ];

    /// Column name as written to the spreadsheet header.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalColumn::PartNo => "part no.",
            CanonicalColumn::SsPartNo => "ss part no",
            CanonicalColumn::Origin => "origin",
            CanonicalColumn::Decc => "decc",
            CanonicalColumn::ApplicationGrade => "application grade",
            CanonicalColumn::Main => "main",
            CanonicalColumn::Sub => "sub",
            CanonicalColumn::Size => "size",
            CanonicalColumn::Brand => "brand",
            CanonicalColumn::Remarks => "remarks",
            CanonicalColumn::Loc => "loc",
            CanonicalColumn::Cost => "cost",
            CanonicalColumn::Mkt => "mkt",
            CanonicalColumn::PriceA => "price a",
            CanonicalColumn::PriceB => "price b",
            CanonicalColumn::Model => "model",
            CanonicalColumn::Qty => "qty",
        }
    }

    /// Position in the canonical order.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for CanonicalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable row under construction. Every column starts as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordBuffer {
    values: [String; CanonicalColumn::COUNT],
}

impl RecordBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: CanonicalColumn) -> &str {
        &self.values[column.index()]
    }

    pub fn set(&mut self, column: CanonicalColumn, value: impl Into<String>) {
        self.values[column.index()] = value.into();
    }

    pub fn is_set(&self, column: CanonicalColumn) -> bool {
        !self.values[column.index()].is_empty()
    }

    /// True if any of the first `n` canonical columns holds a value.
    pub fn has_value_in_first(&self, n: usize) -> bool {
        self.values.iter().take(n).any(|v| !v.is_empty())
    }

    pub fn finish(self) -> NormalizedRecord {
        NormalizedRecord {
            values: self.values,
        }
    }
}

/// A single catalog entry with every canonical column present.
///
/// Immutable once built; construct through [`RecordBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    values: [String; CanonicalColumn::COUNT],
}

impl NormalizedRecord {
    pub fn get(&self, column: CanonicalColumn) -> &str {
        &self.values[column.index()]
    }

    /// Values in the order of `columns`.
    pub fn render(&self, columns: &[CanonicalColumn]) -> Vec<&str> {
        columns.iter().map(|c| self.get(*c)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalColumn, &str)> {
        CanonicalColumn::ALL
            .iter()
            .map(move |c| (*c, self.values[c.index()].as_str()))
    }
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CanonicalColumn::COUNT))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column.as_str(), value)?;
        }
        map.end()
    }
}
