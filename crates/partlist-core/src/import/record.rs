use crate::model::{CanonicalColumn, NormalizedRecord};
use crate::spreadsheet::SheetRow;

/// A record in inventory API terms. Empty strings mean "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRecord {
    pub part_no: String,
    pub master_part_no: String,
    pub brand_name: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub application: String,
    pub grade: String,
    pub origin: String,
    pub size: String,
    pub uom: String,
    pub cost: String,
    pub price_a: String,
    pub price_b: String,
    pub model: String,
    pub status: String,
    /// Opening stock, booked as a stock movement after the part is created.
    pub qty: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    PartNo,
    MasterPartNo,
    BrandName,
    Description,
    Category,
    Subcategory,
    Application,
    Grade,
    Origin,
    Size,
    Uom,
    Cost,
    PriceA,
    PriceB,
    Model,
    Qty,
}

/// Spreadsheet header aliases, matched exactly against the lower-cased,
/// trimmed header. For each field the first alias with a non-empty value wins.
const SHEET_ALIASES: &[(Field, &[&str])] = &[
    (
        Field::PartNo,
        &["part_no", "part no", "part no.", "part number", "partnumber", "part#", "part #"],
    ),
    (Field::BrandName, &["brand", "brand_name", "brand name", "manufacturer"]),
    (
        Field::Description,
        &["description", "desc", "decc", "item description", "name", "item name"],
    ),
    (
        Field::Category,
        &["category", "category_id", "category name", "main", "main category"],
    ),
    (
        Field::Subcategory,
        &["subcategory", "subcategory_id", "subcategory name", "sub", "sub category"],
    ),
    (Field::Application, &["application", "application_id", "application name"]),
    (Field::Grade, &["grade", "application grade"]),
    (Field::Origin, &["origin"]),
    (Field::Size, &["size"]),
    (Field::Model, &["model"]),
    (Field::Uom, &["uom", "unit", "unit of measure", "unit_of_measure"]),
    (Field::Cost, &["cost", "purchase price", "purchase_price", "buying price"]),
    (
        Field::PriceA,
        &["price", "price_a", "price a", "sale price", "sale_price", "selling price"],
    ),
    (Field::PriceB, &["price_b", "price b"]),
    (Field::Qty, &["qty", "quantity"]),
    (
        Field::MasterPartNo,
        &["master_part_no", "master part no", "master part number", "ss part no"],
    ),
];

impl ImportRecord {
    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::PartNo => &mut self.part_no,
            Field::MasterPartNo => &mut self.master_part_no,
            Field::BrandName => &mut self.brand_name,
            Field::Description => &mut self.description,
            Field::Category => &mut self.category,
            Field::Subcategory => &mut self.subcategory,
            Field::Application => &mut self.application,
            Field::Grade => &mut self.grade,
            Field::Origin => &mut self.origin,
            Field::Size => &mut self.size,
            Field::Uom => &mut self.uom,
            Field::Cost => &mut self.cost,
            Field::PriceA => &mut self.price_a,
            Field::PriceB => &mut self.price_b,
            Field::Model => &mut self.model,
            Field::Qty => &mut self.qty,
        }
    }

    /// Build a record from an arbitrary spreadsheet row.
    ///
    /// Returns `None` when the row has neither a part number nor a
    /// description. A missing part number is taken from the description.
    pub fn from_sheet_row(row: &SheetRow) -> Option<Self> {
        let cells: Vec<(String, &str)> = row
            .iter()
            .map(|(h, v)| (h.trim().to_lowercase(), v.trim()))
            .collect();

        let mut record = ImportRecord::default();
        for (field, aliases) in SHEET_ALIASES {
            let found = aliases.iter().find_map(|alias| {
                cells
                    .iter()
                    .find(|(h, v)| h == alias && !v.is_empty())
                    .map(|(_, v)| *v)
            });
            if let Some(value) = found {
                *record.field_mut(*field) = value.to_string();
            }
        }

        if record.part_no.is_empty() && record.description.is_empty() {
            return None;
        }
        if record.part_no.is_empty() {
            record.part_no = record.description.clone();
        }
        Some(record)
    }
}

impl From<&NormalizedRecord> for ImportRecord {
    fn from(r: &NormalizedRecord) -> Self {
        let get = |c: CanonicalColumn| r.get(c).to_string();
        ImportRecord {
            part_no: get(CanonicalColumn::PartNo),
            master_part_no: get(CanonicalColumn::SsPartNo),
            brand_name: get(CanonicalColumn::Brand),
            description: get(CanonicalColumn::Decc),
            category: get(CanonicalColumn::Main),
            subcategory: get(CanonicalColumn::Sub),
            grade: get(CanonicalColumn::ApplicationGrade),
            origin: get(CanonicalColumn::Origin),
            size: get(CanonicalColumn::Size),
            cost: get(CanonicalColumn::Cost),
            price_a: get(CanonicalColumn::PriceA),
            price_b: get(CanonicalColumn::PriceB),
            model: get(CanonicalColumn::Model),
            qty: get(CanonicalColumn::Qty),
            ..Default::default()
        }
    }
}
