use serde_json::{json, Map, Value};
use tracing::debug;

use crate::import::record::ImportRecord;
use crate::parsing::values::parse_amount_f64;

pub type Payload = Map<String, Value>;

/// Build the JSON body for creating one part. `index` is 1-based and only
/// used for the `ITEM_<index>` placeholder part number.
///
/// Numeric fields that fail to parse are left out. Fields that end up as
/// empty strings are dropped.
pub fn build_payload(record: &ImportRecord, index: usize) -> Payload {
    let part_no = if record.part_no.is_empty() {
        format!("ITEM_{index}")
    } else {
        record.part_no.clone()
    };
    let description = if record.description.is_empty() {
        part_no.clone()
    } else {
        record.description.clone()
    };

    let mut payload = Payload::new();
    let mut put = |key: &str, value: String| {
        payload.insert(key.to_string(), Value::String(value));
    };
    put("part_no", part_no.clone());
    put("master_part_no", record.master_part_no.clone());
    put("brand_name", record.brand_name.clone());
    put("description", description);
    put("category_id", record.category.clone());
    put("subcategory_id", record.subcategory.clone());
    put("application_id", record.application.clone());
    put("grade", record.grade.to_uppercase());
    put("origin", normalize_origin(&record.origin));
    put("size", record.size.clone());
    put("uom", default_to(&record.uom, "pcs"));
    put("status", default_to(&record.status, "active"));

    for (key, raw) in [
        ("cost", &record.cost),
        ("price_a", &record.price_a),
        ("price_b", &record.price_b),
    ] {
        if raw.trim().is_empty() {
            continue;
        }
        match parse_amount_f64(raw) {
            Some(n) => {
                payload.insert(key.to_string(), json!(n));
            }
            None => debug!(part_no = %part_no, field = key, value = %raw, "dropping non-numeric value"),
        }
    }

    if !record.model.is_empty() {
        payload.insert(
            "models".to_string(),
            json!([{ "name": record.model, "qty_used": 1 }]),
        );
    }

    payload.retain(|_, v| v.as_str() != Some(""));
    payload
}

/// Body for booking the opening stock of a newly created part.
pub fn build_stock_movement(part_id: &Value, quantity: f64, part_no: &str) -> Payload {
    let mut payload = Payload::new();
    payload.insert("part_id".to_string(), part_id.clone());
    payload.insert("type".to_string(), json!("in"));
    payload.insert("quantity".to_string(), json!(quantity));
    payload.insert(
        "notes".to_string(),
        json!(format!("Initial stock from import - Part: {part_no}")),
    );
    payload
}

/// Quantity worth booking: a number greater than zero.
pub fn stock_quantity(raw: &str) -> Option<f64> {
    parse_amount_f64(raw).filter(|q| *q > 0.0)
}

fn default_to(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Map free-form origin text onto the API's origin vocabulary.
pub fn normalize_origin(origin: &str) -> String {
    let lower = origin.trim().to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    let normalized = if has(&["local", "loc"]) {
        "local"
    } else if has(&["import", "imp"]) {
        "import"
    } else if has(&["china", "chn", "prc"]) {
        "china"
    } else if has(&["japan", "jap"]) {
        "japan"
    } else if has(&["germany", "ger"]) {
        "germany"
    } else if has(&["usa", "united states"]) {
        "usa"
    } else if has(&["ppr"]) {
        "ppr"
    } else {
        return lower;
    };
    normalized.to_string()
}

/// First `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
