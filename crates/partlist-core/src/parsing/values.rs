use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a price/cost cell into a number.
///
/// Handles formats like:
/// - "1250" -> 1250
/// - "1,250.00" -> 1250.00 (thousands separators stripped)
/// - " 12.5 " -> 12.5
/// - "1.2e3" -> 1200
///
/// Anything else ("N/A", "-", "") yields `None`.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned = s.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// Same as [`parse_amount`], as a JSON-friendly float.
pub fn parse_amount_f64(s: &str) -> Option<f64> {
    parse_amount(s)?.to_f64()
}
