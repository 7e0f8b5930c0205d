pub mod client;
pub mod payload;
pub mod record;

use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::error::PartlistError;
use crate::spreadsheet;
use client::PartsApi;
use payload::{build_payload, build_stock_movement, stock_quantity, truncate_chars};
use record::ImportRecord;

/// How many error messages a summary reports.
pub const ERROR_REPORT_LIMIT: usize = 10;

const MESSAGE_CHARS: usize = 100;

/// Outcome of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub success: usize,
    pub error_count: usize,
    /// One message per failed record, in submission order.
    pub errors: Vec<String>,
    /// Opening-stock movements booked for created parts.
    pub stock_movements: usize,
}

/// Knobs for an import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Book each created part's quantity as an inbound stock movement.
    pub stock_movements: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for ImportOptions {
    fn from(config: &ApiConfig) -> Self {
        Self {
            stock_movements: config.stock_movements,
        }
    }
}

impl ImportSummary {
    pub fn first_errors(&self) -> &[String] {
        &self.errors[..self.errors.len().min(ERROR_REPORT_LIMIT)]
    }
}

struct PendingStock {
    part_id: Value,
    quantity: f64,
    part_no: String,
}

/// Read import records from the first sheet of an xlsx file. Rows without
/// a part number or description are skipped.
pub fn records_from_spreadsheet(path: &Path) -> Result<Vec<ImportRecord>, PartlistError> {
    let rows = spreadsheet::read_rows(path)?;
    let total = rows.len();
    let records: Vec<ImportRecord> = rows.iter().filter_map(ImportRecord::from_sheet_row).collect();
    if records.len() < total {
        debug!(skipped = total - records.len(), "rows without part number or description");
    }
    Ok(records)
}

/// Submit every record to the API, one request each.
///
/// The API is health-checked first; if it does not answer 200 nothing is submitted
/// and `ApiUnavailable` is returned. Per-record failures are collected in
/// the summary and never stop the loop. `progress` is called after each
/// record with `(done, total)`.
///
/// With `options.stock_movements`, every created part whose response body
/// carries an `id` and whose quantity is above zero then gets an inbound
/// stock movement. A transport error stops that phase; the parts stay.
pub fn import_records<A>(
    api: &A,
    records: &[ImportRecord],
    options: &ImportOptions,
    mut progress: impl FnMut(usize, usize),
) -> Result<ImportSummary, PartlistError>
where
    A: PartsApi + ?Sized,
{
    let unavailable = |reason: String| PartlistError::ApiUnavailable {
        url: api.base_url().to_string(),
        reason,
    };
    match api.health_check() {
        Ok(200) => {}
        Ok(status) => return Err(unavailable(format!("health check returned HTTP {status}"))),
        Err(e) => return Err(unavailable(e.to_string())),
    }

    info!(records = records.len(), url = api.base_url(), "importing records");

    let total = records.len();
    let mut summary = ImportSummary::default();
    let mut pending = Vec::new();

    for (i, record) in records.iter().enumerate() {
        let index = i + 1;
        let payload = build_payload(record, index);
        let part_no = payload
            .get("part_no")
            .and_then(|v| v.as_str())
            .unwrap_or("N/A")
            .to_string();

        let failure = match api.create_part(&payload) {
            Ok(response) if response.is_created() => {
                let quantity = stock_quantity(&record.qty);
                if let (Some(part_id), Some(quantity)) = (response.created_id(), quantity) {
                    pending.push(PendingStock {
                        part_id,
                        quantity,
                        part_no: part_no.clone(),
                    });
                }
                None
            }
            Ok(response) => Some(format!(
                "Item {index} ({part_no}): {} - {}",
                response.status,
                truncate_chars(&response.body, MESSAGE_CHARS)
            )),
            Err(e) => Some(format!(
                "Item {index} ({part_no}): {}",
                truncate_chars(&e.to_string(), MESSAGE_CHARS)
            )),
        };

        match failure {
            None => summary.success += 1,
            Some(message) => {
                warn!("{message}");
                summary.error_count += 1;
                summary.errors.push(message);
            }
        }
        progress(index, total);
    }

    if options.stock_movements && !pending.is_empty() {
        summary.stock_movements = book_stock(api, &pending);
    }

    info!(
        success = summary.success,
        errors = summary.error_count,
        stock_movements = summary.stock_movements,
        "import finished"
    );
    Ok(summary)
}

/// Returns how many movements the API accepted.
fn book_stock<A>(api: &A, pending: &[PendingStock]) -> usize
where
    A: PartsApi + ?Sized,
{
    info!(parts = pending.len(), "booking opening stock");
    let mut booked = 0;
    for stock in pending {
        let payload = build_stock_movement(&stock.part_id, stock.quantity, &stock.part_no);
        match api.create_stock_movement(&payload) {
            Ok(response) if response.is_created() => booked += 1,
            Ok(response) => debug!(
                part_no = %stock.part_no,
                status = response.status,
                "stock movement rejected"
            ),
            Err(e) => {
                warn!("stock movement endpoint not available, skipping quantities: {e}");
                break;
            }
        }
    }
    booked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::client::ApiResponse;
    use crate::import::payload::Payload;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::io;

    struct MockApi {
        health: Result<u16, ()>,
        statuses: RefCell<Vec<u16>>,
        /// Part numbers whose create request fails in transport.
        broken: HashSet<String>,
        /// Body returned for created parts.
        created_body: fn(usize) -> String,
        stock_result: Result<u16, ()>,
        submitted: RefCell<Vec<Payload>>,
        movements: RefCell<Vec<Payload>>,
    }

    impl MockApi {
        fn new(health: u16, statuses: &[u16]) -> Self {
            Self {
                health: Ok(health),
                statuses: RefCell::new(statuses.iter().rev().copied().collect()),
                broken: HashSet::new(),
                created_body: |_| "x".repeat(150),
                stock_result: Ok(201),
                submitted: RefCell::new(Vec::new()),
                movements: RefCell::new(Vec::new()),
            }
        }

        fn with_ids() -> Self {
            Self {
                created_body: |n| format!(r#"{{"id": {n}}}"#),
                ..Self::new(200, &[])
            }
        }
    }

    impl PartsApi for MockApi {
        fn health_check(&self) -> Result<u16, PartlistError> {
            self.health
                .map_err(|_| PartlistError::Extraction("connection refused".into()))
        }

        fn create_part(&self, payload: &Payload) -> Result<ApiResponse, PartlistError> {
            self.submitted.borrow_mut().push(payload.clone());
            let part_no = payload["part_no"].as_str().unwrap_or_default();
            if self.broken.contains(part_no) {
                let reason = format!("connection reset while sending {part_no}: {}", "y".repeat(200));
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, reason).into());
            }
            let status = self.statuses.borrow_mut().pop().unwrap_or(201);
            Ok(ApiResponse {
                status,
                body: (self.created_body)(self.submitted.borrow().len()),
            })
        }

        fn create_stock_movement(&self, payload: &Payload) -> Result<ApiResponse, PartlistError> {
            self.movements.borrow_mut().push(payload.clone());
            match self.stock_result {
                Ok(status) => Ok(ApiResponse {
                    status,
                    body: String::new(),
                }),
                Err(()) => Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused").into()),
            }
        }

        fn base_url(&self) -> &str {
            "http://mock/api"
        }
    }

    fn records(n: usize) -> Vec<ImportRecord> {
        (0..n)
            .map(|i| ImportRecord {
                part_no: format!("P{i}"),
                ..Default::default()
            })
            .collect()
    }

    fn with_qty(qtys: &[&str]) -> Vec<ImportRecord> {
        records(qtys.len())
            .into_iter()
            .zip(qtys)
            .map(|(r, q)| ImportRecord {
                qty: q.to_string(),
                ..r
            })
            .collect()
    }

    fn import(api: &MockApi, records: &[ImportRecord]) -> Result<ImportSummary, PartlistError> {
        import_records(api, records, &ImportOptions::default(), |_, _| {})
    }

    #[test]
    fn test_health_failure_aborts_before_submitting() {
        let api = MockApi::new(500, &[]);
        let err = import(&api, &records(3)).unwrap_err();
        assert!(matches!(err, PartlistError::ApiUnavailable { .. }));
        assert!(err.to_string().contains("500"));
        assert!(api.submitted.borrow().is_empty());
    }

    #[test]
    fn test_health_transport_error_aborts() {
        let api = MockApi {
            health: Err(()),
            ..MockApi::new(200, &[])
        };
        assert!(import(&api, &records(1)).is_err());
        assert!(api.submitted.borrow().is_empty());
    }

    #[test]
    fn test_counts_and_error_messages() {
        let api = MockApi::new(200, &[201, 200, 400, 201]);
        let summary = import(&api, &records(4)).unwrap();
        assert_eq!(summary.success, 3);
        assert_eq!(summary.error_count, 1);
        let expected = format!("Item 3 (P2): 400 - {}", "x".repeat(100));
        assert_eq!(summary.errors, vec![expected]);
    }

    #[test]
    fn test_transport_error_counted_and_loop_continues() {
        let api = MockApi {
            broken: ["P1".to_string(), "P3".to_string()].into(),
            ..MockApi::new(200, &[])
        };
        let summary = import(&api, &records(5)).unwrap();

        assert_eq!(api.submitted.borrow().len(), 5);
        assert_eq!(summary.success, 3);
        assert_eq!(summary.error_count, 2);

        let reason = format!("connection reset while sending P1: {}", "y".repeat(200));
        let full = PartlistError::from(io::Error::new(io::ErrorKind::ConnectionReset, reason)).to_string();
        let truncated: String = full.chars().take(100).collect();
        assert_eq!(summary.errors[0], format!("Item 2 (P1): {truncated}"));
        assert!(summary.errors[1].starts_with("Item 4 (P3): "));
        for message in &summary.errors {
            let detail = message.split_once("): ").unwrap().1;
            assert_eq!(detail.chars().count(), 100);
        }
    }

    #[test]
    fn test_progress_after_every_record() {
        let api = MockApi::new(200, &[]);
        let mut seen = Vec::new();
        import_records(&api, &records(3), &ImportOptions::default(), |done, total| {
            seen.push((done, total))
        })
        .unwrap();
        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn test_first_errors_bounded() {
        let api = MockApi::new(200, &[500; 12]);
        let summary = import(&api, &records(12)).unwrap();
        assert_eq!(summary.error_count, 12);
        assert_eq!(summary.first_errors().len(), ERROR_REPORT_LIMIT);
        assert!(summary.first_errors()[0].starts_with("Item 1 (P0): 500 - "));
    }

    #[test]
    fn test_stock_movement_for_positive_quantities() {
        let api = MockApi::with_ids();
        let summary = import(&api, &with_qty(&["1,200", "0", "", "3"])).unwrap();

        assert_eq!(summary.success, 4);
        assert_eq!(summary.stock_movements, 2);
        let movements = api.movements.borrow();
        assert_eq!(movements.len(), 2);
        assert_eq!(movements[0]["part_id"], 1);
        assert_eq!(movements[0]["type"], "in");
        assert_eq!(movements[0]["quantity"], 1200.0);
        assert_eq!(movements[0]["notes"], "Initial stock from import - Part: P0");
        assert_eq!(movements[1]["part_id"], 4);
        assert_eq!(movements[1]["quantity"], 3.0);
    }

    #[test]
    fn test_no_stock_movement_without_part_id() {
        let api = MockApi::new(200, &[]);
        let summary = import(&api, &with_qty(&["5"])).unwrap();
        assert_eq!(summary.success, 1);
        assert_eq!(summary.stock_movements, 0);
        assert!(api.movements.borrow().is_empty());
    }

    #[test]
    fn test_no_stock_movement_for_failed_create() {
        let api = MockApi {
            statuses: RefCell::new(vec![201, 409]),
            ..MockApi::with_ids()
        };
        let summary = import(&api, &with_qty(&["5", "7"])).unwrap();
        assert_eq!(summary.error_count, 1);
        let movements = api.movements.borrow();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0]["notes"], "Initial stock from import - Part: P1");
    }

    #[test]
    fn test_stock_transport_error_stops_phase() {
        let api = MockApi {
            stock_result: Err(()),
            ..MockApi::with_ids()
        };
        let summary = import(&api, &with_qty(&["1", "2", "3"])).unwrap();
        assert_eq!(summary.success, 3);
        assert_eq!(summary.error_count, 0);
        assert_eq!(summary.stock_movements, 0);
        assert_eq!(api.movements.borrow().len(), 1);
    }

    #[test]
    fn test_rejected_stock_movement_not_counted() {
        let api = MockApi {
            stock_result: Ok(422),
            ..MockApi::with_ids()
        };
        let summary = import(&api, &with_qty(&["1", "2"])).unwrap();
        assert_eq!(summary.stock_movements, 0);
        assert_eq!(api.movements.borrow().len(), 2);
    }

    #[test]
    fn test_stock_movements_disabled() {
        let api = MockApi::with_ids();
        let options = ImportOptions {
            stock_movements: false,
        };
        let summary = import_records(&api, &with_qty(&["4"]), &options, |_, _| {}).unwrap();
        assert_eq!(summary.success, 1);
        assert!(api.movements.borrow().is_empty());
    }
}
