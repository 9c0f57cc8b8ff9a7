use crate::error::DatasetError;
use crate::locator::find_latest_dataset;
use chrono::NaiveDateTime;
use core_types::OrderRecord;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Columns the engine's operations require. Validated against the header row
/// before any row is parsed, so a schema mismatch fails the whole load up
/// front.
const REQUIRED_COLUMNS: &[&str] = &[
    "is_abandoned",
    "is_completed",
    "cart_value",
    "product_category_name_english",
    "payment_type",
    "customer_state",
    "order_purchase_timestamp",
];

/// Timestamp shapes seen in exported datasets.
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// A parsed order table together with the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub orders: Vec<OrderRecord>,
    pub source: PathBuf,
}

/// One CSV row as it appears on disk. Everything is an optional string here;
/// coercion into the typed schema happens in `into_record`, the only place
/// in the system that deals in raw column values.
#[derive(Debug, Deserialize)]
struct RawRow {
    is_abandoned: Option<String>,
    is_completed: Option<String>,
    cart_value: Option<String>,
    product_category_name_english: Option<String>,
    payment_type: Option<String>,
    customer_state: Option<String>,
    order_purchase_timestamp: Option<String>,
}

impl RawRow {
    fn into_record(self, row: u64) -> Result<OrderRecord, DatasetError> {
        Ok(OrderRecord {
            is_abandoned: parse_flag(self.is_abandoned, "is_abandoned", row)?,
            is_completed: parse_flag(self.is_completed, "is_completed", row)?,
            cart_value: parse_money(self.cart_value, "cart_value", row)?,
            category: self.product_category_name_english.unwrap_or_default(),
            payment_type: self.payment_type.unwrap_or_default(),
            customer_state: self.customer_state.unwrap_or_default(),
            purchased_at: parse_timestamp(self.order_purchase_timestamp),
        })
    }
}

/// Discovers the newest dataset in `reports_dir` and parses it.
pub fn load_latest_dataset(reports_dir: &Path) -> Result<LoadedDataset, DatasetError> {
    let source = find_latest_dataset(reports_dir)?;
    let orders = load_dataset(&source)?;
    tracing::info!(rows = orders.len(), file = %source.display(), "Loaded analysis dataset");
    Ok(LoadedDataset { orders, source })
}

/// Parses a single dataset file into the typed order table.
pub fn load_dataset(path: &Path) -> Result<Vec<OrderRecord>, DatasetError> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(DatasetError::MissingColumn(column.to_string()));
        }
    }

    let mut orders = Vec::new();
    for (idx, raw) in reader.deserialize::<RawRow>().enumerate() {
        // 1-based data row, counting the header line.
        let row = idx as u64 + 2;
        orders.push(raw?.into_record(row)?);
    }

    Ok(orders)
}

/// Coerces a 0/1 flag cell (exported as "0.0"/"1.0") into a boolean.
fn parse_flag(field: Option<String>, column: &str, row: u64) -> Result<Option<bool>, DatasetError> {
    let Some(raw) = field else { return Ok(None) };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(value) => Ok(Some(value != 0.0)),
        Err(_) => Err(DatasetError::Coerce {
            row,
            column: column.to_string(),
            value: trimmed.to_string(),
        }),
    }
}

/// Parses a monetary cell into an exact decimal.
fn parse_money(
    field: Option<String>,
    column: &str,
    row: u64,
) -> Result<Option<Decimal>, DatasetError> {
    let Some(raw) = field else { return Ok(None) };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match Decimal::from_str(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(_) => Err(DatasetError::Coerce {
            row,
            column: column.to_string(),
            value: trimmed.to_string(),
        }),
    }
}

/// Timestamps are display-only, so an unrecognized shape degrades to `None`
/// instead of failing the load.
fn parse_timestamp(field: Option<String>) -> Option<NaiveDateTime> {
    let raw = field?;
    let trimmed = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
}
