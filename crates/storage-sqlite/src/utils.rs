//! Helpers shared by the repositories: text encodings of dates and decimals,
//! and chunking of large `IN (...)` lists.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;

/// Chunk size for `IN (...)` parameter lists, below SQLite's 999 variable limit.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// ISO `YYYY-MM-DD`; sorts lexicographically in date order.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date(value: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| StorageError::SerializationError(format!("invalid date '{}': {}", value, e)))
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            StorageError::SerializationError(format!("invalid timestamp '{}': {}", value, e))
        })
}

pub fn parse_decimal(value: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value)
        .map_err(|e| StorageError::SerializationError(format!("invalid decimal '{}': {}", value, e)))
}
