//! Earnings calendar domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An earnings announcement of one ticker.
///
/// At most one entry is stored per (ticker, announcement_date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsCalendarEntry {
    pub id: Option<String>,
    pub ticker: String,
    pub announcement_date: NaiveDate,
    /// Statements were reloaded for this announcement.
    pub statements_loaded: bool,
}

impl EarningsCalendarEntry {
    pub fn new(ticker: impl Into<String>, announcement_date: NaiveDate) -> Self {
        Self {
            id: None,
            ticker: ticker.into(),
            announcement_date,
            statements_loaded: false,
        }
    }
}
