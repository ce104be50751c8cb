//! Quote domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Daily price bar of one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub adj_close: Decimal,
    pub volume: Decimal,
}

impl Quote {
    pub fn id(&self) -> String {
        quote_id(&self.ticker, self.date)
    }
}

/// Stable quote identifier.
///
/// Format: `{ticker}_{YYYY-MM-DD}`, e.g. "ACME_2024-01-15".
pub fn quote_id(ticker: &str, date: NaiveDate) -> String {
    format!("{}_{}", ticker, date.format("%Y-%m-%d"))
}
