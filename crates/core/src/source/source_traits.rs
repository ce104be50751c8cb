use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

use super::SourceError;
use crate::calendar::EarningsCalendarEntry;
use crate::errors::Result;
use crate::quotes::Quote;
use crate::statements::FinancialAggregate;

#[async_trait]
pub trait DataSource: Send + Sync {
    /// Full statement history of a ticker. `Ok(None)` or a blank aggregate
    /// means nothing is available and is not an error.
    async fn fetch_statements(
        &self,
        ticker: &str,
        exchange_hint: Option<&str>,
    ) -> std::result::Result<Option<FinancialAggregate>, SourceError>;

    /// Calendar entries announced on or after `since`.
    /// Fails with [`SourceError::Exhausted`] when no further history exists.
    async fn fetch_calendar_since(
        &self,
        since: NaiveDate,
    ) -> std::result::Result<Vec<EarningsCalendarEntry>, SourceError>;

    async fn fetch_historical_quotes(
        &self,
        tickers: &[String],
        since: NaiveDate,
    ) -> std::result::Result<HashMap<String, Vec<Quote>>, SourceError>;
}

/// The set of tickers the system tracks.
pub trait SymbolUniverse: Send + Sync {
    fn get_tickers(&self) -> Result<HashSet<String>>;
}
