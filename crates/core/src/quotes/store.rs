//! Quote storage trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::Quote;
use crate::errors::Result;

#[async_trait]
pub trait QuoteStore: Send + Sync {
    fn find_all_quotes(&self) -> Result<Vec<Quote>>;

    /// Most recent quote date across all tickers.
    ///
    /// Stores with an index on the date should override this.
    fn latest_quote_date(&self) -> Result<Option<NaiveDate>> {
        Ok(self.find_all_quotes()?.iter().map(|q| q.date).max())
    }

    /// Saves quotes of one ticker, replacing any stored quote for the same day.
    async fn save_quotes(&self, ticker: &str, quotes: Vec<Quote>) -> Result<usize>;
}
