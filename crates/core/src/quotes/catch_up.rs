use chrono::NaiveDate;
use log::{debug, info};
use std::sync::Arc;

use super::store::QuoteStore;
use crate::constants::QUOTE_EPOCH;
use crate::errors::Result;
use crate::source::{DataSource, SymbolUniverse};

/// Result of one quote catch-up run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteCatchUpReport {
    /// Date the fetch started from.
    pub since: NaiveDate,
    pub tickers_requested: usize,
    pub tickers_saved: usize,
    pub quotes_saved: usize,
}

impl QuoteCatchUpReport {
    pub fn summary(&self) -> String {
        format!(
            "Saved {} quotes for {}/{} tickers since {}",
            self.quotes_saved, self.tickers_saved, self.tickers_requested, self.since
        )
    }
}

/// Brings stored quote history up to date for the whole ticker universe.
pub struct QuoteCatchUpService {
    quote_store: Arc<dyn QuoteStore>,
    source: Arc<dyn DataSource>,
    universe: Arc<dyn SymbolUniverse>,
}

impl QuoteCatchUpService {
    pub fn new(
        quote_store: Arc<dyn QuoteStore>,
        source: Arc<dyn DataSource>,
        universe: Arc<dyn SymbolUniverse>,
    ) -> Self {
        Self {
            quote_store,
            source,
            universe,
        }
    }

    /// Latest stored quote date, or [`QUOTE_EPOCH`] when nothing is stored.
    pub fn catch_up_start(&self) -> Result<NaiveDate> {
        Ok(self.quote_store.latest_quote_date()?.unwrap_or(QUOTE_EPOCH))
    }

    pub async fn catch_up(&self) -> Result<QuoteCatchUpReport> {
        let since = self.catch_up_start()?;
        let mut tickers: Vec<String> = self.universe.get_tickers()?.into_iter().collect();
        tickers.sort();

        let mut report = QuoteCatchUpReport {
            since,
            tickers_requested: tickers.len(),
            tickers_saved: 0,
            quotes_saved: 0,
        };
        if tickers.is_empty() {
            debug!("Ticker universe is empty, no quotes to fetch");
            return Ok(report);
        }

        debug!("Fetching quotes for {} tickers since {}", tickers.len(), since);
        let fetched = self.source.fetch_historical_quotes(&tickers, since).await?;

        let mut by_ticker: Vec<_> = fetched.into_iter().collect();
        by_ticker.sort_by(|a, b| a.0.cmp(&b.0));
        for (ticker, quotes) in by_ticker {
            if quotes.is_empty() {
                debug!("No new quotes for {}", ticker);
                continue;
            }
            let saved = self.quote_store.save_quotes(&ticker, quotes).await?;
            report.tickers_saved += 1;
            report.quotes_saved += saved;
        }

        info!("{}", report.summary());
        Ok(report)
    }
}
