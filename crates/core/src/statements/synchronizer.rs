//! Statement synchronization service.
//!
//! # Architecture
//!
//! ```text
//! StatementSynchronizer
//!       │
//!       ├─► StatementStore (stored statements, per kind)
//!       ├─► DataSource (full statement history of a ticker)
//!       ├─► Clock (staleness reference)
//!       └─► reconciler::find_misclassified (duplicates to delete)
//! ```
//!
//! Only stale tickers reach the data source. Statements are written per kind
//! with no transaction spanning the three kinds.

use async_trait::async_trait;
use log::{debug, error, info};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;

use super::reconciler::find_misclassified;
use super::statements_model::{
    FinancialAggregate, FinancialStatement, StatementKind, StatementPeriod,
};
use super::statements_traits::{StatementStore, StatementSynchronizerTrait};
use crate::clock::Clock;
use crate::constants::STALENESS_DAYS;
use crate::errors::Result;
use crate::source::DataSource;

/// Outcome of a single ticker synchronization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub ticker: String,
    /// Stored data was old enough to warrant a fetch.
    pub stale: bool,
    /// The data source returned a usable aggregate.
    pub fetched: bool,
    pub saved: usize,
    pub deleted: usize,
}

impl SyncReport {
    pub fn has_writes(&self) -> bool {
        self.saved > 0 || self.deleted > 0
    }
}

pub struct StatementSynchronizer {
    store: Arc<dyn StatementStore>,
    source: Arc<dyn DataSource>,
    clock: Arc<dyn Clock>,
    exchange_hint: Option<String>,
}

impl StatementSynchronizer {
    pub fn new(
        store: Arc<dyn StatementStore>,
        source: Arc<dyn DataSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            source,
            clock,
            exchange_hint: None,
        }
    }

    /// Exchange passed along with every statement fetch.
    pub fn with_exchange_hint(mut self, exchange_hint: impl Into<String>) -> Self {
        self.exchange_hint = Some(exchange_hint.into());
        self
    }

    fn load_stored_by_kind(
        &self,
        ticker: &str,
    ) -> Result<BTreeMap<StatementKind, Vec<FinancialStatement>>> {
        let mut stored = BTreeMap::new();
        for kind in StatementKind::ALL {
            stored.insert(kind, self.store.find_statements_by_ticker(kind, ticker)?);
        }
        Ok(stored)
    }

    /// Stale when there is no quarterly balance sheet, or the latest one ended
    /// more than [`STALENESS_DAYS`] days ago.
    pub fn is_stale(&self, aggregate: &FinancialAggregate) -> bool {
        match aggregate.latest_quarterly_balance_sheet_date() {
            None => true,
            Some(latest) => (self.clock.today() - latest).num_days() > STALENESS_DAYS,
        }
    }

    /// Synchronizes one ticker and reports what was written.
    pub async fn synchronize_with_report(
        &self,
        ticker: &str,
    ) -> Result<(FinancialAggregate, SyncReport)> {
        let stored = self.load_stored_by_kind(ticker)?;
        let stored_aggregate =
            FinancialAggregate::from_statements(ticker, stored.values().flatten());

        let mut report = SyncReport {
            ticker: ticker.to_string(),
            ..Default::default()
        };

        if !self.is_stale(&stored_aggregate) {
            debug!("Statements for {} are up to date", ticker);
            return Ok((stored_aggregate, report));
        }
        report.stale = true;

        let fetched = match self
            .source
            .fetch_statements(ticker, self.exchange_hint.as_deref())
            .await?
        {
            Some(aggregate) if !aggregate.is_blank() => aggregate,
            _ => {
                error!(
                    "No financial statements available for {}, keeping stored data",
                    ticker
                );
                return Ok((stored_aggregate, report));
            }
        };
        report.fetched = true;

        for (kind, existing) in &stored {
            let candidates = fetched.to_statements(*kind);
            let pending = statements_to_save(existing, candidates.clone());
            let to_delete = statements_to_delete(existing, &pending, &fetched, *kind);

            // A deleted copy frees its slot for the fetched record of that period.
            let kept: Vec<FinancialStatement> = existing
                .iter()
                .filter(|s| !to_delete.iter().any(|d| d.id == s.id))
                .cloned()
                .collect();
            let to_save = statements_to_save(&kept, candidates);

            if !to_delete.is_empty() {
                debug!(
                    "Deleting {} misclassified {} statements for {}",
                    to_delete.len(),
                    kind,
                    ticker
                );
                report.deleted += self.store.delete_statements(to_delete).await?;
            }
            if !to_save.is_empty() {
                report.saved += self.store.save_statements(to_save).await?;
            }
        }

        info!(
            "Synchronized statements for {}: {} saved, {} deleted",
            ticker, report.saved, report.deleted
        );
        Ok((fetched, report))
    }
}

/// Candidates whose (period, end date) slot is not already stored.
pub(crate) fn statements_to_save(
    existing: &[FinancialStatement],
    candidates: Vec<FinancialStatement>,
) -> Vec<FinancialStatement> {
    let stored_slots: HashSet<(StatementPeriod, NaiveDate)> =
        existing.iter().map(FinancialStatement::slot).collect();
    candidates
        .into_iter()
        .filter(|candidate| !stored_slots.contains(&candidate.slot()))
        .collect()
}

/// Stored records flagged by the reconciler once the pending saves are in place.
///
/// A flagged quarter is kept when the fresh fetch reports a quarterly entry
/// with the same end date and the same line items, so a repeated run against
/// an unchanged source writes nothing. A fetched quarter with other figures
/// does not protect the stored copy.
pub(crate) fn statements_to_delete(
    existing: &[FinancialStatement],
    to_save: &[FinancialStatement],
    fetched: &FinancialAggregate,
    kind: StatementKind,
) -> Vec<FinancialStatement> {
    let confirmed_quarters = &fetched.series(kind).quarterly;
    let view: Vec<FinancialStatement> = existing.iter().chain(to_save).cloned().collect();

    find_misclassified(&view)
        .into_iter()
        .filter(|statement| statement.id.is_some())
        .filter(|statement| {
            !confirmed_quarters
                .get(&statement.end_date)
                .is_some_and(|entry| entry.line_items == statement.line_items)
        })
        .collect()
}

#[async_trait]
impl StatementSynchronizerTrait for StatementSynchronizer {
    async fn synchronize(&self, ticker: &str) -> Result<FinancialAggregate> {
        let (aggregate, _) = self.synchronize_with_report(ticker).await?;
        Ok(aggregate)
    }

    fn load_stored(&self, ticker: &str) -> Result<FinancialAggregate> {
        let stored = self.load_stored_by_kind(ticker)?;
        Ok(FinancialAggregate::from_statements(
            ticker,
            stored.values().flatten(),
        ))
    }
}
