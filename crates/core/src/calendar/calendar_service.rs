use chrono::NaiveDate;
use log::{debug, error, info, warn};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::calendar_model::EarningsCalendarEntry;
use super::calendar_traits::CalendarStore;
use crate::constants::RELOAD_GAP_DAYS;
use crate::errors::{Error, Result};
use crate::source::DataSource;
use crate::statements::{FinancialAggregate, StatementSynchronizerTrait};

/// Result of one calendar refresh pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Entries that were not stored before, with their loaded flag as persisted.
    pub new_entries: Vec<EarningsCalendarEntry>,
    /// The source reported that no further history exists.
    pub exhausted: bool,
    /// The fetched batch contained at least one already stored (ticker, date).
    pub reached_known_entry: bool,
}

impl RefreshOutcome {
    pub fn loaded_count(&self) -> usize {
        self.new_entries
            .iter()
            .filter(|e| e.statements_loaded)
            .count()
    }
}

/// Splits a fetched batch into entries not stored yet.
///
/// An entry is new when no stored entry of the same ticker has the same
/// announcement date. Repeats inside the batch are collapsed. The flag tells
/// whether the batch overlapped stored history.
pub fn find_new_entries(
    stored: &[EarningsCalendarEntry],
    incoming: Vec<EarningsCalendarEntry>,
) -> (Vec<EarningsCalendarEntry>, bool) {
    let mut stored_by_ticker: HashMap<&str, HashSet<NaiveDate>> = HashMap::new();
    for entry in stored {
        stored_by_ticker
            .entry(entry.ticker.as_str())
            .or_default()
            .insert(entry.announcement_date);
    }

    let mut reached_known_entry = false;
    let mut seen: HashSet<(String, NaiveDate)> = HashSet::new();
    let mut new_entries = Vec::new();
    for entry in incoming {
        let known = stored_by_ticker
            .get(entry.ticker.as_str())
            .is_some_and(|dates| dates.contains(&entry.announcement_date));
        if known {
            reached_known_entry = true;
            continue;
        }
        if seen.insert((entry.ticker.clone(), entry.announcement_date)) {
            new_entries.push(entry);
        }
    }

    (new_entries, reached_known_entry)
}

/// Whether an announcement warrants reloading a ticker's statements.
///
/// Always true without a stored balance sheet. Otherwise true when the
/// announcement falls less than [`RELOAD_GAP_DAYS`] days after the latest
/// known release (or end date, where the release date is missing).
pub fn needs_statement_reload(stored: &FinancialAggregate, announcement_date: NaiveDate) -> bool {
    match stored.latest_balance_sheet_release_or_end_date() {
        None => true,
        Some(last_known) => (announcement_date - last_known).num_days() < RELOAD_GAP_DAYS,
    }
}

pub struct CalendarRefreshService {
    calendar_store: Arc<dyn CalendarStore>,
    source: Arc<dyn DataSource>,
    synchronizer: Arc<dyn StatementSynchronizerTrait>,
}

impl CalendarRefreshService {
    pub fn new(
        calendar_store: Arc<dyn CalendarStore>,
        source: Arc<dyn DataSource>,
        synchronizer: Arc<dyn StatementSynchronizerTrait>,
    ) -> Self {
        Self {
            calendar_store,
            source,
            synchronizer,
        }
    }

    /// Fetches announcements since `since`, reloads statements where needed
    /// and persists the new entries.
    ///
    /// Source exhaustion ends the pass normally with no new entries.
    pub async fn refresh(&self, since: NaiveDate) -> Result<RefreshOutcome> {
        let incoming = match self.source.fetch_calendar_since(since).await {
            Ok(entries) => entries,
            Err(err) if err.is_exhausted() => {
                warn!("Earnings calendar exhausted while fetching since {}", since);
                return Ok(RefreshOutcome {
                    exhausted: true,
                    ..Default::default()
                });
            }
            Err(err) => return Err(Error::Source(err)),
        };

        let stored = self.calendar_store.find_all_calendar_entries()?;
        let fetched_count = incoming.len();
        let (mut new_entries, reached_known_entry) = find_new_entries(&stored, incoming);
        info!(
            "Fetched {} earnings calendar entries since {}, {} new",
            fetched_count,
            since,
            new_entries.len()
        );
        if reached_known_entry {
            debug!("Calendar batch since {} overlaps stored entries", since);
        }

        self.dispatch(&mut new_entries).await;

        if !new_entries.is_empty() {
            self.calendar_store
                .save_calendar_entries(new_entries.clone())
                .await?;
        }

        Ok(RefreshOutcome {
            new_entries,
            exhausted: false,
            reached_known_entry,
        })
    }

    /// Applies the reload decision to each entry and synchronizes the chosen
    /// tickers, marking entries whose statements were loaded.
    ///
    /// A failure for one ticker is logged and leaves its entries unmarked.
    pub async fn dispatch(&self, entries: &mut [EarningsCalendarEntry]) {
        // Outcome per ticker already synchronized during this batch.
        let mut loaded: HashMap<String, bool> = HashMap::new();

        for entry in entries.iter_mut() {
            if let Some(done) = loaded.get(&entry.ticker) {
                entry.statements_loaded = *done;
                continue;
            }

            let stored = match self.synchronizer.load_stored(&entry.ticker) {
                Ok(stored) => stored,
                Err(e) => {
                    error!("Failed to read statements for {}: {}", entry.ticker, e);
                    continue;
                }
            };

            if !needs_statement_reload(&stored, entry.announcement_date) {
                debug!(
                    "No need to load financial statements for {} announced {}",
                    entry.ticker, entry.announcement_date
                );
                continue;
            }

            info!("Loading financial statements for {}", entry.ticker);
            let ok = match self.synchronizer.synchronize(&entry.ticker).await {
                Ok(_) => true,
                Err(e) => {
                    error!("Failed to synchronize statements for {}: {}", entry.ticker, e);
                    false
                }
            };
            entry.statements_loaded = ok;
            loaded.insert(entry.ticker.clone(), ok);
        }
    }
}
