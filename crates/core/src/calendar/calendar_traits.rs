use crate::calendar::calendar_model::EarningsCalendarEntry;
use crate::errors::Result;
use async_trait::async_trait;

/// Persistence of earnings calendar entries.
#[async_trait]
pub trait CalendarStore: Send + Sync {
    fn find_all_calendar_entries(&self) -> Result<Vec<EarningsCalendarEntry>>;

    /// Inserts new entries; an entry for an already stored (ticker, date)
    /// updates its `statements_loaded` flag.
    async fn save_calendar_entries(&self, entries: Vec<EarningsCalendarEntry>) -> Result<usize>;
}
