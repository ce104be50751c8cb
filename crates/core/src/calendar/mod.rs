//! Earnings calendar: model, store trait and the refresh service.

mod calendar_model;
mod calendar_service;
mod calendar_traits;

#[cfg(test)]
mod calendar_service_tests;

pub use calendar_model::EarningsCalendarEntry;
pub use calendar_service::{
    find_new_entries, needs_statement_reload, CalendarRefreshService, RefreshOutcome,
};
pub use calendar_traits::CalendarStore;
