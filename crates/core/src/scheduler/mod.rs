//! Scheduled orchestration of the calendar refresh and quote catch-up.
//!
//! ```text
//! RefreshScheduler
//!       │
//!       ├─► startup: CalendarRefreshJob
//!       └─► every period: CalendarRefreshJob + QuoteCatchUpJob (independent tasks)
//!
//! CalendarRefreshJob ─► ControlStore (once per UTC day) ─► CalendarRefreshService
//! QuoteCatchUpJob    ─► QuoteCatchUpService
//! ```

mod jobs;
mod refresh_scheduler;


pub use jobs::{CalendarJobOutcome, CalendarRefreshJob, QuoteCatchUpJob, ScheduledJob};
pub use refresh_scheduler::RefreshScheduler;
