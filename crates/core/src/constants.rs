use chrono::NaiveDate;

/// Stored quarterly balance sheets older than this many days trigger a fetch
pub const STALENESS_DAYS: i64 = 90;

/// An announcement closer than this to the last known filing triggers a reload
pub const RELOAD_GAP_DAYS: i64 = 60;

/// Calendar lookback used when no successful refresh has been recorded yet
pub const DEFAULT_CALENDAR_LOOKBACK_DAYS: i64 = 7;

/// Upper bound accepted for a configured calendar lookback (ten years).
pub const MAX_CALENDAR_LOOKBACK_DAYS: i64 = 3650;

/// Default period of the scheduler's periodic trigger, in seconds
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 10 * 60;

/// Message stored on a successful calendar refresh control record
pub const CONTROL_SUCCESS_MESSAGE: &str = "loaded earnings calendars";

/// First trading day used as the quote history start when nothing is stored
pub const QUOTE_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1962, 1, 2) {
    Some(date) => date,
    None => panic!("invalid quote epoch"),
};
