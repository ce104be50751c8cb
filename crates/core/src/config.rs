use std::time::Duration;

use crate::constants::{
    DEFAULT_CALENDAR_LOOKBACK_DAYS, DEFAULT_REFRESH_INTERVAL_SECS, MAX_CALENDAR_LOOKBACK_DAYS,
};
use crate::errors::{Error, Result};

/// Runtime settings for the refresh scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Period of the recurring calendar and quote jobs.
    pub refresh_interval: Duration,
    /// How far back the calendar is fetched when no refresh has ever succeeded.
    pub calendar_lookback_days: i64,
    /// Run the calendar job once as soon as the scheduler starts.
    pub run_on_startup: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            calendar_lookback_days: DEFAULT_CALENDAR_LOOKBACK_DAYS,
            run_on_startup: true,
        }
    }
}

impl SchedulerConfig {
    /// Reads `FINSYNC_REFRESH_INTERVAL_SECS`, `FINSYNC_CALENDAR_LOOKBACK_DAYS`
    /// and `FINSYNC_RUN_ON_STARTUP`, falling back to defaults for unset keys.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let refresh_interval = match lookup("FINSYNC_REFRESH_INTERVAL_SECS") {
            Some(raw) => {
                let secs: u64 = parse_value("FINSYNC_REFRESH_INTERVAL_SECS", &raw)?;
                if secs == 0 {
                    return Err(Error::InvalidConfigValue(
                        "FINSYNC_REFRESH_INTERVAL_SECS must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => defaults.refresh_interval,
        };

        let calendar_lookback_days = match lookup("FINSYNC_CALENDAR_LOOKBACK_DAYS") {
            Some(raw) => {
                let days: i64 = parse_value("FINSYNC_CALENDAR_LOOKBACK_DAYS", &raw)?;
                if !(0..=MAX_CALENDAR_LOOKBACK_DAYS).contains(&days) {
                    return Err(Error::InvalidConfigValue(format!(
                        "FINSYNC_CALENDAR_LOOKBACK_DAYS must be between 0 and {}",
                        MAX_CALENDAR_LOOKBACK_DAYS
                    )));
                }
                days
            }
            None => defaults.calendar_lookback_days,
        };

        let run_on_startup = match lookup("FINSYNC_RUN_ON_STARTUP") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(Error::InvalidConfigValue(format!(
                        "FINSYNC_RUN_ON_STARTUP: '{}' is not a boolean",
                        other
                    )))
                }
            },
            None => defaults.run_on_startup,
        };

        Ok(Self {
            refresh_interval,
            calendar_lookback_days,
            run_on_startup,
        })
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::InvalidConfigValue(format!("{}: '{}' is not a valid number", key, raw)))
}
