use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use log::{debug, info};
use std::sync::Arc;

use crate::calendar::{CalendarRefreshService, RefreshOutcome};
use crate::clock::Clock;
use crate::constants::CONTROL_SUCCESS_MESSAGE;
use crate::control::{ControlRecord, ControlStore, ControlType};
use crate::errors::{Error, Result};
use crate::quotes::{QuoteCatchUpReport, QuoteCatchUpService};

/// Unit of work dispatched by the scheduler.
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarJobOutcome {
    /// A successful refresh is already recorded for today.
    AlreadyRanToday,
    Completed {
        since: NaiveDate,
        outcome: RefreshOutcome,
    },
}

/// Calendar refresh with conditional statement reload, at most once per day.
pub struct CalendarRefreshJob {
    control_store: Arc<dyn ControlStore>,
    refresh_service: Arc<CalendarRefreshService>,
    clock: Arc<dyn Clock>,
    lookback_days: i64,
}

impl CalendarRefreshJob {
    pub fn new(
        control_store: Arc<dyn ControlStore>,
        refresh_service: Arc<CalendarRefreshService>,
        clock: Arc<dyn Clock>,
        lookback_days: i64,
    ) -> Self {
        Self {
            control_store,
            refresh_service,
            clock,
            lookback_days,
        }
    }

    pub async fn execute(&self) -> Result<CalendarJobOutcome> {
        let today = self.clock.today();
        let latest = self
            .control_store
            .find_latest_control(ControlType::CalendarRefresh)?;

        let since = match latest {
            Some(record) if record.timestamp.date_naive() == today => {
                debug!("Earnings calendar already refreshed today");
                return Ok(CalendarJobOutcome::AlreadyRanToday);
            }
            Some(record) => record.timestamp.date_naive(),
            None => Duration::try_days(self.lookback_days)
                .and_then(|lookback| today.checked_sub_signed(lookback))
                .ok_or_else(|| {
                    Error::InvalidConfigValue(format!(
                        "calendar lookback of {} days is out of range",
                        self.lookback_days
                    ))
                })?,
        };

        let outcome = self.refresh_service.refresh(since).await?;

        self.control_store
            .save_control(ControlRecord::success(
                ControlType::CalendarRefresh,
                self.clock.now(),
                CONTROL_SUCCESS_MESSAGE,
            ))
            .await?;

        Ok(CalendarJobOutcome::Completed { since, outcome })
    }
}

#[async_trait]
impl ScheduledJob for CalendarRefreshJob {
    fn name(&self) -> &'static str {
        "earnings calendar refresh"
    }

    async fn run(&self) -> Result<()> {
        if let CalendarJobOutcome::Completed { since, outcome } = self.execute().await? {
            info!(
                "Earnings calendar refreshed since {}: {} new entries, {} with statements loaded",
                since,
                outcome.new_entries.len(),
                outcome.loaded_count()
            );
        }
        Ok(())
    }
}

/// Historical quote catch-up for the whole ticker universe.
pub struct QuoteCatchUpJob {
    service: Arc<QuoteCatchUpService>,
}

impl QuoteCatchUpJob {
    pub fn new(service: Arc<QuoteCatchUpService>) -> Self {
        Self { service }
    }

    pub async fn execute(&self) -> Result<QuoteCatchUpReport> {
        self.service.catch_up().await
    }
}

#[async_trait]
impl ScheduledJob for QuoteCatchUpJob {
    fn name(&self) -> &'static str {
        "historical quote catch-up"
    }

    async fn run(&self) -> Result<()> {
        self.execute().await.map(|_| ())
    }
}
