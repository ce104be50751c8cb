use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::jobs::ScheduledJob;
use crate::config::SchedulerConfig;
use crate::errors::{Error, Result};

/// Drives the calendar and quote jobs.
///
/// The calendar job runs once at start, then both jobs are dispatched on
/// every period tick. Each dispatch is an independent task: a run still in
/// flight when the next tick fires is not waited for or cancelled.
pub struct RefreshScheduler {
    config: SchedulerConfig,
    calendar_job: Arc<dyn ScheduledJob>,
    quote_job: Arc<dyn ScheduledJob>,
    periodic: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshScheduler {
    pub fn new(
        config: SchedulerConfig,
        calendar_job: Arc<dyn ScheduledJob>,
        quote_job: Arc<dyn ScheduledJob>,
    ) -> Self {
        Self {
            config,
            calendar_job,
            quote_job,
            periodic: Mutex::new(None),
        }
    }

    /// Starts the scheduler on the current Tokio runtime without blocking.
    pub fn start(&self) -> Result<()> {
        let mut periodic = self
            .periodic
            .lock()
            .map_err(|e| Error::Unexpected(format!("Scheduler state poisoned: {}", e)))?;
        if periodic.is_some() {
            warn!("Refresh scheduler already started");
            return Ok(());
        }

        if self.config.run_on_startup {
            spawn_job(self.calendar_job.clone());
        }

        let period = self.config.refresh_interval;
        let calendar_job = self.calendar_job.clone();
        let quote_job = self.quote_job.clone();
        *periodic = Some(tokio::spawn(async move {
            info!("Refresh scheduler started ({}s interval)", period.as_secs());

            // First periodic dispatch happens one full period after start.
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                spawn_job(calendar_job.clone());
                spawn_job(quote_job.clone());
            }
        }));

        Ok(())
    }

    /// Stops periodic dispatch. Jobs already running are left to finish.
    pub fn shutdown(&self) {
        if let Ok(mut periodic) = self.periodic.lock() {
            if let Some(handle) = periodic.take() {
                handle.abort();
                info!("Refresh scheduler stopped");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.periodic
            .lock()
            .map(|periodic| periodic.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_job(job: Arc<dyn ScheduledJob>) {
    tokio::spawn(async move { run_scheduled_job(job.as_ref()).await });
}

/// Runs one job, absorbing its failure into the log.
async fn run_scheduled_job(job: &dyn ScheduledJob) {
    debug!("Running scheduled {}", job.name());
    match job.run().await {
        Ok(()) => debug!("Scheduled {} finished", job.name()),
        Err(e) => error!("Scheduled {} failed: {}", job.name(), e),
    }
}
