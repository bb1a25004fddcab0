//! Cron-driven sweep loop.
//!
//! Sweeps run on the scheduler's own task, so two runs can never overlap: a
//! tick that fires while a sweep is still executing simply waits its turn.
//! `Ctrl-C` ends the loop between runs.

use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use cron::Schedule;
use seedsweep_core::SweepService;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// Parsed sweep schedule.
#[derive(Debug, Clone)]
pub(crate) struct SweepSchedule {
    schedule: Schedule,
}

impl SweepSchedule {
    /// Parse a cron expression into a schedule.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Schedule` naming the offending expression.
    pub(crate) fn parse(expression: &str) -> AppResult<Self> {
        let schedule =
            Schedule::from_str(expression.trim()).map_err(|source| AppError::Schedule {
                expression: expression.to_string(),
                source,
            })?;
        Ok(Self { schedule })
    }

    /// Time until the next scheduled run, if the schedule has one.
    #[must_use]
    pub(crate) fn until_next(&self) -> Option<Duration> {
        let next = self.schedule.upcoming(Utc).next()?;
        Some((next - Utc::now()).to_std().unwrap_or_default())
    }
}

/// Run sweeps on the schedule until shutdown is requested.
pub(crate) async fn run_scheduled(schedule: &SweepSchedule, service: &SweepService) {
    loop {
        let Some(delay) = schedule.until_next() else {
            warn!("schedule has no future runs, stopping");
            return;
        };
        info!(delay_secs = delay.as_secs(), "next sweep scheduled");

        tokio::select! {
            () = tokio::time::sleep(delay) => {
                if let Err(err) = service.run_sweep().await {
                    warn!(error = %err, "sweep run failed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested, stopping scheduler");
                return;
            }
        }
    }
}
