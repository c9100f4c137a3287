// src/scheduler.rs
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::runs::{ScrapeService, TriggerKind, TriggerOutcome};

/// In-process periodic trigger. The first run fires one full `period` after start.
pub fn spawn_interval_scheduler(service: ScrapeService, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // interval() yields immediately on the first tick
        ticker.tick().await;

        tracing::info!(target: "scheduler", period_secs = period.as_secs(), "interval scheduler started");
        loop {
            ticker.tick().await;
            if service.trigger(TriggerKind::Interval) == TriggerOutcome::AlreadyRunning {
                tracing::debug!(target: "scheduler", "tick skipped, previous run still active");
            }
        }
    })
}
