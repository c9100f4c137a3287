// src/runs.rs
//! Single-flight run control. Triggers (manual, cron, interval) go through
//! [`ScrapeService`]; at most one scrape runs at a time.

use metrics::counter;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::scrape::{ScrapeSummary, Scraper};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Manual,
    Cron,
    Interval,
}

impl TriggerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::Manual => "manual",
            TriggerKind::Cron => "cron",
            TriggerKind::Interval => "interval",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Started,
    AlreadyRunning,
}

#[derive(Debug, Clone, Serialize)]
pub struct LastRun {
    pub trigger: TriggerKind,
    #[serde(flatten)]
    pub summary: ScrapeSummary,
}

#[derive(Default)]
pub struct RunTracker {
    running: AtomicBool,
    last: Mutex<Option<LastRun>>,
}

/// Held for the duration of a run; dropping it (including on panic) frees the slot.
pub struct RunGuard {
    tracker: Arc<RunTracker>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.tracker.running.store(false, Ordering::SeqCst);
    }
}

impl RunTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Claim the run slot, or `None` when a run is in progress.
    pub fn try_begin(self: &Arc<Self>) -> Option<RunGuard> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| RunGuard {
                tracker: Arc::clone(self),
            })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn last_run(&self) -> Option<LastRun> {
        self.last.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn finish(&self, last: LastRun) {
        *self.last.lock().unwrap_or_else(|p| p.into_inner()) = Some(last);
    }
}

#[derive(Clone)]
pub struct ScrapeService {
    scraper: Arc<Scraper>,
    tracker: Arc<RunTracker>,
}

impl ScrapeService {
    pub fn new(scraper: Arc<Scraper>) -> Self {
        Self {
            scraper,
            tracker: RunTracker::new(),
        }
    }

    pub fn scraper(&self) -> &Scraper {
        &self.scraper
    }

    pub fn tracker(&self) -> &RunTracker {
        &self.tracker
    }

    /// Start a run in the background and return immediately.
    pub fn trigger(&self, kind: TriggerKind) -> TriggerOutcome {
        let Some(guard) = self.tracker.try_begin() else {
            tracing::info!(target: "scrape", trigger = kind.as_str(), "run already in progress, trigger ignored");
            counter!("scrape_triggers_skipped_total", "trigger" => kind.as_str()).increment(1);
            return TriggerOutcome::AlreadyRunning;
        };

        tracing::info!(target: "scrape", trigger = kind.as_str(), "run triggered");
        let scraper = Arc::clone(&self.scraper);
        let tracker = Arc::clone(&self.tracker);
        let handle = tokio::spawn(async move {
            let _guard = guard;
            let summary = scraper.run().await;
            tracker.finish(LastRun {
                trigger: kind,
                summary,
            });
        });

        // The spawned run owns the guard; a panic drops it and lands here.
        tokio::spawn(async move {
            if let Err(e) = handle.await {
                tracing::error!(target: "scrape", error = %e, trigger = kind.as_str(), "scrape run aborted");
            }
        });

        TriggerOutcome::Started
    }

    /// Run inline on the current task. `None` when a run is already in progress.
    pub async fn run_now(&self, kind: TriggerKind) -> Option<ScrapeSummary> {
        let _guard = self.tracker.try_begin()?;
        let summary = self.scraper.run().await;
        self.tracker.finish(LastRun {
            trigger: kind,
            summary: summary.clone(),
        });
        Some(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_is_single_flight_and_guard_releases() {
        let t = RunTracker::new();
        let g = t.try_begin().expect("first claim");
        assert!(t.is_running());
        assert!(t.try_begin().is_none());
        drop(g);
        assert!(!t.is_running());
        assert!(t.try_begin().is_some());
    }
}
