// src/metrics.rs
use anyhow::{anyhow, Result};
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Idempotent: later calls reuse the
    /// first handle, so tests can call it freely.
    pub fn init() -> Result<Self> {
        let handle = HANDLE
            .get_or_try_init(|| {
                let handle = PrometheusBuilder::new()
                    .install_recorder()
                    .map_err(|e| anyhow!("prometheus: install recorder: {e}"))?;
                describe_all();
                Ok::<_, anyhow::Error>(handle)
            })?
            .clone();
        Ok(Self { handle })
    }

    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// Router exposing `/metrics` in the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe_all() {
    describe_counter!("scrape_runs_total", "Completed scrape runs.");
    describe_counter!("scrape_results_found_total", "Search results seen.");
    describe_counter!(
        "scrape_candidates_added_total",
        "Candidates written to the store."
    );
    describe_counter!(
        "scrape_duplicates_total",
        "Results skipped because the profile URL was already stored."
    );
    describe_counter!(
        "scrape_upsert_failures_total",
        "Results not stored because of a store error."
    );
    describe_counter!("scrape_search_errors_total", "Failed search requests.");
    describe_counter!("scrape_store_errors_total", "Failed store calls.");
    describe_counter!(
        "scrape_triggers_rejected_total",
        "Triggers refused for a missing or wrong secret."
    );
    describe_counter!(
        "scrape_triggers_skipped_total",
        "Triggers ignored because a run was in progress."
    );
    describe_gauge!("scrape_last_run_ts", "Unix ts when the last run finished.");
    describe_histogram!("scrape_run_duration_ms", "Scrape run wall time in milliseconds.");
    describe_histogram!("scrape_search_ms", "Search request time in milliseconds.");
}
