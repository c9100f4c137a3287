// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod anon;
pub mod api;
pub mod config;
pub mod extract;
pub mod metrics;
pub mod runs;
pub mod scheduler;
pub mod scrape;
pub mod search;
pub mod store;
pub mod throttle;
pub mod types;

use anyhow::{Context, Result};
use std::sync::Arc;

pub use crate::api::{router, AppState};
pub use crate::config::{AppConfig, Dictionaries};
pub use crate::runs::{ScrapeService, TriggerKind, TriggerOutcome};
pub use crate::scrape::{ScrapeSummary, Scraper};
pub use crate::types::{CandidateRecord, SearchResultItem};

/// Wire the production scraper (Google search, Airtable store, fixed delays).
pub fn build_service(cfg: &AppConfig) -> Result<ScrapeService> {
    let dicts = Dictionaries::load_default(cfg.dictionaries_path.as_deref())
        .context("loading dictionaries")?;
    let extractor = Arc::new(extract::Extractor::new(dicts).context("building extractor")?);
    let search = Arc::new(search::google::GoogleSearch::new(&cfg.google)?);
    let store = Arc::new(store::airtable::AirtableStore::new(&cfg.airtable)?);
    let throttle = Arc::new(throttle::FixedDelayThrottle::new(
        cfg.result_delay,
        cfg.keyword_delay,
    ));

    tracing::info!(
        target: "scrape",
        table = %cfg.airtable.table,
        pages = cfg.search_pages,
        result_delay_ms = cfg.result_delay.as_millis() as u64,
        keyword_delay_ms = cfg.keyword_delay.as_millis() as u64,
        "scrape service configured"
    );

    let scraper = Scraper::new(search, store, throttle, extractor, cfg.search_pages);
    Ok(ScrapeService::new(Arc::new(scraper)))
}
