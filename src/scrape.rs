// src/scrape.rs
//! One scrape run: countries × keywords × pages → extract → upsert.

use chrono::{DateTime, Utc};
use metrics::{counter, gauge, histogram};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::anon::anon_id;
use crate::extract::Extractor;
use crate::search::{build_query, SearchProvider};
use crate::store::{upsert_candidate, CandidateStore, UpsertOutcome};
use crate::throttle::Throttle;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ScrapeSummary {
    /// Search results seen.
    pub found: u64,
    /// Candidates written (blank row filled or appended).
    pub added: u64,
    pub duplicates: u64,
    /// Upserts that hit a store error.
    pub failed: u64,
    /// (keyword, country) queries issued.
    pub queries: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScrapeSummary {
    fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::FilledBlank | UpsertOutcome::Appended => self.added += 1,
            UpsertOutcome::Duplicate => self.duplicates += 1,
            UpsertOutcome::Failed => self.failed += 1,
        }
    }
}

pub struct Scraper {
    search: Arc<dyn SearchProvider>,
    store: Arc<dyn CandidateStore>,
    throttle: Arc<dyn Throttle>,
    extractor: Arc<Extractor>,
    pages: u32,
}

impl Scraper {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        store: Arc<dyn CandidateStore>,
        throttle: Arc<dyn Throttle>,
        extractor: Arc<Extractor>,
        pages: u32,
    ) -> Self {
        Self {
            search,
            store,
            throttle,
            extractor,
            pages: pages.max(1),
        }
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    pub fn pages(&self) -> u32 {
        self.pages
    }

    /// Full pass over every country and keyword. Never fails: search and store
    /// errors are logged and counted.
    pub async fn run(&self) -> ScrapeSummary {
        let t0 = Instant::now();
        let mut summary = ScrapeSummary {
            started_at: Utc::now(),
            ..Default::default()
        };
        let dicts = self.extractor.dictionaries();

        tracing::info!(
            target: "scrape",
            search = self.search.name(),
            store = self.store.name(),
            countries = dicts.countries.len(),
            keywords = dicts.search_keywords.len(),
            pages = self.pages,
            "scrape run started"
        );

        for country in &dicts.countries {
            for keyword in &dicts.search_keywords {
                let query = build_query(&dicts.profile_domain, keyword, country);
                summary.queries += 1;
                self.run_query(&query, keyword, country, &mut summary).await;
                self.throttle.after_keyword().await;
            }
        }

        summary.finished_at = Utc::now();
        let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;

        counter!("scrape_runs_total").increment(1);
        gauge!("scrape_last_run_ts").set(summary.finished_at.timestamp() as f64);
        histogram!("scrape_run_duration_ms").record(elapsed_ms);

        tracing::info!(
            target: "scrape",
            found = summary.found,
            added = summary.added,
            duplicates = summary.duplicates,
            failed = summary.failed,
            queries = summary.queries,
            elapsed_ms = elapsed_ms as u64,
            "scrape run finished"
        );
        summary
    }

    async fn run_query(
        &self,
        query: &str,
        keyword: &str,
        country: &str,
        summary: &mut ScrapeSummary,
    ) {
        for page in 0..self.pages {
            let items = match self.search.search(query, page).await {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(target: "scrape", error = ?e, %keyword, %country, page, "search failed");
                    counter!("scrape_search_errors_total").increment(1);
                    break;
                }
            };
            if items.is_empty() {
                break;
            }

            tracing::debug!(target: "scrape", %keyword, %country, page, results = items.len(), "processing page");
            counter!("scrape_results_found_total").increment(items.len() as u64);

            for item in &items {
                summary.found += 1;
                let candidate = self.extractor.extract(item, country);
                let outcome = upsert_candidate(self.store.as_ref(), &candidate).await;
                summary.record(outcome);
                match outcome {
                    UpsertOutcome::FilledBlank | UpsertOutcome::Appended => {
                        counter!("scrape_candidates_added_total").increment(1)
                    }
                    UpsertOutcome::Duplicate => counter!("scrape_duplicates_total").increment(1),
                    UpsertOutcome::Failed => {
                        tracing::debug!(target: "scrape", id = %anon_id(&candidate.linkedin_url), "candidate not stored");
                        counter!("scrape_upsert_failures_total").increment(1)
                    }
                }
                self.throttle.after_result().await;
            }
        }
    }
}
