// src/search/fixture.rs
//! Canned search provider for tests and offline runs.

use anyhow::{bail, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use super::{google, SearchProvider};
use crate::types::SearchResultItem;

#[derive(Default)]
pub struct FixtureSearch {
    /// Results keyed by (query, page).
    pages: HashMap<(String, u32), Vec<SearchResultItem>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl FixtureSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `items` as page 0 of `query`.
    pub fn with_results(self, query: impl Into<String>, items: Vec<SearchResultItem>) -> Self {
        self.with_page(query, 0, items)
    }

    pub fn with_page(
        mut self,
        query: impl Into<String>,
        page: u32,
        items: Vec<SearchResultItem>,
    ) -> Self {
        self.pages.insert((query.into(), page), items);
        self
    }

    /// Serve a Custom Search response body as page 0 of `query`.
    pub fn with_google_json(self, query: impl Into<String>, body: &str) -> Result<Self> {
        let items = google::parse_response(body)?;
        Ok(self.with_results(query, items))
    }

    /// Every call for `query` fails.
    pub fn failing(mut self, query: impl Into<String>) -> Self {
        self.failing.insert(query.into());
        self
    }

    /// Recorded (query, page) calls in order.
    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

#[async_trait::async_trait]
impl SearchProvider for FixtureSearch {
    async fn search(&self, query: &str, page: u32) -> Result<Vec<SearchResultItem>> {
        self.calls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push((query.to_string(), page));
        if self.failing.contains(query) {
            bail!("fixture search: injected failure for {query:?}");
        }
        Ok(self
            .pages
            .get(&(query.to_string(), page))
            .cloned()
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
