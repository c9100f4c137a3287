// src/search/google.rs
//! Google Custom Search JSON API client.

use anyhow::{Context, Result};
use metrics::histogram;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};

use super::SearchProvider;
use crate::config::GoogleConfig;
use crate::types::SearchResultItem;

pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";
/// Results per page; the API caps `num` at 10.
pub const PAGE_SIZE: u32 = 10;

#[derive(Debug, Deserialize)]
struct CseResponse {
    /// Absent when the query has no results.
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: String,
}

pub struct GoogleSearch {
    http: Client,
    endpoint: String,
    api_key: String,
    cse_id: String,
}

impl GoogleSearch {
    pub fn new(cfg: &GoogleConfig) -> Result<Self> {
        Self::with_endpoint(cfg, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(cfg: &GoogleConfig, endpoint: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("profile-scout/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()
            .context("building search http client")?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            api_key: cfg.api_key.clone(),
            cse_id: cfg.cse_id.clone(),
        })
    }
}

/// Parse a Custom Search response body. Items without a link are dropped.
pub fn parse_response(body: &str) -> Result<Vec<SearchResultItem>> {
    let resp: CseResponse = serde_json::from_str(body).context("parsing custom search json")?;
    Ok(resp
        .items
        .into_iter()
        .filter(|it| !it.link.trim().is_empty())
        .map(|it| SearchResultItem::new(it.title, it.snippet, it.link))
        .collect())
}

#[async_trait::async_trait]
impl SearchProvider for GoogleSearch {
    async fn search(&self, query: &str, page: u32) -> Result<Vec<SearchResultItem>> {
        let t0 = Instant::now();
        let start = (page * PAGE_SIZE + 1).to_string();
        let num = PAGE_SIZE.to_string();

        let body = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cse_id.as_str()),
                ("q", query),
                ("start", start.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .context("custom search request")?
            .error_for_status()
            .context("custom search non-2xx")?
            .text()
            .await
            .context("reading custom search body")?;

        let items = parse_response(&body)?;
        histogram!("scrape_search_ms").record(t0.elapsed().as_secs_f64() * 1000.0);
        tracing::debug!(target: "search", page, results = items.len(), "search page fetched");
        Ok(items)
    }

    fn name(&self) -> &'static str {
        "google_cse"
    }
}
