// src/search/mod.rs
//! Search seam: a provider returns one page of organic results for a query.

pub mod fixture;
pub mod google;

use anyhow::Result;

use crate::types::SearchResultItem;

#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// One page of results. `page` is zero-based.
    async fn search(&self, query: &str, page: u32) -> Result<Vec<SearchResultItem>>;
    fn name(&self) -> &'static str;
}

/// `site:<domain> <keyword> <country>`
pub fn build_query(profile_domain: &str, keyword: &str, country: &str) -> String {
    format!(
        "site:{} {} {}",
        profile_domain.trim(),
        keyword.trim(),
        country.trim()
    )
}
