// src/store/airtable.rs
//! Airtable-backed candidate table.
//!
//! Lookups use `filterByFormula`; the blank-row scan sorts by `Name` ascending and takes
//! the first record. Writes send `typecast: true` so `Tags` values that are not yet
//! multi-select options get created.

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::{CandidateStore, RowId};
use crate::config::AirtableConfig;
use crate::types::CandidateRecord;

pub const DEFAULT_ENDPOINT: &str = "https://api.airtable.com/v0";

pub mod fields {
    pub const NAME: &str = "Name";
    pub const LINKEDIN_URL: &str = "LinkedIn URL";
    pub const LOCATION: &str = "Location";
    pub const CURRENT_ROLE: &str = "Current Role";
    pub const COMPANY: &str = "Company";
    pub const TAGS: &str = "Tags";
    pub const EXPERIENCE_YEARS: &str = "Experience Years";
    pub const SOURCE: &str = "Source";
    pub const DATE_ADDED: &str = "Date Added";
    pub const STATUS: &str = "Status";
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    records: Vec<RecordRef>,
}

#[derive(Debug, Deserialize)]
struct RecordRef {
    id: String,
}

pub struct AirtableStore {
    http: Client,
    api_key: String,
    endpoint: String,
    base_id: String,
    table: String,
}

impl AirtableStore {
    pub fn new(cfg: &AirtableConfig) -> Result<Self> {
        Self::with_endpoint(cfg, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(cfg: &AirtableConfig, endpoint: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("profile-scout/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(20))
            .build()
            .context("building airtable http client")?;
        Ok(Self {
            http,
            api_key: cfg.api_key.clone(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            base_id: cfg.base_id.clone(),
            table: cfg.table.clone(),
        })
    }

    /// `<endpoint>/<base>/<table>` with the table name percent-encoded.
    pub fn table_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint).context("parsing airtable endpoint")?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("airtable endpoint cannot be a base url"))?
            .pop_if_empty()
            .push(&self.base_id)
            .push(&self.table);
        Ok(url)
    }

    fn record_url(&self, id: &str) -> Result<Url> {
        let mut url = self.table_url()?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("airtable endpoint cannot be a base url"))?
            .push(id);
        Ok(url)
    }

    async fn first_record(&self, formula: &str, sort_by_name: bool) -> Result<Option<RowId>> {
        let mut query: Vec<(&str, &str)> = vec![
            ("filterByFormula", formula),
            ("maxRecords", "1"),
            ("pageSize", "1"),
        ];
        if sort_by_name {
            query.push(("sort[0][field]", fields::NAME));
            query.push(("sort[0][direction]", "asc"));
        }

        let resp = self
            .http
            .get(self.table_url()?)
            .bearer_auth(&self.api_key)
            .query(&query)
            .send()
            .await
            .context("airtable list request")?
            .error_for_status()
            .context("airtable list non-2xx")?;

        let body: ListResponse = resp.json().await.context("parsing airtable list response")?;
        Ok(body.records.into_iter().next().map(|r| r.id))
    }
}

#[async_trait::async_trait]
impl CandidateStore for AirtableStore {
    async fn find_existing(&self, linkedin_url: &str) -> Result<bool> {
        let formula = format!(
            "{{{}}} = '{}'",
            fields::LINKEDIN_URL,
            escape_formula_string(linkedin_url)
        );
        Ok(self.first_record(&formula, false).await?.is_some())
    }

    async fn find_first_blank_row(&self) -> Result<Option<RowId>> {
        let formula = format!("TRIM({{{}}} & '') = ''", fields::NAME);
        self.first_record(&formula, true).await
    }

    async fn write_row(&self, row: Option<&RowId>, candidate: &CandidateRecord) -> Result<()> {
        let body = json!({
            "fields": record_fields(candidate),
            "typecast": true,
        });
        let req = match row {
            Some(id) => self.http.patch(self.record_url(id)?),
            None => self.http.post(self.table_url()?),
        };
        req.bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("airtable write request")?
            .error_for_status()
            .context("airtable write non-2xx")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "airtable"
    }
}

/// Column values for one candidate.
pub fn record_fields(c: &CandidateRecord) -> Value {
    json!({
        fields::NAME: c.name,
        fields::LINKEDIN_URL: c.linkedin_url,
        fields::LOCATION: c.location,
        fields::CURRENT_ROLE: c.current_role,
        fields::COMPANY: c.company,
        fields::TAGS: c.tags,
        fields::EXPERIENCE_YEARS: c.experience_years,
        fields::SOURCE: c.source,
        fields::DATE_ADDED: c.date_added.format("%Y-%m-%d").to_string(),
        fields::STATUS: c.status.as_str(),
    })
}

/// Escape a value for a single-quoted Airtable formula string.
pub fn escape_formula_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}
