// src/config/mod.rs
//! Runtime configuration read from the environment (optionally seeded from `.env`).
//!
//! Missing credentials are a startup error; everything else has a default.

pub mod dictionaries;

use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;

pub use dictionaries::Dictionaries;

pub const DEFAULT_AIRTABLE_TABLE: &str = "Candidates";
pub const DEFAULT_RESULT_DELAY_MS: u64 = 1_500;
pub const DEFAULT_KEYWORD_DELAY_MS: u64 = 5_000;
pub const DEFAULT_SEARCH_PAGES: u32 = 1;
/// Custom Search refuses `start` beyond 100, i.e. 10 pages of 10.
pub const MAX_SEARCH_PAGES: u32 = 10;

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub api_key: String,
    pub cse_id: String,
}

#[derive(Debug, Clone)]
pub struct AirtableConfig {
    pub api_key: String,
    pub base_id: String,
    pub table: String,
}

/// Shared secrets for the two trigger routes.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// When set, `POST /scrape` requires a matching `x-api-key` header.
    pub manual_secret: Option<String>,
    /// `GET /cron/scrape` requires `?secret=` to match; unset means the route is closed.
    pub cron_secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub google: GoogleConfig,
    pub airtable: AirtableConfig,
    pub auth: AuthConfig,
    pub result_delay: Duration,
    pub keyword_delay: Duration,
    pub search_pages: u32,
    /// In-process scheduler period; `None` leaves scheduling to an external cron.
    pub interval: Option<Duration>,
    pub dictionaries_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any key lookup (env, map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| {
            lookup(k)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut missing = Vec::new();
        let mut required = |k: &'static str| match get(k) {
            Some(v) => v,
            None => {
                missing.push(k);
                String::new()
            }
        };
        let google = GoogleConfig {
            api_key: required("GOOGLE_API_KEY"),
            cse_id: required("GOOGLE_CSE_ID"),
        };
        let airtable_key = required("AIRTABLE_API_KEY");
        let airtable_base = required("AIRTABLE_BASE_ID");
        if !missing.is_empty() {
            bail!("missing required configuration: {}", missing.join(", "));
        }

        let airtable = AirtableConfig {
            api_key: airtable_key,
            base_id: airtable_base,
            table: get("AIRTABLE_TABLE").unwrap_or_else(|| DEFAULT_AIRTABLE_TABLE.to_string()),
        };

        let auth = AuthConfig {
            manual_secret: get("SCRAPE_API_KEY"),
            cron_secret: get("CRON_SECRET"),
        };

        let parse_u64 = |k: &str, default: u64| -> Result<u64> {
            match get(k) {
                None => Ok(default),
                Some(v) => v
                    .parse::<u64>()
                    .map_err(|e| anyhow::anyhow!("{k} must be a non-negative integer: {e}")),
            }
        };

        let result_delay = Duration::from_millis(parse_u64("RESULT_DELAY_MS", DEFAULT_RESULT_DELAY_MS)?);
        let keyword_delay =
            Duration::from_millis(parse_u64("KEYWORD_DELAY_MS", DEFAULT_KEYWORD_DELAY_MS)?);
        let search_pages = parse_u64("SEARCH_PAGES", DEFAULT_SEARCH_PAGES as u64)?
            .clamp(1, MAX_SEARCH_PAGES as u64) as u32;
        let interval = match parse_u64("SCRAPE_INTERVAL_SECS", 0)? {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(Self {
            google,
            airtable,
            auth,
            result_delay,
            keyword_delay,
            search_pages,
            interval,
            dictionaries_path: get("DICTIONARIES_PATH").map(PathBuf::from),
        })
    }
}
