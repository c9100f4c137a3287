// src/types.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel for an unresolved role or company.
pub const NOT_SPECIFIED: &str = "Not specified";
/// Sentinel for a title with no usable name segment.
pub const UNKNOWN_NAME: &str = "Unknown";
/// Constant provenance written with every record.
pub const CANDIDATE_SOURCE: &str = "LinkedIn via Google Search";

/// One organic result as returned by the search API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResultItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub link: String,
}

impl SearchResultItem {
    pub fn new(
        title: impl Into<String>,
        snippet: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            link: link.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum CandidateStatus {
    #[default]
    New,
}

impl CandidateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::New => "New",
        }
    }
}

/// Structured profile built from a single search result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub name: String,
    /// Dedup identity.
    pub linkedin_url: String,
    /// The searched country, not parsed from text.
    pub location: String,
    pub current_role: String,
    pub company: String,
    /// Never empty.
    pub tags: Vec<String>,
    /// `None` means no signal, which is different from zero.
    pub experience_years: Option<u32>,
    pub source: String,
    pub date_added: NaiveDate,
    pub status: CandidateStatus,
}

impl CandidateRecord {
    pub fn has_role(&self) -> bool {
        self.current_role != NOT_SPECIFIED
    }

    pub fn has_company(&self) -> bool {
        self.company != NOT_SPECIFIED
    }
}
