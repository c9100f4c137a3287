// src/extract/mod.rs
//! Candidate field extraction: name, role, company, tags and experience from one
//! search result. Pure and total: ambiguous input resolves to sentinels, never errors.

pub mod classify;
pub mod cleanup;
pub mod resolvers;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::config::Dictionaries;
use crate::types::{
    CandidateRecord, CandidateStatus, SearchResultItem, CANDIDATE_SOURCE, NOT_SPECIFIED,
    UNKNOWN_NAME,
};

pub use cleanup::{FieldCleaner, FieldKind};
pub use resolvers::{PartialProfile, Refinement, Resolver, ResultText};

use resolvers::{
    RoleKeywordResolver, SnippetEmployerResolver, SnippetLabelResolver, TitleResolver,
};

static DEFAULT_EXTRACTOR: Lazy<Extractor> = Lazy::new(|| {
    Extractor::new(Dictionaries::embedded()).expect("embedded dictionaries compile")
});

static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\r\f\v]+").expect("ws regex"));

/// Extract with the embedded dictionaries, dated today (UTC).
pub fn extract(item: &SearchResultItem, country: &str) -> CandidateRecord {
    DEFAULT_EXTRACTOR.extract(item, country)
}

/// Decode HTML entities and squeeze horizontal whitespace. Newlines are kept because
/// they terminate snippet labels.
pub fn normalize_input(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);
    let decoded = decoded.replace('\u{00A0}', " ");
    RE_WS.replace_all(&decoded, " ").trim().to_string()
}

/// First title segment without a parenthetical suffix, or "Unknown".
pub fn extract_name(title: &str) -> String {
    let stripped = resolvers::strip_linkedin_suffix(title);
    resolvers::split_segments(&stripped)
        .first()
        .map(|seg| seg.split('(').next().unwrap_or_default().trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_NAME)
        .to_string()
}

pub struct Extractor {
    dicts: Arc<Dictionaries>,
    cleaner: FieldCleaner,
    resolvers: Vec<Box<dyn Resolver>>,
}

impl Extractor {
    pub fn new(dicts: Arc<Dictionaries>) -> Result<Self> {
        let cleaner = FieldCleaner::new(&dicts.countries)?;
        let resolvers: Vec<Box<dyn Resolver>> = vec![
            Box::new(TitleResolver),
            Box::new(SnippetLabelResolver),
            Box::new(SnippetEmployerResolver),
            Box::new(RoleKeywordResolver::new(&dicts.role_keywords)?),
        ];
        Ok(Self {
            dicts,
            cleaner,
            resolvers,
        })
    }

    pub fn dictionaries(&self) -> &Dictionaries {
        &self.dicts
    }

    pub fn extract(&self, item: &SearchResultItem, country: &str) -> CandidateRecord {
        self.extract_on(item, country, Utc::now().date_naive())
    }

    /// Same as [`Extractor::extract`] with an explicit `date_added`.
    pub fn extract_on(
        &self,
        item: &SearchResultItem,
        country: &str,
        date: NaiveDate,
    ) -> CandidateRecord {
        let title = normalize_input(&item.title);
        let snippet = normalize_input(&item.snippet);

        let profile = self.resolve_profile(&title, &snippet);

        let combined = format!("{title} {snippet}");
        let tags = classify::detect_tags(&combined, &self.dicts);
        let experience_years = classify::estimate_experience(&combined, &self.dicts);

        CandidateRecord {
            name: extract_name(&title),
            linkedin_url: item.link.trim().to_string(),
            location: country.to_string(),
            current_role: profile.role.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            company: profile.company.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            tags,
            experience_years,
            source: CANDIDATE_SOURCE.to_string(),
            date_added: date,
            status: CandidateStatus::New,
        }
    }

    /// Run the tiers in order until both slots are filled.
    pub fn resolve_profile(&self, title: &str, snippet: &str) -> PartialProfile {
        let text = ResultText { title, snippet };
        let mut profile = PartialProfile::default();
        for r in &self.resolvers {
            if profile.is_complete() {
                break;
            }
            if let Some(refinement) = r.resolve(&text, &profile) {
                if profile.apply(refinement, &self.cleaner) {
                    tracing::trace!(target: "extract", tier = r.name(), "tier resolved a field");
                }
            }
        }
        profile
    }
}
