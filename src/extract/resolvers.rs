// src/extract/resolvers.rs
//! Tiered role/company resolution.
//!
//! Each tier is a [`Resolver`] that inspects the result text plus the current
//! [`PartialProfile`] and may propose a [`Refinement`]. Proposals are cleaned before they
//! fill a slot, and a filled slot is never overwritten by a later tier.
//!
//! Order:
//! 1. [`TitleResolver`]        "Name - Role at Company - LinkedIn" and segment counts
//! 2. [`SnippetLabelResolver`] "Current: Role at Company."
//! 3. [`SnippetEmployerResolver`] "... at Capitalized Company ·"
//! 4. [`RoleKeywordResolver`]  phrase around the first role keyword

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use super::cleanup::{FieldCleaner, FieldKind};

/// Title segment separators: pipes, en/em dashes, and hyphens with spaces around them
/// (a bare hyphen stays inside names like "Jean-Luc").
static RE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[|–—]\s*|\s+-\s+").expect("separator regex"));

/// Separator followed by the word "LinkedIn"; only the last one can start the site trailer.
static RE_LINKEDIN_MARK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*[-|–—]\s*LinkedIn\b").expect("linkedin mark regex"));

static RE_ROLE_AT_COMPANY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)(?:\s+at\s+|\s*@\s*)(.+)$").expect("role-at regex"));

static RE_SNIPPET_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:currently|current|experience)\s*:\s*([^.·\n]+?)(?:(?:\s+at\s+|\s*@\s*)([^.·\n]+?))?\s*(?:[.·\n]|$)",
    )
    .expect("snippet label regex")
});

static RE_SNIPPET_EMPLOYER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\bat\s+|@\s*)(\p{Lu}[\p{L}\p{N}&'\-]*(?:[ \t]+\p{Lu}[\p{L}\p{N}&'\-]*)*)\s*(?:[·•.]|\bin\b|\d|$)",
    )
    .expect("snippet employer regex")
});

/// Capitalized word used around a role keyword.
const CAP_WORD: &str = r"\p{Lu}[\p{L}\p{N}&/+\-]*";

/// Borrowed view of the (already normalized) result text.
#[derive(Debug, Clone, Copy)]
pub struct ResultText<'a> {
    pub title: &'a str,
    pub snippet: &'a str,
}

/// Role/company resolved so far. `None` means still at the sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialProfile {
    pub role: Option<String>,
    pub company: Option<String>,
}

impl PartialProfile {
    pub fn is_complete(&self) -> bool {
        self.role.is_some() && self.company.is_some()
    }

    /// Fill unresolved slots from `refinement`, cleaning each value first.
    /// Returns true if any slot changed.
    pub fn apply(&mut self, refinement: Refinement, cleaner: &FieldCleaner) -> bool {
        let mut changed = false;
        if self.role.is_none() {
            if let Some(raw) = refinement.role {
                self.role = cleaner.clean(&raw, FieldKind::Role);
                changed |= self.role.is_some();
            }
        }
        if self.company.is_none() {
            if let Some(raw) = refinement.company {
                self.company = cleaner.clean(&raw, FieldKind::Company);
                changed |= self.company.is_some();
            }
        }
        changed
    }
}

/// Raw (uncleaned) values proposed by a resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Refinement {
    pub role: Option<String>,
    pub company: Option<String>,
}

impl Refinement {
    fn role(s: &str) -> Self {
        Self {
            role: Some(s.to_string()),
            company: None,
        }
    }

    fn company(s: &str) -> Self {
        Self {
            role: None,
            company: Some(s.to_string()),
        }
    }

    fn both(role: &str, company: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            company: Some(company.to_string()),
        }
    }
}

pub trait Resolver: Send + Sync {
    fn name(&self) -> &'static str;
    fn resolve(&self, text: &ResultText<'_>, current: &PartialProfile) -> Option<Refinement>;
}

/// Split a title into trimmed, non-empty segments.
pub fn split_segments(title: &str) -> Vec<&str> {
    RE_SEPARATOR
        .split(title)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Drop a trailing "| LinkedIn" / "- LinkedIn Singapore" marker. "LinkedIn" earlier in
/// the title, or followed by more than one word, is part of a role or company and stays.
pub fn strip_linkedin_suffix(title: &str) -> String {
    let Some(m) = RE_LINKEDIN_MARK.find_iter(title).last() else {
        return title.to_string();
    };
    let tail = &title[m.end()..];
    let words = tail
        .split_whitespace()
        .filter(|w| w.chars().any(char::is_alphanumeric))
        .count();
    if words <= 1 && !RE_SEPARATOR.is_match(tail) {
        title[..m.start()].to_string()
    } else {
        title.to_string()
    }
}

/// Tier 1: structure of the result title.
pub struct TitleResolver;

impl Resolver for TitleResolver {
    fn name(&self) -> &'static str {
        "title"
    }

    fn resolve(&self, text: &ResultText<'_>, current: &PartialProfile) -> Option<Refinement> {
        if current.is_complete() {
            return None;
        }
        let stripped = strip_linkedin_suffix(text.title);
        let segments = split_segments(&stripped);
        if segments.len() < 2 {
            return None;
        }

        let remainder = segments[1..].join(" - ");
        if let Some(c) = RE_ROLE_AT_COMPANY.captures(&remainder) {
            return Some(Refinement::both(&c[1], &c[2]));
        }
        match segments.len() {
            3 => Some(Refinement::both(segments[1], segments[2])),
            2 => Some(Refinement::role(segments[1])),
            _ => None,
        }
    }
}

/// Tier 2: "Current:", "Currently:" or "Experience:" label in the snippet.
pub struct SnippetLabelResolver;

impl Resolver for SnippetLabelResolver {
    fn name(&self) -> &'static str {
        "snippet_label"
    }

    fn resolve(&self, text: &ResultText<'_>, current: &PartialProfile) -> Option<Refinement> {
        if current.is_complete() {
            return None;
        }
        let c = RE_SNIPPET_LABEL.captures(text.snippet)?;
        Some(Refinement {
            role: c.get(1).map(|m| m.as_str().to_string()),
            company: c.get(2).map(|m| m.as_str().to_string()),
        })
    }
}

/// Tier 3: "at Capitalized Words" employer mention in the snippet.
pub struct SnippetEmployerResolver;

impl Resolver for SnippetEmployerResolver {
    fn name(&self) -> &'static str {
        "snippet_employer"
    }

    fn resolve(&self, text: &ResultText<'_>, current: &PartialProfile) -> Option<Refinement> {
        if current.company.is_some() {
            return None;
        }
        let c = RE_SNIPPET_EMPLOYER.captures(text.snippet)?;
        Some(Refinement::company(&c[1]))
    }
}

/// Tier 4: short phrase around the first configured role keyword found in the snippet.
pub struct RoleKeywordResolver {
    patterns: Vec<Regex>,
}

impl RoleKeywordResolver {
    /// One pattern per keyword, keeping the dictionary order.
    pub fn new(keywords: &[String]) -> Result<Self> {
        let patterns = keywords
            .iter()
            .map(|kw| {
                let pattern = format!(
                    r"(?:{CAP_WORD}[ \t]+){{0,3}}\b(?i:{kw})\b(?:[ \t]+{CAP_WORD}){{0,2}}",
                    kw = regex::escape(kw),
                );
                Regex::new(&pattern).with_context(|| format!("role keyword `{kw}` regex"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }
}

impl Resolver for RoleKeywordResolver {
    fn name(&self) -> &'static str {
        "role_keyword"
    }

    fn resolve(&self, text: &ResultText<'_>, current: &PartialProfile) -> Option<Refinement> {
        if current.role.is_some() {
            return None;
        }
        self.patterns
            .iter()
            .find_map(|re| re.find(text.snippet))
            .map(|m| Refinement::role(m.as_str()))
    }
}
