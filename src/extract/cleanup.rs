// src/extract/cleanup.rs
//! Post-processing for role and company values.
//!
//! Every resolver output passes through [`FieldCleaner::clean`] before it can fill a
//! slot, so a slot is either a cleaned, valid value or still unresolved.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum stored length (characters) for role/company.
pub const MAX_FIELD_CHARS: usize = 80;
pub const MIN_ROLE_CHARS: usize = 3;
pub const MIN_COMPANY_CHARS: usize = 2;

/// Which field is being cleaned; decides the minimum length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Role,
    Company,
}

impl FieldKind {
    pub fn min_chars(self) -> usize {
        match self {
            FieldKind::Role => MIN_ROLE_CHARS,
            FieldKind::Company => MIN_COMPANY_CHARS,
        }
    }
}

static RE_COUNTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)[\s,;:|\-]*\d[\d,.]*\+?\s*(?:years?|yrs?|connections?|followers?)\b.*$",
    )
    .expect("counts regex")
});

/// Profile boilerplate trailers. "University", "View" and "Mutual" only count after a
/// separator or in their profile-page forms, so names like "Bay View Partners" survive.
static RE_BOILERPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)(?:\s*(?:[,;:|]|\s[-–—]\s)\s*\b(?:university|view|mutual)\b|[\s,;:|\-]*(?:\d[\d,.]*\+?\s+)?\b(?:see\s+your|view\s+(?:full\s+)?profile|view\s+\S+(?:\s+\S+)?['’]s\s+profile|mutual\s+connections?|connections|followers)\b).*$",
    )
    .expect("boilerplate regex")
});

static RE_TRAILING_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s.,;:!?|/\\\-–—·•]+$").expect("trailing punct regex"));

static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("ws regex"));

/// Cleans role/company candidates. Holds the country-clause pattern, which depends on
/// the configured country list.
#[derive(Debug, Clone)]
pub struct FieldCleaner {
    country_clause: Option<Regex>,
}

impl FieldCleaner {
    pub fn new(countries: &[String]) -> Result<Self> {
        let alts: Vec<String> = countries
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(regex::escape)
            .collect();
        let country_clause = if alts.is_empty() {
            None
        } else {
            let pattern = format!(
                r"(?is)(?:\s*[,|\-–]\s*|\s+in\s+|\s+)(?:{})\b.*$",
                alts.join("|")
            );
            Some(Regex::new(&pattern).context("compiling country clause regex")?)
        };
        Ok(Self { country_clause })
    }

    /// Returns the cleaned value, or `None` when it should fall back to the sentinel.
    pub fn clean(&self, raw: &str, kind: FieldKind) -> Option<String> {
        // 1) Cut at the first middle-dot / bullet
        let mut out = raw
            .split(['·', '•'])
            .next()
            .unwrap_or_default()
            .to_string();

        // 2) Trailing "5+ years", "500+ connections", "1,234 followers"
        out = RE_COUNTS.replace(&out, "").into_owned();

        // 3) Trailing ", Singapore" / " in Switzerland"
        if let Some(re) = &self.country_clause {
            out = re.replace(&out, "").into_owned();
        }

        // 4) Profile boilerplate
        out = RE_BOILERPLATE.replace(&out, "").into_owned();

        // 5) Trailing punctuation
        out = RE_TRAILING_PUNCT.replace(&out, "").into_owned();

        // 6) Collapse whitespace
        out = RE_WS.replace_all(&out, " ").trim().to_string();

        // 7) Length cap
        if out.chars().count() > MAX_FIELD_CHARS {
            out = out.chars().take(MAX_FIELD_CHARS).collect::<String>();
            out = out.trim_end().to_string();
        }

        if out.chars().count() < kind.min_chars()
            || is_numeric(&out)
            || out.eq_ignore_ascii_case(crate::types::NOT_SPECIFIED)
        {
            return None;
        }
        Some(out)
    }
}

fn is_numeric(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
        && s
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, ',' | '.' | '+'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaner() -> FieldCleaner {
        FieldCleaner::new(&[
            "Singapore".to_string(),
            "Switzerland".into(),
            "Luxembourg".into(),
        ])
        .unwrap()
    }

    #[test]
    fn truncates_at_middle_dot() {
        let c = cleaner();
        assert_eq!(
            c.clean("Avaloq Developer · Education: NUS", FieldKind::Role).as_deref(),
            Some("Avaloq Developer")
        );
        assert_eq!(
            c.clean("UBS • Zurich", FieldKind::Company).as_deref(),
            Some("UBS")
        );
    }

    #[test]
    fn strips_counts_countries_and_boilerplate() {
        let c = cleaner();
        assert_eq!(
            c.clean("Julius Baer 500+ connections", FieldKind::Company).as_deref(),
            Some("Julius Baer")
        );
        assert_eq!(
            c.clean("DBS Bank, Singapore", FieldKind::Company).as_deref(),
            Some("DBS Bank")
        );
        assert_eq!(
            c.clean("Avaloq Engineer in Switzerland.", FieldKind::Role).as_deref(),
            Some("Avaloq Engineer")
        );
        assert_eq!(
            c.clean("Senior Consultant - View Jane's profile", FieldKind::Role).as_deref(),
            Some("Senior Consultant")
        );
        assert_eq!(
            c.clean("Avaloq Analyst 5 yrs", FieldKind::Role).as_deref(),
            Some("Avaloq Analyst")
        );
    }

    #[test]
    fn boilerplate_words_inside_names_are_kept() {
        let c = cleaner();
        assert_eq!(
            c.clean("Bay View Partners", FieldKind::Company).as_deref(),
            Some("Bay View Partners")
        );
        assert_eq!(
            c.clean("Mutual Bank", FieldKind::Company).as_deref(),
            Some("Mutual Bank")
        );
        assert_eq!(
            c.clean("University Hospital Zurich", FieldKind::Company).as_deref(),
            Some("University Hospital Zurich")
        );
        assert_eq!(
            c.clean("Avaloq Consultant, University of Zurich", FieldKind::Role).as_deref(),
            Some("Avaloq Consultant")
        );
        assert_eq!(
            c.clean("Bay View Partners View Anna's profile", FieldKind::Company).as_deref(),
            Some("Bay View Partners")
        );
        assert_eq!(
            c.clean("Mutual Bank 12 mutual connections", FieldKind::Company).as_deref(),
            Some("Mutual Bank")
        );
        assert_eq!(
            c.clean("UBS See your mutual connections", FieldKind::Company).as_deref(),
            Some("UBS")
        );
    }

    #[test]
    fn country_name_leading_a_company_is_kept() {
        let c = cleaner();
        assert_eq!(
            c.clean("Singapore Exchange", FieldKind::Company).as_deref(),
            Some("Singapore Exchange")
        );
    }

    #[test]
    fn short_or_numeric_values_reset() {
        let c = cleaner();
        assert_eq!(c.clean("X", FieldKind::Company), None);
        assert_eq!(c.clean("HR", FieldKind::Company).as_deref(), Some("HR"));
        assert_eq!(c.clean("HR", FieldKind::Role), None);
        assert_eq!(c.clean("2019", FieldKind::Company), None);
        assert_eq!(c.clean("5+ years", FieldKind::Role), None);
        assert_eq!(c.clean("  ,. ", FieldKind::Role), None);
        assert_eq!(c.clean("Not specified", FieldKind::Role), None);
    }

    #[test]
    fn collapses_whitespace_and_caps_length() {
        let c = cleaner();
        assert_eq!(
            c.clean("  Lead   Avaloq\tDeveloper ;", FieldKind::Role).as_deref(),
            Some("Lead Avaloq Developer")
        );
        let long = "Word ".repeat(40);
        let out = c.clean(&long, FieldKind::Role).unwrap();
        assert!(out.chars().count() <= MAX_FIELD_CHARS);
        assert!(!out.ends_with(' '));
    }
}
