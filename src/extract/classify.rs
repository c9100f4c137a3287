// src/extract/classify.rs
//! Domain tag detection and experience estimate over the combined title + snippet.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Dictionaries;

/// Numeric experience patterns, tried in this order; the first hit wins.
static EXPERIENCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // "10+ years experience", "7 years of experience"
        r"(?i)(\d+)\+?\s*years?\s+(?:of\s+)?experience",
        // "Experience: 6+ years"
        r"(?i)experience\s*:?\s*(\d+)\+?\s*years?",
        // "12 years in banking"
        r"(?i)(\d+)\+?\s*years?\s+in\s+\w+",
        // "4 yrs experience"
        r"(?i)(\d+)\+?\s*yrs?\.?\s+(?:of\s+)?experience",
        // "over 15 years"
        r"(?i)over\s+(\d+)\s+years?",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("experience regex"))
    .collect()
});

/// Module names whose keywords occur in `text`, in dictionary order.
/// Falls back to the dictionary's default tag, so the result is never empty.
pub fn detect_tags(text: &str, dicts: &Dictionaries) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut tags: Vec<String> = Vec::new();
    for module in &dicts.modules {
        if module.keywords.iter().any(|k| lower.contains(k.as_str()))
            && !tags.contains(&module.name)
        {
            tags.push(module.name.clone());
        }
    }
    if tags.is_empty() {
        tags.push(dicts.default_tag.clone());
    }
    tags
}

/// Years from an explicit numeric statement, if any.
pub fn numeric_experience(text: &str) -> Option<u32> {
    EXPERIENCE_PATTERNS.iter().find_map(|re| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
    })
}

/// Years implied by seniority words when nothing numeric is present.
pub fn seniority_experience(text: &str, dicts: &Dictionaries) -> Option<u32> {
    let lower = text.to_lowercase();
    dicts
        .seniority
        .iter()
        .find(|b| b.keywords.iter().any(|k| lower.contains(k.as_str())))
        .map(|b| b.years)
}

/// Numeric patterns first, then seniority buckets, else unknown.
pub fn estimate_experience(text: &str, dicts: &Dictionaries) -> Option<u32> {
    numeric_experience(text).or_else(|| seniority_experience(text, dicts))
}
