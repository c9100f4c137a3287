// src/config/dictionaries.rs
//! Immutable keyword dictionaries: domain modules, role keywords, seniority buckets,
//! target countries and search phrases.
//!
//! The defaults ship embedded from `config/dictionaries.toml`. A different file can be
//! supplied through `DICTIONARIES_PATH`; it fully replaces the embedded one.

use anyhow::{anyhow, bail, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const ENV_DICTIONARIES_PATH: &str = "DICTIONARIES_PATH";

static EMBEDDED: Lazy<Arc<Dictionaries>> = Lazy::new(|| {
    let raw = include_str!("../../config/dictionaries.toml");
    Arc::new(Dictionaries::from_toml_str(raw).expect("valid embedded dictionaries"))
});

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModuleKeywords {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SeniorityBucket {
    pub years: u32,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Dictionaries {
    /// Tag used when no module keyword matches.
    pub default_tag: String,
    /// Domain used in the `site:` query prefix.
    pub profile_domain: String,
    pub countries: Vec<String>,
    pub search_keywords: Vec<String>,
    pub role_keywords: Vec<String>,
    #[serde(default)]
    pub modules: Vec<ModuleKeywords>,
    #[serde(default)]
    pub seniority: Vec<SeniorityBucket>,
}

impl Dictionaries {
    /// Shared handle to the dictionaries compiled into the binary.
    pub fn embedded() -> Arc<Self> {
        Arc::clone(&EMBEDDED)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut d: Dictionaries = toml::from_str(s).context("parsing dictionaries toml")?;
        d.normalize();
        d.validate()?;
        Ok(d)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading dictionaries from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Resolve dictionaries:
    /// 1) explicit `path` (usually from config)
    /// 2) $DICTIONARIES_PATH
    /// 3) embedded defaults
    pub fn load_default(path: Option<&Path>) -> Result<Arc<Self>> {
        if let Some(p) = path {
            return Self::load_from(p).map(Arc::new);
        }
        if let Ok(p) = std::env::var(ENV_DICTIONARIES_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("DICTIONARIES_PATH points to non-existent path"));
            }
            return Self::load_from(&pb).map(Arc::new);
        }
        Ok(Self::embedded())
    }

    /// Keyword matching is substring-based on lowercased text, so keywords are stored
    /// lowercased and trimmed. Display values (tags, countries, phrases) keep their case.
    fn normalize(&mut self) {
        self.default_tag = self.default_tag.trim().to_string();
        self.profile_domain = self.profile_domain.trim().trim_end_matches('/').to_string();
        self.countries = clean_list(std::mem::take(&mut self.countries), false);
        self.search_keywords = clean_list(std::mem::take(&mut self.search_keywords), false);
        self.role_keywords = clean_list(std::mem::take(&mut self.role_keywords), true);
        for m in &mut self.modules {
            m.name = m.name.trim().to_string();
            m.keywords = clean_list(std::mem::take(&mut m.keywords), true);
        }
        for b in &mut self.seniority {
            b.keywords = clean_list(std::mem::take(&mut b.keywords), true);
        }
    }

    fn validate(&self) -> Result<()> {
        if self.default_tag.is_empty() {
            bail!("dictionaries: default_tag must not be empty");
        }
        if self.profile_domain.is_empty() {
            bail!("dictionaries: profile_domain must not be empty");
        }
        if self.countries.is_empty() {
            bail!("dictionaries: at least one country is required");
        }
        if self.search_keywords.is_empty() {
            bail!("dictionaries: at least one search keyword is required");
        }
        if let Some(m) = self.modules.iter().find(|m| m.name.is_empty()) {
            bail!("dictionaries: module with keywords {:?} has no name", m.keywords);
        }
        Ok(())
    }
}

/// Trim, drop empties, optionally lowercase; keeps first-seen order.
fn clean_list(items: Vec<String>, lowercase: bool) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if t.is_empty() {
            continue;
        }
        let t = if lowercase {
            t.to_lowercase()
        } else {
            t.to_string()
        };
        if !out.contains(&t) {
            out.push(t);
        }
    }
    out
}
