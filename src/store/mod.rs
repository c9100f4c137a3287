// src/store/mod.rs
//! Candidate persistence: the storage seam and the dedup/upsert policy on top of it.

pub mod airtable;
pub mod memory;

use anyhow::Result;
use metrics::counter;

use crate::anon::anon_id;
use crate::types::CandidateRecord;

/// Opaque row identifier of the remote table.
pub type RowId = String;

#[async_trait::async_trait]
pub trait CandidateStore: Send + Sync {
    /// Whether a record with this profile URL is already stored.
    async fn find_existing(&self, linkedin_url: &str) -> Result<bool>;

    /// First row whose name is empty or blank, ordered by name ascending.
    async fn find_first_blank_row(&self) -> Result<Option<RowId>>;

    /// Overwrite `row` when given, append a new row otherwise.
    async fn write_row(&self, row: Option<&RowId>, candidate: &CandidateRecord) -> Result<()>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// Written into a blank placeholder row.
    FilledBlank,
    /// Appended as a new row.
    Appended,
    /// Profile URL already stored; nothing written.
    Duplicate,
    /// A store call failed; nothing (reliably) written.
    Failed,
}

impl UpsertOutcome {
    /// `true` only when the candidate was written as a new record.
    pub fn is_written(self) -> bool {
        matches!(self, UpsertOutcome::FilledBlank | UpsertOutcome::Appended)
    }
}

/// Dedup by profile URL, then fill the first blank row or append.
/// Store errors are logged and reported as [`UpsertOutcome::Failed`].
pub async fn upsert_candidate(
    store: &dyn CandidateStore,
    candidate: &CandidateRecord,
) -> UpsertOutcome {
    let id = anon_id(&candidate.linkedin_url);

    match store.find_existing(&candidate.linkedin_url).await {
        Ok(true) => {
            tracing::debug!(target: "store", %id, "duplicate profile, skipping");
            return UpsertOutcome::Duplicate;
        }
        Ok(false) => {}
        Err(e) => {
            tracing::warn!(target: "store", error = ?e, store = store.name(), %id, "dedup lookup failed");
            counter!("scrape_store_errors_total").increment(1);
            return UpsertOutcome::Failed;
        }
    }

    let blank = match store.find_first_blank_row().await {
        Ok(row) => row,
        Err(e) => {
            tracing::warn!(target: "store", error = ?e, store = store.name(), %id, "blank row lookup failed");
            counter!("scrape_store_errors_total").increment(1);
            return UpsertOutcome::Failed;
        }
    };

    match store.write_row(blank.as_ref(), candidate).await {
        Ok(()) => {
            let outcome = if blank.is_some() {
                UpsertOutcome::FilledBlank
            } else {
                UpsertOutcome::Appended
            };
            tracing::info!(
                target: "store",
                %id,
                name = %candidate.name,
                company = %candidate.company,
                outcome = ?outcome,
                "candidate written"
            );
            outcome
        }
        Err(e) => {
            tracing::warn!(target: "store", error = ?e, store = store.name(), %id, "write failed");
            counter!("scrape_store_errors_total").increment(1);
            UpsertOutcome::Failed
        }
    }
}
