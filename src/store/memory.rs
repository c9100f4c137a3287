// src/store/memory.rs
//! In-process candidate table. Used by tests and local runs without Airtable credentials.

use anyhow::{bail, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{CandidateStore, RowId};
use crate::types::CandidateRecord;

#[derive(Debug, Clone)]
pub struct StoredRow {
    pub id: RowId,
    pub name: String,
    pub record: Option<CandidateRecord>,
}

impl StoredRow {
    fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<StoredRow>>,
    next_id: AtomicUsize,
    fail_writes: AtomicBool,
    fail_lookups: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table pre-seeded with `n` placeholder rows whose name is empty.
    pub fn with_blank_rows(n: usize) -> Self {
        let store = Self::new();
        for _ in 0..n {
            store.push_placeholder("");
        }
        store
    }

    /// Append a placeholder row with the given (possibly whitespace-only) name.
    pub fn push_placeholder(&self, name: &str) -> RowId {
        let id = self.alloc_id();
        self.lock().push(StoredRow {
            id: id.clone(),
            name: name.to_string(),
            record: None,
        });
        id
    }

    pub fn set_fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    pub fn set_fail_lookups(&self, on: bool) {
        self.fail_lookups.store(on, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<StoredRow> {
        self.lock().clone()
    }

    /// Written candidates in row order.
    pub fn records(&self) -> Vec<CandidateRecord> {
        self.lock()
            .iter()
            .filter_map(|r| r.record.clone())
            .collect()
    }

    pub fn blank_count(&self) -> usize {
        self.lock().iter().filter(|r| r.is_blank()).count()
    }

    fn alloc_id(&self) -> RowId {
        format!("rec{:06}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<StoredRow>> {
        // A poisoned lock only means a test thread panicked mid-write; the rows are still usable.
        self.rows.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn check_lookup(&self) -> Result<()> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            bail!("memory store: lookup failure injected");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CandidateStore for MemoryStore {
    async fn find_existing(&self, linkedin_url: &str) -> Result<bool> {
        self.check_lookup()?;
        Ok(self
            .lock()
            .iter()
            .any(|r| r.record.as_ref().is_some_and(|c| c.linkedin_url == linkedin_url)))
    }

    async fn find_first_blank_row(&self) -> Result<Option<RowId>> {
        self.check_lookup()?;
        let rows = self.lock();
        let mut blanks: Vec<&StoredRow> = rows.iter().filter(|r| r.is_blank()).collect();
        blanks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(blanks.first().map(|r| r.id.clone()))
    }

    async fn write_row(&self, row: Option<&RowId>, candidate: &CandidateRecord) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("memory store: write failure injected");
        }
        match row {
            Some(id) => {
                let mut rows = self.lock();
                let Some(slot) = rows.iter_mut().find(|r| &r.id == id) else {
                    bail!("memory store: no row {id}");
                };
                slot.name = candidate.name.clone();
                slot.record = Some(candidate.clone());
            }
            None => {
                let id = self.alloc_id();
                self.lock().push(StoredRow {
                    id,
                    name: candidate.name.clone(),
                    record: Some(candidate.clone()),
                });
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
