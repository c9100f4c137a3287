// tests/upsert_policy.rs
//
// Dedup and blank-row targeting against the in-memory table.

use chrono::NaiveDate;
use profile_scout::store::memory::MemoryStore;
use profile_scout::store::{upsert_candidate, CandidateStore, UpsertOutcome};
use profile_scout::types::{CandidateStatus, CANDIDATE_SOURCE};
use profile_scout::CandidateRecord;

fn candidate(name: &str, url: &str) -> CandidateRecord {
    CandidateRecord {
        name: name.into(),
        linkedin_url: url.into(),
        location: "Switzerland".into(),
        current_role: "Avaloq Consultant".into(),
        company: "Julius Baer".into(),
        tags: vec!["Wealth Management".into()],
        experience_years: Some(8),
        source: CANDIDATE_SOURCE.into(),
        date_added: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
        status: CandidateStatus::New,
    }
}

#[tokio::test]
async fn same_url_twice_writes_once() {
    let store = MemoryStore::new();
    let c = candidate("Eva Brunner", "https://ch.linkedin.com/in/eva");

    let first = upsert_candidate(&store, &c).await;
    let second = upsert_candidate(&store, &c).await;

    assert!(first.is_written());
    assert_eq!(second, UpsertOutcome::Duplicate);
    assert!(!second.is_written());
    assert_eq!(store.records().len(), 1);
}

#[tokio::test]
async fn blank_row_is_overwritten_instead_of_appending() {
    let store = MemoryStore::with_blank_rows(2);
    let before = store.rows().len();

    let out = upsert_candidate(&store, &candidate("Eva", "https://ch.linkedin.com/in/eva")).await;

    assert_eq!(out, UpsertOutcome::FilledBlank);
    assert_eq!(store.rows().len(), before);
    assert_eq!(store.blank_count(), 1);
    assert_eq!(store.rows()[0].name, "Eva");
}

#[tokio::test]
async fn without_blank_rows_a_row_is_appended() {
    let store = MemoryStore::new();
    store
        .write_row(None, &candidate("Existing", "https://ch.linkedin.com/in/existing"))
        .await
        .unwrap();

    let out = upsert_candidate(&store, &candidate("Eva", "https://ch.linkedin.com/in/eva")).await;

    assert_eq!(out, UpsertOutcome::Appended);
    assert_eq!(store.rows().len(), 2);
    assert_eq!(store.rows()[1].name, "Eva");
}

#[tokio::test]
async fn blank_rows_are_filled_in_name_order() {
    let store = MemoryStore::new();
    let _spaces = store.push_placeholder("  ");
    let empty = store.push_placeholder("");

    // "" sorts before "  "
    assert_eq!(store.find_first_blank_row().await.unwrap(), Some(empty));
}

#[tokio::test]
async fn dedup_ignores_placeholders() {
    let store = MemoryStore::with_blank_rows(1);
    assert!(!store
        .find_existing("https://ch.linkedin.com/in/eva")
        .await
        .unwrap());
}
