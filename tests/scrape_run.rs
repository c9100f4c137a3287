// tests/scrape_run.rs
//
// Full orchestrator runs with canned search results, the in-memory table and no delays.

use std::sync::Arc;

use profile_scout::extract::Extractor;
use profile_scout::search::fixture::FixtureSearch;
use profile_scout::store::memory::MemoryStore;
use profile_scout::throttle::NoopThrottle;
use profile_scout::types::NOT_SPECIFIED;
use profile_scout::{Dictionaries, ScrapeService, Scraper, SearchResultItem, TriggerKind};

const GOOGLE_FIXTURE: &str = include_str!("fixtures/google_cse.json");
const DEV_SG: &str = "site:linkedin.com/in Avaloq Developer Singapore";
const CONS_SG: &str = "site:linkedin.com/in Avaloq Consultant Singapore";

fn dicts() -> Arc<Dictionaries> {
    let toml = r#"
        default_tag = "Avaloq General"
        profile_domain = "linkedin.com/in"
        countries = ["Singapore"]
        search_keywords = ["Avaloq Developer", "Avaloq Consultant"]
        role_keywords = ["developer", "consultant", "analyst"]

        [[modules]]
        name = "Cash Management"
        keywords = ["cash management"]

        [[modules]]
        name = "Payments"
        keywords = ["payments", "swift", "sepa"]

        [[seniority]]
        years = 1
        keywords = ["junior", "graduate"]

        [[seniority]]
        years = 5
        keywords = ["developer", "consultant"]
    "#;
    Arc::new(Dictionaries::from_toml_str(toml).expect("test dictionaries"))
}

fn scraper(search: Arc<FixtureSearch>, store: Arc<MemoryStore>, pages: u32) -> Scraper {
    let extractor = Arc::new(Extractor::new(dicts()).expect("extractor"));
    Scraper::new(search, store, Arc::new(NoopThrottle), extractor, pages)
}

fn fixture_search() -> FixtureSearch {
    FixtureSearch::new()
        .with_google_json(DEV_SG, GOOGLE_FIXTURE)
        .expect("google fixture parses")
}

#[tokio::test]
async fn run_extracts_and_stores_every_result() {
    let search = Arc::new(fixture_search());
    let store = Arc::new(MemoryStore::with_blank_rows(1));

    let summary = scraper(search.clone(), store.clone(), 1).run().await;

    assert_eq!(summary.queries, 2);
    assert_eq!(summary.found, 3);
    assert_eq!(summary.added, 3);
    assert_eq!(summary.duplicates, 0);
    assert_eq!(summary.failed, 0);
    assert!(summary.finished_at >= summary.started_at);
    assert_eq!(
        search.calls(),
        vec![(DEV_SG.to_string(), 0), (CONS_SG.to_string(), 0)]
    );

    let records = store.records();
    assert_eq!(records.len(), 3);
    // The placeholder row took the first candidate.
    assert_eq!(store.rows().len(), 3);

    let jane = &records[0];
    assert_eq!(jane.name, "Jane Tan");
    assert_eq!(jane.current_role, "Senior Avaloq Consultant");
    assert_eq!(jane.company, "DBS Bank");
    assert_eq!(jane.tags, vec!["Cash Management".to_string()]);
    assert_eq!(jane.experience_years, Some(10));
    assert_eq!(jane.location, "Singapore");

    let rahul = &records[1];
    assert_eq!(rahul.name, "Rahul Mehta");
    assert_eq!(rahul.current_role, "Avaloq Developer");
    assert_eq!(rahul.company, "UBS");
    assert_eq!(rahul.tags, vec!["Payments".to_string()]);
    assert_eq!(rahul.experience_years, Some(5));

    let chen = &records[2];
    assert_eq!(chen.name, "Chen Wei");
    assert_eq!(chen.company, NOT_SPECIFIED);
    assert_eq!(chen.tags, vec!["Avaloq General".to_string()]);
    assert_eq!(chen.experience_years, Some(1));
}

#[tokio::test]
async fn second_run_only_counts_duplicates() {
    let search = Arc::new(fixture_search());
    let store = Arc::new(MemoryStore::new());
    let s = scraper(search, store.clone(), 1);

    s.run().await;
    let again = s.run().await;

    assert_eq!(again.found, 3);
    assert_eq!(again.added, 0);
    assert_eq!(again.duplicates, 3);
    assert_eq!(store.records().len(), 3);
}

#[tokio::test]
async fn same_profile_under_two_keywords_is_written_once() {
    let item = SearchResultItem::new(
        "Jane Tan - Senior Avaloq Consultant at DBS Bank - LinkedIn",
        "10+ years experience in Cash Management",
        "https://sg.linkedin.com/in/jane-tan",
    );
    let search = Arc::new(
        FixtureSearch::new()
            .with_results(DEV_SG, vec![item.clone()])
            .with_results(CONS_SG, vec![item]),
    );
    let store = Arc::new(MemoryStore::new());

    let summary = scraper(search, store.clone(), 1).run().await;

    assert_eq!(summary.found, 2);
    assert_eq!(summary.added, 1);
    assert_eq!(summary.duplicates, 1);
    assert_eq!(store.records().len(), 1);
}

#[tokio::test]
async fn search_failure_is_skipped_and_run_continues() {
    let item = SearchResultItem::new(
        "Li Na - Avaloq Consultant at OCBC - LinkedIn",
        "",
        "https://sg.linkedin.com/in/li-na",
    );
    let search = Arc::new(
        FixtureSearch::new()
            .failing(DEV_SG)
            .with_results(CONS_SG, vec![item]),
    );
    let store = Arc::new(MemoryStore::new());

    let summary = scraper(search, store.clone(), 1).run().await;

    assert_eq!(summary.queries, 2);
    assert_eq!(summary.found, 1);
    assert_eq!(summary.added, 1);
    assert_eq!(store.records()[0].company, "OCBC");
}

#[tokio::test]
async fn store_failures_are_counted_not_fatal() {
    let search = Arc::new(fixture_search());
    let store = Arc::new(MemoryStore::new());
    store.set_fail_writes(true);

    let summary = scraper(search, store.clone(), 1).run().await;

    assert_eq!(summary.found, 3);
    assert_eq!(summary.added, 0);
    assert_eq!(summary.failed, 3);
    assert!(store.records().is_empty());
}

#[tokio::test]
async fn paging_stops_at_first_empty_page() {
    let page1 = vec![SearchResultItem::new(
        "Page Two - Avaloq Developer at UOB",
        "",
        "https://sg.linkedin.com/in/page-two",
    )];
    let search = Arc::new(fixture_search().with_page(DEV_SG, 1, page1));
    let store = Arc::new(MemoryStore::new());

    let summary = scraper(search.clone(), store, 5).run().await;

    assert_eq!(summary.found, 4);
    let dev_pages: Vec<u32> = search
        .calls()
        .into_iter()
        .filter(|(q, _)| q == DEV_SG)
        .map(|(_, p)| p)
        .collect();
    assert_eq!(dev_pages, vec![0, 1, 2]);
}

#[tokio::test]
async fn run_now_records_last_run() {
    let search = Arc::new(fixture_search());
    let store = Arc::new(MemoryStore::new());
    let service = ScrapeService::new(Arc::new(scraper(search, store, 1)));

    let summary = service
        .run_now(TriggerKind::Manual)
        .await
        .expect("slot free");

    let last = service.tracker().last_run().expect("last run recorded");
    assert_eq!(last.trigger, TriggerKind::Manual);
    assert_eq!(last.summary, summary);
    assert!(!service.tracker().is_running());
}
