// tests/metrics.rs
use std::sync::Arc;

use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use profile_scout::config::AuthConfig;
use profile_scout::extract::Extractor;
use profile_scout::metrics::Metrics;
use profile_scout::search::fixture::FixtureSearch;
use profile_scout::store::memory::MemoryStore;
use profile_scout::throttle::NoopThrottle;
use profile_scout::{
    api, AppState, Dictionaries, ScrapeService, Scraper, SearchResultItem, TriggerKind,
};

#[tokio::test]
async fn metrics_endpoint_exposes_scrape_series() {
    let metrics = Metrics::init().expect("recorder");
    // Second init reuses the installed recorder.
    let again = Metrics::init().expect("idempotent init");

    let dicts = Dictionaries::embedded();
    let query = profile_scout::search::build_query(
        &dicts.profile_domain,
        &dicts.search_keywords[0],
        &dicts.countries[0],
    );
    let search = Arc::new(FixtureSearch::new().with_results(
        query,
        vec![SearchResultItem::new(
            "Jane Tan - Senior Avaloq Consultant at DBS Bank - LinkedIn",
            "10+ years experience in Cash Management",
            "https://sg.linkedin.com/in/jane-tan",
        )],
    ));
    let scraper = Scraper::new(
        search,
        Arc::new(MemoryStore::new()),
        Arc::new(NoopThrottle),
        Arc::new(Extractor::new(dicts).unwrap()),
        1,
    );
    let service = ScrapeService::new(Arc::new(scraper));
    service.run_now(TriggerKind::Manual).await.unwrap();

    let app = api::router(AppState::new(service, AuthConfig::default()), Some(&metrics));
    let resp = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    // axum::body::to_bytes requires an explicit limit
    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();

    for series in [
        "scrape_runs_total",
        "scrape_results_found_total",
        "scrape_candidates_added_total",
        "scrape_last_run_ts",
        "scrape_run_duration_ms",
    ] {
        assert!(text.contains(series), "missing {series} in:\n{text}");
    }
    assert!(again.render().contains("scrape_runs_total"));
}
