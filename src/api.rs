// src/api.rs
//! HTTP control surface: health, status and the two scrape triggers.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::config::AuthConfig;
use crate::metrics::Metrics;
use crate::runs::{LastRun, ScrapeService, TriggerKind, TriggerOutcome};

pub const SERVICE_NAME: &str = "profile-scout";
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
pub struct AppState {
    pub service: ScrapeService,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(service: ScrapeService, auth: AuthConfig) -> Self {
        Self { service, auth }
    }
}

/// Build the router. `/metrics` is mounted when a recorder handle is given.
pub fn router(state: AppState, metrics: Option<&Metrics>) -> Router {
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/status", get(status))
        .route("/scrape", post(manual_trigger))
        .route("/cron/scrape", get(cron_trigger))
        .layer(CorsLayer::very_permissive())
        .with_state(state);

    match metrics {
        Some(m) => app.merge(m.router()),
        None => app,
    }
}

#[derive(Serialize)]
struct StatusOut {
    service: &'static str,
    running: bool,
    last_run: Option<LastRun>,
    countries: usize,
    keywords: usize,
    pages: u32,
}

async fn status(State(state): State<AppState>) -> Json<StatusOut> {
    let scraper = state.service.scraper();
    let dicts = scraper.extractor().dictionaries();
    Json(StatusOut {
        service: SERVICE_NAME,
        running: state.service.tracker().is_running(),
        last_run: state.service.tracker().last_run(),
        countries: dicts.countries.len(),
        keywords: dicts.search_keywords.len(),
        pages: scraper.pages(),
    })
}

async fn manual_trigger(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(expected) = state.auth.manual_secret.as_deref() {
        let given = headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());
        if !secret_matches(expected, given) {
            return unauthorized(TriggerKind::Manual);
        }
    }
    accepted(TriggerKind::Manual, state.service.trigger(TriggerKind::Manual))
}

#[derive(Deserialize)]
struct CronQuery {
    secret: Option<String>,
}

async fn cron_trigger(State(state): State<AppState>, Query(q): Query<CronQuery>) -> Response {
    // No configured secret keeps the cron route closed.
    let Some(expected) = state.auth.cron_secret.as_deref() else {
        return unauthorized(TriggerKind::Cron);
    };
    if !secret_matches(expected, q.secret.as_deref()) {
        return unauthorized(TriggerKind::Cron);
    }
    accepted(TriggerKind::Cron, state.service.trigger(TriggerKind::Cron))
}

fn secret_matches(expected: &str, given: Option<&str>) -> bool {
    matches!(given, Some(g) if !expected.is_empty() && g == expected)
}

fn unauthorized(kind: TriggerKind) -> Response {
    tracing::warn!(target: "api", trigger = kind.as_str(), "trigger rejected: bad or missing secret");
    counter!("scrape_triggers_rejected_total", "trigger" => kind.as_str()).increment(1);
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "unauthorized" })),
    )
        .into_response()
}

fn accepted(kind: TriggerKind, outcome: TriggerOutcome) -> Response {
    let status = match outcome {
        TriggerOutcome::Started => "started",
        TriggerOutcome::AlreadyRunning => "already_running",
    };
    (
        StatusCode::ACCEPTED,
        Json(json!({ "status": status, "trigger": kind.as_str() })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_must_be_present_and_equal() {
        assert!(secret_matches("s3cret", Some("s3cret")));
        assert!(!secret_matches("s3cret", Some("S3CRET")));
        assert!(!secret_matches("s3cret", None));
        assert!(!secret_matches("", Some("")));
    }
}
