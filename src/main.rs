//! profile-scout: binary entrypoint.
//! Boots the Axum control surface and, when configured, the interval scheduler.

use anyhow::Context;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use profile_scout::{api, metrics::Metrics, scheduler, AppConfig, AppState};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("profile_scout=info,warn"));

    // The deployment runtime may already have installed a subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::from_env().context("reading configuration")?;
    let service = profile_scout::build_service(&cfg)?;
    let metrics = Metrics::init()?;

    if let Some(period) = cfg.interval {
        scheduler::spawn_interval_scheduler(service.clone(), period);
    }
    if cfg.auth.manual_secret.is_none() {
        tracing::warn!(target: "api", "SCRAPE_API_KEY not set, POST /scrape is unauthenticated");
    }

    let state = AppState::new(service, cfg.auth.clone());
    let router = api::router(state, Some(&metrics));

    Ok(router.into())
}
