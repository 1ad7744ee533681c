//! # agritrust-api — HTTP Service
//!
//! Axum application over the AgriTrust ledger.
//!
//! ## Routers
//!
//! - `/v1/farmers/*`: registration, drafts, batch submission
//! - `/v1/batches/*`: batch records
//! - `/v1/trail/*`: consumer trail, issues, feedback
//! - `/v1/log/*`: transparency log entries, audit, consistency
//! - `/v1/digest`, `/v1/credentials/verify`: stateless tools
//! - `/health/*`, `/metrics`: probes and Prometheus scrape
//!
//! ## Middleware Stack (Tower)
//!
//! TraceLayer → MetricsMiddleware → Handler
//!
//! ## Crate Policy
//!
//! - No business logic in route handlers. They delegate to the registry.
//! - All errors map to structured HTTP responses via `AppError`.

pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::AppConfig;
pub use error::AppError;
pub use state::AppState;

/// Request body ceiling for every `/v1` route.
const BODY_LIMIT: usize = 1024 * 1024;

/// Assemble the application router.
pub fn app(state: AppState) -> Router {
    let metrics_on = state.config.metrics_enabled;
    if metrics_on {
        middleware::metrics::init_metrics();
    }

    let mut api = Router::new()
        .merge(routes::farmers::router())
        .merge(routes::batches::router())
        .merge(routes::trail::router())
        .merge(routes::log::router())
        .merge(routes::tools::router())
        .layer(DefaultBodyLimit::max(BODY_LIMIT));

    if metrics_on {
        api = api.layer(from_fn(middleware::metrics::metrics_middleware));
    }

    let api = api.layer(TraceLayer::new_for_http()).with_state(state.clone());

    let mut probes = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));
    if metrics_on {
        probes = probes.route("/metrics", get(middleware::metrics::serve_metrics));
    }

    Router::new().merge(probes.with_state(state)).merge(api)
}

async fn liveness() -> &'static str {
    "ok"
}

/// Ready while the live transparency log passes its chain audit.
async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.ledger.log().audit().ok {
        (StatusCode::OK, "ready")
    } else {
        tracing::error!("readiness failed: transparency log chain is broken");
        (StatusCode::SERVICE_UNAVAILABLE, "log chain broken")
    }
}
