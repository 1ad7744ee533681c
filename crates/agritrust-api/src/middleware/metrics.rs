//! # Prometheus Metrics
//!
//! HTTP request metrics are recorded in middleware. Ledger metrics
//! (submissions, failures, trail lookups) are recorded by the handlers that
//! drive those operations. All of it is rendered at `GET /metrics`.

use std::sync::OnceLock;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const HTTP_REQUESTS_TOTAL: &str = "agritrust_http_requests_total";
pub const HTTP_REQUEST_DURATION: &str = "agritrust_http_request_duration_seconds";
pub const SUBMISSIONS_TOTAL: &str = "agritrust_submissions_total";
pub const SUBMISSION_FAILURES_TOTAL: &str = "agritrust_submission_failures_total";
pub const TRAIL_LOOKUPS_TOTAL: &str = "agritrust_trail_lookups_total";

const UNMATCHED_ENDPOINT: &str = "unmatched";

static PROMETHEUS_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Install the global Prometheus recorder once.
///
/// Returns `None` if another recorder is already installed in this process.
pub fn init_metrics() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                describe_counter!(HTTP_REQUESTS_TOTAL, "Total HTTP requests");
                describe_histogram!(HTTP_REQUEST_DURATION, "HTTP request duration in seconds");
                describe_counter!(SUBMISSIONS_TOTAL, "Batches committed to the ledger");
                describe_counter!(
                    SUBMISSION_FAILURES_TOTAL,
                    "Batch submissions aborted, by reason"
                );
                describe_counter!(TRAIL_LOOKUPS_TOTAL, "Consumer trail lookups, by outcome");
                tracing::info!("prometheus metrics recorder initialized");
                Some(handle)
            }
            Err(e) => {
                tracing::warn!(error = %e, "prometheus recorder not installed");
                None
            }
        })
        .clone()
}

pub fn prometheus_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned().flatten()
}

fn endpoint_label(request: &Request) -> String {
    request.extensions().get::<MatchedPath>().map_or_else(
        || UNMATCHED_ENDPOINT.to_string(),
        |path| path.as_str().to_string(),
    )
}

fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "unknown",
    }
}

/// Records `agritrust_http_requests_total` and the request duration
/// histogram, labelled by matched route, method and status class.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = endpoint_label(&request);
    let method = request.method().to_string();

    let response = next.run(request).await;

    let labels = [
        ("endpoint", endpoint),
        ("method", method),
        ("status_class", status_class(response.status()).to_string()),
    ];
    histogram!(HTTP_REQUEST_DURATION, &labels).record(start.elapsed().as_secs_f64());
    counter!(HTTP_REQUESTS_TOTAL, &labels).increment(1);

    response
}

/// `GET /metrics`.
pub async fn serve_metrics() -> impl IntoResponse {
    match prometheus_handle() {
        Some(handle) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [("content-type", "text/plain; charset=utf-8")],
            "metrics not initialized".to_string(),
        ),
    }
}

pub fn record_submission() {
    counter!(SUBMISSIONS_TOTAL).increment(1);
}

pub fn record_submission_failure(reason: &'static str) {
    counter!(SUBMISSION_FAILURES_TOTAL, "reason" => reason).increment(1);
}

pub fn record_trail_lookup(outcome: &'static str) {
    counter!(TRAIL_LOOKUPS_TOTAL, "outcome" => outcome).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classes() {
        assert_eq!(status_class(StatusCode::OK), "2xx");
        assert_eq!(status_class(StatusCode::CREATED), "2xx");
        assert_eq!(status_class(StatusCode::NOT_FOUND), "4xx");
        assert_eq!(status_class(StatusCode::SERVICE_UNAVAILABLE), "5xx");
    }

    #[test]
    fn init_is_idempotent() {
        let first = init_metrics().is_some();
        let second = init_metrics().is_some();
        assert_eq!(first, second);
    }
}
