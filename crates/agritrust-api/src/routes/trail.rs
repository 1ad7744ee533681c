//! # Consumer Trail
//!
//! Routes:
//! - GET  /v1/trail/{code} — provenance trail for a consumer code
//! - POST /v1/trail/{code}/issues — report a problem
//! - POST /v1/trail/{code}/feedback — rate the batch
//!
//! An unknown code is answered with 200 and `"status": "unknown_code"`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use agritrust_core::Timestamp;
use agritrust_registry::{ConsumerIssue, Feedback, TrailReport, Verdict};

use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::middleware::metrics;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IssueRequest {
    pub description: String,
    #[serde(default)]
    pub contact: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/trail/{code}", get(lookup))
        .route("/v1/trail/{code}/issues", post(report_issue))
        .route("/v1/trail/{code}/feedback", post(leave_feedback))
}

async fn lookup(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<TrailReport>, AppError> {
    let report = state.ledger.lookup(&code)?;
    let outcome = match &report {
        TrailReport::UnknownCode { .. } => "unknown_code",
        TrailReport::Found(trail) if trail.verdict == Verdict::Verified => "verified",
        TrailReport::Found(_) => "unverified",
    };
    metrics::record_trail_lookup(outcome);
    Ok(Json(report))
}

async fn report_issue(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ValidatedJson(req): ValidatedJson<IssueRequest>,
) -> Result<(StatusCode, Json<ConsumerIssue>), AppError> {
    let issue = state
        .ledger
        .report_issue(&code, &req.description, req.contact, Timestamp::now())?;
    Ok((StatusCode::CREATED, Json(issue)))
}

async fn leave_feedback(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ValidatedJson(req): ValidatedJson<FeedbackRequest>,
) -> Result<(StatusCode, Json<Feedback>), AppError> {
    let feedback = state
        .ledger
        .leave_feedback(&code, req.rating, &req.comment, Timestamp::now())?;
    Ok((StatusCode::CREATED, Json(feedback)))
}
