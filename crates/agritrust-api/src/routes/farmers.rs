//! # Farmers
//!
//! Routes:
//! - POST   /v1/farmers — register a farmer
//! - GET    /v1/farmers/{farmer_id} — farmer profile
//! - GET    /v1/farmers/{farmer_id}/draft — saved draft
//! - PUT    /v1/farmers/{farmer_id}/draft — save or replace the draft
//! - DELETE /v1/farmers/{farmer_id}/draft — discard the draft
//! - POST   /v1/farmers/{farmer_id}/batches — submit a batch

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use agritrust_core::{FarmerId, Timestamp};
use agritrust_registry::{
    BatchDraft, ClaimDraft, Draft, Farmer, FarmerRegistration, Submission, SubmissionError,
};

use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::middleware::metrics;
use crate::state::AppState;

/// Body of draft saves and batch submissions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    pub batch: BatchDraft,
    #[serde(default)]
    pub claims: Vec<ClaimDraft>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/farmers", post(register))
        .route("/v1/farmers/{farmer_id}", get(get_farmer))
        .route(
            "/v1/farmers/{farmer_id}/draft",
            get(get_draft).put(save_draft).delete(clear_draft),
        )
        .route("/v1/farmers/{farmer_id}/batches", post(submit_batch))
}

fn farmer_id(raw: &str) -> Result<FarmerId, AppError> {
    Ok(FarmerId::new(raw)?)
}

fn known_farmer(state: &AppState, raw: &str) -> Result<Farmer, AppError> {
    let id = farmer_id(raw)?;
    state
        .ledger
        .farmer(&id)?
        .ok_or_else(|| AppError::NotFound(format!("farmer {id}")))
}

async fn register(
    State(state): State<AppState>,
    ValidatedJson(registration): ValidatedJson<FarmerRegistration>,
) -> Result<(StatusCode, Json<Farmer>), AppError> {
    let farmer = state.ledger.register_farmer(registration, Timestamp::now())?;
    Ok((StatusCode::CREATED, Json(farmer)))
}

async fn get_farmer(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<Farmer>, AppError> {
    Ok(Json(known_farmer(&state, &raw)?))
}

async fn get_draft(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<Draft>, AppError> {
    let farmer = known_farmer(&state, &raw)?;
    state
        .ledger
        .draft(&farmer.id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("draft for farmer {}", farmer.id)))
}

async fn save_draft(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    ValidatedJson(req): ValidatedJson<BatchRequest>,
) -> Result<Json<Draft>, AppError> {
    let farmer = known_farmer(&state, &raw)?;
    let draft = state
        .ledger
        .save_draft(&farmer.id, req.batch, req.claims, Timestamp::now())?;
    Ok(Json(draft))
}

async fn clear_draft(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<StatusCode, AppError> {
    let farmer = known_farmer(&state, &raw)?;
    state.ledger.clear_draft(&farmer.id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn submit_batch(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    ValidatedJson(req): ValidatedJson<BatchRequest>,
) -> Result<(StatusCode, Json<Submission>), AppError> {
    let id = farmer_id(&raw)?;
    match state.ledger.submit_batch(&req.batch, &req.claims, &id) {
        Ok(submission) => {
            metrics::record_submission();
            Ok((StatusCode::CREATED, Json(submission)))
        }
        Err(e) => {
            metrics::record_submission_failure(failure_reason(&e));
            Err(e.into())
        }
    }
}

fn failure_reason(err: &SubmissionError) -> &'static str {
    match err {
        SubmissionError::InvalidDraft(_) => "invalid_draft",
        SubmissionError::UnknownFarmer(_) => "unknown_farmer",
        SubmissionError::Serialization(_) => "serialization",
        SubmissionError::Credential(_) => "credential",
        SubmissionError::Log(_) => "log",
        SubmissionError::Index(_) => "index",
        SubmissionError::Store(_) => "store",
    }
}
