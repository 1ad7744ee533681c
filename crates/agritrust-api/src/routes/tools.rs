//! # Stateless Tools
//!
//! Routes:
//! - POST /v1/digest — content digest of an arbitrary JSON document
//! - POST /v1/credentials/verify — proof check of a credential document
//!
//! Neither touches the ledger's stores.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;

use agritrust_core::{compute_digest, ContentDigest};

use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DigestResponse {
    pub cid: ContentDigest,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/digest", post(digest))
        .route("/v1/credentials/verify", post(verify))
}

async fn digest(ValidatedJson(payload): ValidatedJson<Value>) -> Result<Json<DigestResponse>, AppError> {
    Ok(Json(DigestResponse {
        cid: compute_digest(&payload)?,
    }))
}

// Malformed credentials are answered with `valid: false`, never an error.
async fn verify(
    State(state): State<AppState>,
    ValidatedJson(credential): ValidatedJson<Value>,
) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        valid: state.ledger.verify_credential_value(&credential),
    })
}
