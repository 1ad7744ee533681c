//! # Batches
//!
//! Routes:
//! - GET /v1/batches/{batch_id} — batch with its claims

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use agritrust_core::BatchId;
use agritrust_registry::BatchRecord;

use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/batches/{batch_id}", get(get_batch))
}

async fn get_batch(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<BatchRecord>, AppError> {
    let id = BatchId::parse(&raw)?;
    state
        .ledger
        .batch(&id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("batch {id}")))
}
