//! # Transparency Log
//!
//! Routes:
//! - GET /v1/log — all entries with the current head
//! - GET /v1/log/audit — chain audit of the live log
//! - GET /v1/log/{vc_digest}/consistency?cid= — is the digest logged under `cid`

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use agritrust_core::ContentDigest;
use agritrust_log::{ChainAudit, ConsistencyCheck, LogEntry, TransparencyLog};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LogView {
    pub length: usize,
    pub head: Option<LogEntry>,
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ConsistencyQuery {
    pub cid: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/log", get(list))
        .route("/v1/log/audit", get(audit))
        .route("/v1/log/{vc_digest}/consistency", get(consistency))
}

async fn list(State(state): State<AppState>) -> Json<LogView> {
    let log = state.ledger.log();
    let entries = log.entries();
    Json(LogView {
        length: entries.len(),
        head: entries.last().cloned(),
        entries,
    })
}

async fn audit(State(state): State<AppState>) -> Json<ChainAudit> {
    let report = state.ledger.log().audit();
    if !report.ok {
        tracing::warn!(faults = report.faults.len(), "transparency log audit failed");
    }
    Json(report)
}

async fn consistency(
    State(state): State<AppState>,
    Path(vc_digest): Path<String>,
    Query(query): Query<ConsistencyQuery>,
) -> Result<Json<ConsistencyCheck>, AppError> {
    let vc_digest = ContentDigest::from_hex(&vc_digest)?;
    let cid = ContentDigest::from_hex(&query.cid)?;
    Ok(Json(state.ledger.log().check_consistency(&vc_digest, &cid)))
}
