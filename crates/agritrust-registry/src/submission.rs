//! # Submission Orchestrator
//!
//! Turns a farmer's draft into a committed, publicly checkable batch:
//!
//! ```text
//! reserve code -> finalize batch -> attach claims -> cid = digest({batch, claims})
//!   -> issue credential -> log.append(vcDigest, cid)
//!   -> persist batch, claims, credential -> index.put(code) -> clear draft
//! ```
//!
//! ## Visibility
//!
//! The index bind is the commit point. Until it succeeds the code is only
//! reserved, so a consumer lookup sees nothing. Any failure before it
//! releases the reservation and returns the error.
//!
//! Two effects survive an abort: the log entry (the log is append-only and
//! has no undo) and any records already persisted, which are unreachable
//! without a bound code. Clearing the draft happens after the commit point;
//! if it fails the submission still stands and a warning is logged.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use serde::Serialize;

use agritrust_core::{compute_digest, BatchId, ContentDigest, FarmerId, Timestamp};
use agritrust_log::TransparencyLog;
use agritrust_vc::CredentialIssuer;

use crate::code::{CodeGenerator, ConsumerCode};
use crate::error::SubmissionError;
use crate::index::{IndexEntry, LookupIndex};
use crate::model::{Batch, BatchDraft, BatchPayload, Claim, ClaimDraft, Farmer};
use crate::store::Stores;

/// Default bound on code generation attempts.
pub const DEFAULT_CODE_ATTEMPTS: u32 = 16;

/// A committed submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub consumer_code: ConsumerCode,
    pub batch: Batch,
    pub claims: Vec<Claim>,
    pub vc_digest: ContentDigest,
    pub log_index: u64,
}

/// Drives one submission through every step, in order.
pub struct SubmissionOrchestrator {
    stores: Stores,
    index: Arc<dyn LookupIndex>,
    log: Arc<dyn TransparencyLog>,
    issuer: CredentialIssuer,
    codes: Mutex<CodeGenerator<StdRng>>,
    max_code_attempts: u32,
}

impl SubmissionOrchestrator {
    pub fn new(
        stores: Stores,
        index: Arc<dyn LookupIndex>,
        log: Arc<dyn TransparencyLog>,
        issuer: CredentialIssuer,
        codes: CodeGenerator<StdRng>,
        max_code_attempts: u32,
    ) -> Self {
        Self {
            stores,
            index,
            log,
            issuer,
            codes: Mutex::new(codes),
            max_code_attempts,
        }
    }

    /// Submit at the current time.
    pub fn submit_batch(
        &self,
        draft: &BatchDraft,
        claims: &[ClaimDraft],
        farmer_id: &FarmerId,
    ) -> Result<Submission, SubmissionError> {
        self.submit_batch_at(draft, claims, farmer_id, Timestamp::now())
    }

    /// Submit as of `now`. The code date, default harvest date and the
    /// credential timestamp all come from `now`.
    pub fn submit_batch_at(
        &self,
        draft: &BatchDraft,
        claims: &[ClaimDraft],
        farmer_id: &FarmerId,
        now: Timestamp,
    ) -> Result<Submission, SubmissionError> {
        let farmer = self
            .stores
            .farmers
            .get_by_id(farmer_id)?
            .ok_or_else(|| SubmissionError::UnknownFarmer(farmer_id.clone()))?;
        let batch = Batch::finalize(draft, BatchId::new(), &farmer, now)
            .map_err(|e| SubmissionError::InvalidDraft(e.to_string()))?;

        let code = self.reserve_code(now)?;

        match self.commit(&code, batch, claims, &farmer, now) {
            Ok(submission) => {
                if let Err(e) = self.stores.drafts.clear(farmer_id) {
                    tracing::warn!(
                        farmer_id = %farmer_id,
                        code = %code,
                        error = %e,
                        "submission committed but draft was not cleared"
                    );
                }
                tracing::info!(
                    code = %code,
                    batch_id = %submission.batch.id,
                    vc_digest = %submission.vc_digest,
                    log_index = submission.log_index,
                    claims = submission.claims.len(),
                    "batch submitted"
                );
                Ok(submission)
            }
            Err(e) => {
                self.index.release(&code);
                tracing::warn!(code = %code, farmer_id = %farmer_id, error = %e, "submission aborted");
                Err(e)
            }
        }
    }

    fn reserve_code(&self, now: Timestamp) -> Result<ConsumerCode, SubmissionError> {
        let date = now.date();
        let mut codes = self.codes.lock();
        let mut generate = || codes.generate(date);
        Ok(self
            .index
            .reserve_unique(&mut generate, self.max_code_attempts)?)
    }

    fn commit(
        &self,
        code: &ConsumerCode,
        mut batch: Batch,
        claim_drafts: &[ClaimDraft],
        farmer: &Farmer,
        now: Timestamp,
    ) -> Result<Submission, SubmissionError> {
        let claims: Vec<Claim> = claim_drafts
            .iter()
            .map(|d| Claim::attach(d, batch.id))
            .collect();

        let cid = compute_digest(&BatchPayload {
            batch: &batch,
            claims: &claims,
        })?;

        let issued = self
            .issuer
            .issue_credential_at(cid, &farmer.id, batch.id, now)?;
        let vc_digest = issued.vc_digest;

        let log_index = self.log.append(vc_digest, cid)?;

        batch.cid = Some(cid);
        batch.vc_digest = Some(vc_digest);
        self.stores.batches.add(batch.clone())?;
        for claim in &claims {
            self.stores.claims.add(claim.clone())?;
        }
        self.stores.credentials.put(vc_digest, issued.credential)?;

        self.index.put(
            code,
            IndexEntry {
                cid,
                vc_digest,
                batch_id: batch.id,
            },
        )?;

        Ok(Submission {
            consumer_code: code.clone(),
            batch,
            claims,
            vc_digest,
            log_index,
        })
    }
}

impl std::fmt::Debug for SubmissionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionOrchestrator")
            .field("max_code_attempts", &self.max_code_attempts)
            .finish_non_exhaustive()
    }
}
