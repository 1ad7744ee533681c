//! # Consumer Trail
//!
//! What a consumer sees after typing a code. The trail reports three
//! independent signals rather than a single pass/fail:
//!
//! | Signal      | Question                                                   |
//! |-------------|------------------------------------------------------------|
//! | `signature` | Does the stored credential's proof verify?                 |
//! | `log`       | Is the vcDigest logged, bound to the indexed CID?          |
//! | `content`   | Do the stored batch and claims still hash to that CID?     |
//!
//! An unknown code is a normal outcome, not an error. Only store faults
//! make a lookup fail.

use std::sync::Arc;

use serde::Serialize;

use agritrust_core::{compute_digest, ContentDigest};
use agritrust_log::{ConsistencyCheck, LogEntry, TransparencyLog};
use agritrust_vc::{Credential, CredentialVerifier};

use crate::code::ConsumerCode;
use crate::error::StoreError;
use crate::index::LookupIndex;
use crate::model::{Batch, BatchPayload, Claim};
use crate::store::Stores;

/// Proof check outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureStatus {
    Valid,
    Invalid,
    /// No credential stored under the indexed vcDigest.
    MissingCredential,
}

/// Log membership outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Consistent,
    /// Logged, but under a different CID.
    Inconsistent,
    Absent,
}

impl From<ConsistencyCheck> for LogStatus {
    fn from(check: ConsistencyCheck) -> Self {
        match (check.exists, check.consistent) {
            (true, true) => LogStatus::Consistent,
            (true, false) => LogStatus::Inconsistent,
            (false, _) => LogStatus::Absent,
        }
    }
}

/// Stored-content outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Intact,
    Altered,
    /// The batch record is missing or cannot be hashed.
    Unavailable,
}

/// Summary over the three signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Verified,
    Unverified,
}

/// A resolved code with its evidence and signals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trail {
    pub code: ConsumerCode,
    pub cid: ContentDigest,
    pub vc_digest: ContentDigest,
    pub batch: Option<Batch>,
    pub claims: Vec<Claim>,
    pub credential: Option<Credential>,
    pub log_entry: Option<LogEntry>,
    pub signature: SignatureStatus,
    pub log: LogStatus,
    pub content: ContentStatus,
    pub verdict: Verdict,
}

/// Result of a trail lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrailReport {
    UnknownCode { code: String },
    Found(Box<Trail>),
}

impl TrailReport {
    pub fn is_unknown(&self) -> bool {
        matches!(self, TrailReport::UnknownCode { .. })
    }

    pub fn trail(&self) -> Option<&Trail> {
        match self {
            TrailReport::Found(trail) => Some(trail),
            TrailReport::UnknownCode { .. } => None,
        }
    }
}

/// Resolves consumer codes into trails.
#[derive(Clone)]
pub struct TrailService {
    stores: Stores,
    index: Arc<dyn LookupIndex>,
    log: Arc<dyn TransparencyLog>,
    verifier: CredentialVerifier,
}

impl TrailService {
    pub fn new(
        stores: Stores,
        index: Arc<dyn LookupIndex>,
        log: Arc<dyn TransparencyLog>,
        verifier: CredentialVerifier,
    ) -> Self {
        Self {
            stores,
            index,
            log,
            verifier,
        }
    }

    /// Look up a code. Malformed codes are reported as unknown.
    pub fn lookup(&self, code: &str) -> Result<TrailReport, StoreError> {
        let unknown = || TrailReport::UnknownCode {
            code: code.to_string(),
        };
        let Ok(parsed) = ConsumerCode::parse(code.trim()) else {
            return Ok(unknown());
        };
        let Some(entry) = self.index.get(&parsed) else {
            tracing::debug!(code = %parsed, "trail lookup for unknown code");
            return Ok(unknown());
        };

        let credential = self.stores.credentials.get(&entry.vc_digest)?;
        let signature = match &credential {
            None => SignatureStatus::MissingCredential,
            Some(vc) if self.credential_matches(vc, &entry.vc_digest, &entry.cid) => {
                SignatureStatus::Valid
            }
            Some(_) => SignatureStatus::Invalid,
        };

        let log_entry = self.log.exists(&entry.vc_digest);
        let log = LogStatus::from(ConsistencyCheck::of(log_entry.as_ref(), &entry.cid));

        let batch = self.stores.batches.get_by_id(&entry.batch_id)?;
        let claims = self.stores.claims.get_by_batch_id(&entry.batch_id)?;
        let content = match &batch {
            None => ContentStatus::Unavailable,
            Some(b) => match recompute_cid(b, &claims) {
                Some(cid) if cid == entry.cid => ContentStatus::Intact,
                Some(_) => ContentStatus::Altered,
                None => ContentStatus::Unavailable,
            },
        };

        let verdict = if signature == SignatureStatus::Valid
            && log == LogStatus::Consistent
            && content == ContentStatus::Intact
        {
            Verdict::Verified
        } else {
            Verdict::Unverified
        };

        tracing::info!(
            code = %parsed,
            batch_id = %entry.batch_id,
            ?signature,
            ?log,
            ?content,
            ?verdict,
            "trail lookup"
        );

        Ok(TrailReport::Found(Box::new(Trail {
            code: parsed,
            cid: entry.cid,
            vc_digest: entry.vc_digest,
            batch,
            claims,
            credential,
            log_entry,
            signature,
            log,
            content,
            verdict,
        })))
    }

    // The proof must verify, the credential must still hash to the digest it
    // is filed under, and it must speak about the indexed CID.
    fn credential_matches(
        &self,
        vc: &Credential,
        vc_digest: &ContentDigest,
        cid: &ContentDigest,
    ) -> bool {
        self.verifier.verify(vc)
            && vc.digest().ok().as_ref() == Some(vc_digest)
            && vc.credential_subject.cid == *cid
    }
}

impl std::fmt::Debug for TrailService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrailService")
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}

fn recompute_cid(batch: &Batch, claims: &[Claim]) -> Option<ContentDigest> {
    compute_digest(&BatchPayload {
        batch: &batch.without_digests(),
        claims,
    })
    .ok()
}
