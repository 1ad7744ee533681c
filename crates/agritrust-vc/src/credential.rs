//! # Provenance Credential
//!
//! A [`Credential`] binds a batch's content digest to the farmer who
//! submitted it. The envelope follows the W3C VC data model:
//!
//! ```json
//! {
//!   "@context": ["https://www.w3.org/2018/credentials/v1"],
//!   "type": ["VerifiableCredential", "AgriculturalProvenanceCredential"],
//!   "id": "urn:agritrust:vc:{batchId}",
//!   "issuer": "did:agritrust:farmer:{farmerId}",
//!   "issuanceDate": "...Z",
//!   "credentialSubject": { "id", "cid", "batchId", "farmerId" },
//!   "proof": { "type", "created", "verificationMethod", "proofPurpose", "signatureValue" }
//! }
//! ```
//!
//! ## Signing input
//!
//! The proof covers only `{batchId, cid, created, issuer}`, canonicalized.
//! Every other field is derivable from those four, so a credential can be
//! rebuilt from `{cid, farmerId, batchId}` plus the issuance time.
//!
//! ## Credential digest
//!
//! The vcDigest is [`compute_digest`] over the whole credential, proof
//! included. It keys the credential in the transparency log and the
//! credential store.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use agritrust_core::{
    compute_digest, BatchId, CanonicalBytes, ContentDigest, Did, FarmerId, Timestamp,
};
use agritrust_crypto::CryptoError;

use crate::proof::Proof;

/// JSON-LD context for W3C credentials v1.
pub const CREDENTIALS_V1_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// Base type every credential carries.
pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";

/// The ledger's credential type.
pub const PROVENANCE_CREDENTIAL_TYPE: &str = "AgriculturalProvenanceCredential";

/// Errors from credential issuance and verification.
#[derive(Error, Debug)]
pub enum VcError {
    /// The signing input or credential body could not be canonicalized.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] agritrust_core::CanonicalizationError),

    /// Signing or signature checking failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The proof names a scheme this verifier does not implement.
    #[error("unsupported proof type: {0}")]
    UnsupportedProofType(String),

    /// The credential envelope is malformed.
    #[error("malformed credential: {0}")]
    Malformed(String),

    /// JSON conversion error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The batch the credential speaks about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CredentialSubject {
    /// `did:agritrust:batch:{batchId}`.
    pub id: Did,
    /// Content digest of the batch-plus-claims payload.
    pub cid: ContentDigest,
    /// The batch identifier.
    pub batch_id: BatchId,
    /// The submitting farmer.
    pub farmer_id: FarmerId,
}

/// A provenance credential.
///
/// Created once by [`crate::CredentialIssuer`] and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credential {
    /// JSON-LD contexts.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// Credential type list.
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,

    /// `urn:agritrust:vc:{batchId}`.
    pub id: String,

    /// Issuer DID, `did:agritrust:farmer:{farmerId}`.
    pub issuer: Did,

    /// Issuance time. Equal to `proof.created`.
    #[serde(rename = "issuanceDate")]
    pub issuance_date: Timestamp,

    /// The subject block.
    #[serde(rename = "credentialSubject")]
    pub credential_subject: CredentialSubject,

    /// The proof over the signing input.
    pub proof: Proof,
}

impl Credential {
    /// Credential identifier for a batch.
    pub fn id_for(batch_id: &BatchId) -> String {
        format!("urn:agritrust:vc:{batch_id}")
    }

    /// Whether the type list names this ledger's credential type.
    pub fn is_provenance_credential(&self) -> bool {
        self.credential_type
            .iter()
            .any(|t| t == VERIFIABLE_CREDENTIAL_TYPE)
            && self
                .credential_type
                .iter()
                .any(|t| t == PROVENANCE_CREDENTIAL_TYPE)
    }

    /// The canonical bytes the proof was computed over.
    pub fn signing_input(&self) -> Result<CanonicalBytes, VcError> {
        signing_input(
            &self.credential_subject.batch_id,
            &self.credential_subject.cid,
            &self.proof.created,
            &self.issuer,
        )
    }

    /// Recompute the vcDigest.
    pub fn digest(&self) -> Result<ContentDigest, VcError> {
        Ok(compute_digest(self)?)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SigningPayload<'a> {
    batch_id: &'a BatchId,
    cid: &'a ContentDigest,
    created: &'a Timestamp,
    issuer: &'a Did,
}

/// Canonical signing input `{batchId, cid, created, issuer}`.
pub fn signing_input(
    batch_id: &BatchId,
    cid: &ContentDigest,
    created: &Timestamp,
    issuer: &Did,
) -> Result<CanonicalBytes, VcError> {
    Ok(CanonicalBytes::new(&SigningPayload {
        batch_id,
        cid,
        created,
        issuer,
    })?)
}
