//! # Proof Object
//!
//! The `proof` block attached to every provenance credential. Its shape is
//! fixed: unknown fields are rejected at deserialization so nothing can ride
//! along unsigned.

use serde::{Deserialize, Serialize};

use agritrust_core::Timestamp;
use agritrust_crypto::SignatureScheme;

/// The proof scheme named in a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofType {
    /// HMAC-SHA256 under the shared ledger secret.
    KeyedSha256Signature2024,
}

impl ProofType {
    /// The signature scheme that produces and checks this proof type.
    pub fn scheme(&self) -> SignatureScheme {
        match self {
            ProofType::KeyedSha256Signature2024 => SignatureScheme::KeyedSha256,
        }
    }

    /// The proof type written for a given scheme.
    pub fn for_scheme(scheme: SignatureScheme) -> Self {
        match scheme {
            SignatureScheme::KeyedSha256 => ProofType::KeyedSha256Signature2024,
        }
    }
}

impl std::fmt::Display for ProofType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.scheme().proof_type())
    }
}

/// W3C proof purpose vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofPurpose {
    /// The issuer asserts the subject's claims.
    AssertionMethod,
    /// Authentication of the holder.
    Authentication,
}

impl std::fmt::Display for ProofPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofPurpose::AssertionMethod => write!(f, "assertionMethod"),
            ProofPurpose::Authentication => write!(f, "authentication"),
        }
    }
}

/// A proof over the credential's signing input.
///
/// `signature_value` is hex. It covers `{batchId, cid, created, issuer}`,
/// canonicalized; see [`crate::credential::signing_input`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Proof {
    /// The proof scheme.
    #[serde(rename = "type")]
    pub proof_type: ProofType,

    /// When the proof was made. Part of the signing input.
    pub created: Timestamp,

    /// DID URL naming the key, `{issuer}#keys-1`.
    #[serde(rename = "verificationMethod")]
    pub verification_method: String,

    /// Why the proof exists.
    #[serde(rename = "proofPurpose")]
    pub proof_purpose: ProofPurpose,

    /// Hex-encoded signature bytes.
    #[serde(rename = "signatureValue")]
    pub signature_value: String,
}
