//! # agritrust-vc — Provenance Credentials
//!
//! Implements the credential half of the ledger:
//!
//! - **Envelope** ([`Credential`]) following the W3C VC data model, with a
//!   fixed subject `{id, cid, batchId, farmerId}` and a single proof.
//! - **Issuance** ([`CredentialIssuer`]) over an injected
//!   [`ProofSigner`](agritrust_crypto::ProofSigner).
//! - **Verification** ([`CredentialVerifier`]) over an injected
//!   [`ProofVerifier`](agritrust_crypto::ProofVerifier). Fails closed.
//!
//! ## Security Invariants
//!
//! - The signing input is built through
//!   [`CanonicalBytes`](agritrust_core::CanonicalBytes), never raw
//!   `serde_json::to_vec()`.
//! - The envelope rejects unknown fields, top level and proof alike.
//! - With the keyed-hash scheme, anyone holding the ledger secret can mint a
//!   valid proof. A proof attests "made by a holder of the secret", not "made
//!   by this farmer".

pub mod credential;
pub mod issuer;
pub mod proof;
pub mod verifier;

pub use credential::{
    signing_input, Credential, CredentialSubject, VcError, CREDENTIALS_V1_CONTEXT,
    PROVENANCE_CREDENTIAL_TYPE, VERIFIABLE_CREDENTIAL_TYPE,
};
pub use issuer::{CredentialIssuer, IssuedCredential, KEY_FRAGMENT};
pub use proof::{Proof, ProofPurpose, ProofType};
pub use verifier::CredentialVerifier;
