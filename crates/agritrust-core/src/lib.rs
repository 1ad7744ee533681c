//! # agritrust-core — Foundational Types for the Provenance Ledger
//!
//! The leaf of the workspace dependency graph. Every other `agritrust-*`
//! crate builds on the primitives defined here.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** All digest computation flows through
//!    `CanonicalBytes::new()`. Two payloads that differ only in object key
//!    order canonicalize to the same bytes and therefore the same digest.
//!
//! 2. **`ContentDigest` is hex on the wire.** A batch CID and a credential
//!    digest are both 64-char lowercase hex strings when serialized.
//!
//! 3. **Newtype identifiers.** `FarmerId`, `BatchId`, `ClaimId` and `Did`
//!    cannot be confused with each other or with bare strings.
//!
//! 4. **UTC-only timestamps.** `Timestamp` is truncated to seconds and
//!    always renders with a `Z` suffix, so it canonicalizes deterministically.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `agritrust-*` crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::{compute_digest, sha256_digest, ContentDigest};
pub use error::{AgriTrustError, CanonicalizationError};
pub use identity::{BatchId, ClaimId, Did, FarmerId};
pub use temporal::Timestamp;
