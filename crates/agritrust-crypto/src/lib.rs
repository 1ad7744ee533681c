//! # agritrust-crypto — Proof Primitives
//!
//! Provides the capability pair every credential proof goes through:
//!
//! - [`ProofSigner`] produces a signature over [`CanonicalBytes`](agritrust_core::CanonicalBytes).
//! - [`ProofVerifier`] checks a signature against the same bytes.
//!
//! The shipped implementation is [`KeyedHashScheme`], an HMAC-SHA256 keyed
//! by one static secret shared by issuer and verifier. It keeps the shape of
//! credential issuance (a verifier recomputes and compares) without key
//! management. Anyone holding the secret can mint a valid proof, so it is
//! not non-repudiable. An asymmetric scheme plugs in behind the same two
//! traits without touching callers.
//!
//! ## Crate Policy
//!
//! - Depends only on `agritrust-core` internally.
//! - Signing input is always `&CanonicalBytes`, never raw `&[u8]`.
//! - Secrets never appear in `Debug` output.

pub mod error;
pub mod keyed;
pub mod scheme;

pub use error::CryptoError;
pub use keyed::{KeyedHashScheme, ProofSecret};
pub use scheme::{ProofSignature, ProofSigner, ProofVerifier, SignatureScheme};
