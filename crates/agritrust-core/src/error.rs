//! # Error Types
//!
//! Structured errors shared by the foundational types. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Top-level error type for the foundational crate.
#[derive(Error, Debug)]
pub enum AgriTrustError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A value failed format validation (identifier, timestamp, digest).
    #[error("validation error: {0}")]
    Validation(String),
}

/// Error during canonical serialization.
///
/// This is the `SerializationError` of the digest engine: the payload could
/// not be turned into canonical bytes and therefore has no digest.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Quantities and prices must be integers or strings.
    #[error("float values are not permitted in canonical representations; use string or integer: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
