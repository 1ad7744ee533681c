//! # Registry Error Types
//!
//! One enum per concern. Store faults pass through [`SubmissionError`] and
//! the trail unchanged; the registry never retries them.

use thiserror::Error;

use agritrust_core::{CanonicalizationError, FarmerId};
use agritrust_log::LogError;
use agritrust_vc::VcError;

/// Failure reported by a storage port.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached or failed the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A record with the same key already exists.
    #[error("record already exists: {0}")]
    Conflict(String),
}

/// Lookup index failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// No unused code found within the retry limit.
    #[error("no unique consumer code after {attempts} attempts")]
    CodeGenerationExhausted {
        /// Attempts made.
        attempts: u32,
    },

    /// The code is already bound to different values.
    #[error("consumer code {code} is already bound to a different batch")]
    CodeCollision {
        /// The contested code.
        code: String,
    },

    /// The string is not a well-formed consumer code.
    #[error("invalid consumer code: {0}")]
    InvalidCode(String),
}

/// Why a batch submission was aborted.
#[derive(Error, Debug)]
pub enum SubmissionError {
    /// The batch draft is unusable.
    #[error("invalid draft: {0}")]
    InvalidDraft(String),

    /// No farmer record for the submitting identity.
    #[error("unknown farmer: {0}")]
    UnknownFarmer(FarmerId),

    /// The batch payload could not be canonicalized.
    #[error("serialization error: {0}")]
    Serialization(#[from] CanonicalizationError),

    /// Credential issuance failed.
    #[error("credential issuance failed: {0}")]
    Credential(#[from] VcError),

    /// The transparency log refused the append.
    #[error("transparency log: {0}")]
    Log(#[from] LogError),

    /// Code reservation or binding failed.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// A storage port failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Farmer registration failures.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// A required field is missing or malformed.
    #[error("invalid registration: {0}")]
    Invalid(String),

    /// A storage port failed, including an id already taken.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of consumer-facing writes (issues and feedback).
#[derive(Error, Debug)]
pub enum ConsumerError {
    /// The code is not bound to any batch.
    #[error("unknown consumer code: {0}")]
    UnknownCode(String),

    /// Rating outside 1..=5.
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    /// A required text field is empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// A storage port failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
