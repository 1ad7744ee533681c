//! # Log Error Types

use agritrust_core::ContentDigest;
use thiserror::Error;

/// Errors from transparency log operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// The digest is already logged and the log rejects duplicates.
    #[error("digest {digest} already logged at index {index}")]
    DuplicateDigest {
        /// The rejected digest.
        digest: ContentDigest,
        /// Index of the existing entry.
        index: u64,
    },
}
