//! # Cryptographic Error Types

use thiserror::Error;

/// Errors from proof signing and verification.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The signature did not match the message.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(String),

    /// The proof secret is unusable.
    #[error("invalid proof secret: {0}")]
    InvalidSecret(String),

    /// A verifier was handed a proof made by a different scheme.
    #[error("scheme mismatch: expected {expected}, got {actual}")]
    SchemeMismatch {
        /// The scheme this verifier implements.
        expected: String,
        /// The scheme named by the proof.
        actual: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_mismatch_display_names_both_sides() {
        let err = CryptoError::SchemeMismatch {
            expected: "KeyedSha256Signature2024".to_string(),
            actual: "Ed25519Signature2020".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("KeyedSha256Signature2024"));
        assert!(msg.contains("Ed25519Signature2020"));
    }
}
