//! # Keyed-Hash Proof Scheme
//!
//! `signature = HMAC-SHA256(secret, canonical_message)`.
//!
//! Issuer and verifier share the secret, so this proves the proof was made
//! by someone holding it, not by a particular farmer. It is the stand-in
//! for an asymmetric signature and is labelled as such in every credential
//! (`KeyedSha256Signature2024`).

use hmac::{Hmac, Mac};
use sha2::Sha256;

use agritrust_core::CanonicalBytes;

use crate::error::CryptoError;
use crate::scheme::{ProofSignature, ProofSigner, ProofVerifier, SignatureScheme};

type HmacSha256 = Hmac<Sha256>;

/// Minimum secret length in bytes.
pub const MIN_SECRET_LEN: usize = 16;

/// The shared static secret. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ProofSecret(Vec<u8>);

impl ProofSecret {
    /// Wrap secret bytes, enforcing [`MIN_SECRET_LEN`].
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, CryptoError> {
        let bytes = bytes.into();
        if bytes.len() < MIN_SECRET_LEN {
            return Err(CryptoError::InvalidSecret(format!(
                "secret must be at least {MIN_SECRET_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for ProofSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProofSecret(<redacted>)")
    }
}

/// HMAC-SHA256 signer and verifier under one [`ProofSecret`].
#[derive(Debug, Clone)]
pub struct KeyedHashScheme {
    secret: ProofSecret,
}

impl KeyedHashScheme {
    /// Build the scheme from a secret.
    pub fn new(secret: ProofSecret) -> Self {
        Self { secret }
    }

    fn mac(&self) -> Result<HmacSha256, CryptoError> {
        <HmacSha256 as Mac>::new_from_slice(self.secret.as_bytes())
            .map_err(|e| CryptoError::InvalidSecret(e.to_string()))
    }
}

impl ProofSigner for KeyedHashScheme {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::KeyedSha256
    }

    fn sign(&self, message: &CanonicalBytes) -> Result<ProofSignature, CryptoError> {
        let mut mac = self.mac()?;
        mac.update(message.as_bytes());
        Ok(ProofSignature::from_bytes(mac.finalize().into_bytes().to_vec()))
    }
}

impl ProofVerifier for KeyedHashScheme {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::KeyedSha256
    }

    fn verify(
        &self,
        message: &CanonicalBytes,
        signature: &ProofSignature,
    ) -> Result<(), CryptoError> {
        let mut mac = self.mac()?;
        mac.update(message.as_bytes());
        // Constant-time comparison.
        mac.verify_slice(signature.as_bytes())
            .map_err(|_| CryptoError::VerificationFailed("keyed hash mismatch".to_string()))
    }
}
