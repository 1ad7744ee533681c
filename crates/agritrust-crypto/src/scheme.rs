//! # Signer / Verifier Capabilities
//!
//! The issuer holds a [`ProofSigner`], the verifier holds a
//! [`ProofVerifier`]. Neither knows which scheme sits behind the trait.

use agritrust_core::digest::{decode_hex, encode_hex};
use agritrust_core::CanonicalBytes;

use crate::error::CryptoError;

/// Proof schemes the ledger knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    /// HMAC-SHA256 under a shared static secret.
    KeyedSha256,
}

impl SignatureScheme {
    /// The proof `type` string written into credentials.
    pub fn proof_type(&self) -> &'static str {
        match self {
            Self::KeyedSha256 => "KeyedSha256Signature2024",
        }
    }

    /// Look a scheme up by its proof `type` string.
    pub fn from_proof_type(s: &str) -> Option<Self> {
        match s {
            "KeyedSha256Signature2024" => Some(Self::KeyedSha256),
            _ => None,
        }
    }
}

impl std::fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.proof_type())
    }
}

/// Raw signature bytes, hex on the wire.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ProofSignature(Vec<u8>);

impl ProofSignature {
    /// Wrap raw signature bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Render as lowercase hex.
    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }

    /// Parse from hex.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        decode_hex(&hex.trim().to_lowercase())
            .map(Self)
            .map_err(CryptoError::HexDecode)
    }
}

impl std::fmt::Debug for ProofSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.0.iter().take(4).map(|b| format!("{b:02x}")).collect();
        write!(f, "ProofSignature({prefix}...)")
    }
}

/// Produces proofs over canonical bytes.
pub trait ProofSigner: Send + Sync {
    /// The scheme this signer implements.
    fn scheme(&self) -> SignatureScheme;

    /// Sign the canonical message.
    fn sign(&self, message: &CanonicalBytes) -> Result<ProofSignature, CryptoError>;
}

/// Checks proofs over canonical bytes.
pub trait ProofVerifier: Send + Sync {
    /// The scheme this verifier implements.
    fn scheme(&self) -> SignatureScheme;

    /// Verify `signature` over `message`. `Ok(())` only on an exact match.
    fn verify(&self, message: &CanonicalBytes, signature: &ProofSignature)
        -> Result<(), CryptoError>;
}
