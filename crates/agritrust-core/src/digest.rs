//! # Content Digest
//!
//! `ContentDigest` is the ledger's content identifier (CID). It names a
//! batch-plus-claims payload, and the same type names a credential
//! (the vcDigest), so both flow through the same canonicalization path.
//!
//! The digest engine is a SHA-256 over [`CanonicalBytes`]. It stands in for
//! IPFS-style content addressing: the identifier is derived from the bytes,
//! not assigned, and nothing here talks to a network.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::{AgriTrustError, CanonicalizationError};

/// A 32-byte SHA-256 digest, rendered as 64 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw 32 digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as lowercase hex.
    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }

    /// Parse a 64-character hex string. Upper-case input is accepted.
    pub fn from_hex(hex: &str) -> Result<Self, AgriTrustError> {
        let hex = hex.trim();
        if hex.len() != 64 {
            return Err(AgriTrustError::Validation(format!(
                "digest must be 64 hex chars, got {}",
                hex.len()
            )));
        }
        let bytes = decode_hex(hex).map_err(AgriTrustError::Validation)?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContentDigest({})", self.to_hex())
    }
}

impl std::str::FromStr for ContentDigest {
    type Err = AgriTrustError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// SHA-256 over canonical bytes.
///
/// Accepts only `&CanonicalBytes`, so no caller can hash a payload that
/// skipped key sorting.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest(bytes)
}

/// Canonicalize and hash any serializable payload.
///
/// Pure and deterministic: the same payload always yields the same digest,
/// whatever the field order it was built with.
pub fn compute_digest(payload: &impl Serialize) -> Result<ContentDigest, CanonicalizationError> {
    let canonical = CanonicalBytes::new(payload)?;
    Ok(sha256_digest(&canonical))
}

/// Lowercase hex encoding.
pub fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode an even-length hex string.
pub fn decode_hex(hex: &str) -> Result<Vec<u8>, String> {
    if hex.len() % 2 != 0 {
        return Err("hex string must have even length".to_string());
    }
    if !hex.is_ascii() {
        return Err("hex string must be ASCII".to_string());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| format!("invalid hex at position {i}: {e}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn digest_is_deterministic() {
        let payload = json!({"batch": {"productName": "Apples"}, "claims": []});
        assert_eq!(compute_digest(&payload).unwrap(), compute_digest(&payload).unwrap());
    }

    #[test]
    fn single_field_change_changes_digest() {
        let a = compute_digest(&json!({"productName": "Mangoes"})).unwrap();
        let b = compute_digest(&json!({"productName": "Mangos"})).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn key_order_does_not_change_digest() {
        let a: serde_json::Value =
            serde_json::from_str(r#"{"productName":"Pears","quantity":3}"#).unwrap();
        let b: serde_json::Value =
            serde_json::from_str(r#"{"quantity":3,"productName":"Pears"}"#).unwrap();
        assert_eq!(compute_digest(&a).unwrap(), compute_digest(&b).unwrap());
    }

    #[test]
    fn known_vector_for_empty_object() {
        // sha256(b"{}")
        let digest = compute_digest(&json!({})).unwrap();
        assert_eq!(
            digest.to_hex(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn serializes_as_hex_string() {
        let digest = compute_digest(&json!({"a": 1})).unwrap();
        let s = serde_json::to_string(&digest).unwrap();
        assert_eq!(s.len(), 66);
        let back: ContentDigest = serde_json::from_str(&s).unwrap();
        assert_eq!(back, digest);
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(ContentDigest::from_hex("abc").is_err());
        assert!(ContentDigest::from_hex(&"zz".repeat(32)).is_err());
        assert!(ContentDigest::from_hex(&"AB".repeat(32)).is_ok());
    }

    #[test]
    fn float_payload_is_a_serialization_error() {
        assert!(compute_digest(&json!({"weight": 1.25})).is_err());
    }

    #[test]
    fn display_is_plain_hex() {
        let digest = ContentDigest::from_bytes([0xab; 32]);
        assert_eq!(digest.to_string(), "ab".repeat(32));
    }
}
