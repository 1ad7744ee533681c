//! # Identifier Newtypes
//!
//! Farmers, batches and claims each get their own identifier type, so a
//! `BatchId` cannot be passed where a `FarmerId` is expected. Records refer
//! to each other only through these identifiers; no record holds a live
//! reference to another.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AgriTrustError;

/// DID method used for every identity string the ledger mints.
pub const DID_METHOD: &str = "did:agritrust";

/// Identifier of a registered farmer, e.g. `20230115-greenacres-1234`.
///
/// Farmer identifiers are assigned by the registration workflow, so they are
/// free-form strings. They must be non-empty and contain no whitespace or
/// `:`, since they are embedded verbatim in the issuer DID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FarmerId(String);

impl FarmerId {
    /// Validate and wrap a farmer identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, AgriTrustError> {
        let id = id.into();
        if id.is_empty() {
            return Err(AgriTrustError::Validation(
                "farmer id must not be empty".to_string(),
            ));
        }
        if id.chars().any(|c| c.is_whitespace() || c == ':') {
            return Err(AgriTrustError::Validation(format!(
                "farmer id must not contain whitespace or ':': {id:?}"
            )));
        }
        Ok(Self(id))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FarmerId {
    type Error = AgriTrustError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FarmerId> for String {
    fn from(id: FarmerId) -> Self {
        id.0
    }
}

impl std::fmt::Display for FarmerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a produce batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(pub Uuid);

impl BatchId {
    /// Generate a new random batch identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a batch identifier from its hyphenated UUID form.
    pub fn parse(s: &str) -> Result<Self, AgriTrustError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| AgriTrustError::Validation(format!("invalid batch id {s:?}: {e}")))
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a provenance claim attached to a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(pub Uuid);

impl ClaimId {
    /// Generate a new random claim identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClaimId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClaimId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A decentralized-identifier-shaped string.
///
/// The ledger does not resolve DIDs; they are stable, derivable names.
/// `did:agritrust:farmer:{farmerId}` identifies an issuer and
/// `did:agritrust:batch:{batchId}` identifies a credential subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Did(String);

impl Did {
    /// Issuer identity derived from a farmer identifier.
    pub fn farmer(id: &FarmerId) -> Self {
        Self(format!("{DID_METHOD}:farmer:{id}"))
    }

    /// Subject identity derived from a batch identifier.
    pub fn batch(id: &BatchId) -> Self {
        Self(format!("{DID_METHOD}:batch:{id}"))
    }

    /// Accept any string starting with `did:`.
    pub fn parse(s: &str) -> Result<Self, AgriTrustError> {
        if !s.starts_with("did:") || s.len() <= 4 {
            return Err(AgriTrustError::Validation(format!(
                "DID must start with 'did:': {s:?}"
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// The DID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Did {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
