//! # Domain Records
//!
//! Farmers, batches, claims and the consumer-side records. Records refer to
//! each other only by identifier. Numeric attributes are integers because
//! the batch payload is canonicalized and floats have no canonical form:
//! quantities are whole units and prices are minor currency units.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agritrust_core::{AgriTrustError, BatchId, ClaimId, ContentDigest, FarmerId, Timestamp};

use crate::code::ConsumerCode;

/// Default unit for a batch quantity.
pub const DEFAULT_UNIT: &str = "kg";

/// A registered farmer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Farmer {
    pub id: FarmerId,
    pub name: String,
    pub farm_name: String,
    pub location: String,
    pub registered_at: Timestamp,
}

/// Input to farmer registration. `id` is generated when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerRegistration {
    #[serde(default)]
    pub id: Option<FarmerId>,
    pub name: String,
    pub farm_name: String,
    pub location: String,
}

/// Registration-style farmer id: `{YYYYMMDD}-{farm slug}-{NNNN}`.
///
/// The slug keeps only ASCII alphanumerics of the farm name, lowercased.
pub fn farmer_id_for(date: NaiveDate, farm_name: &str, suffix: u16) -> Result<FarmerId, AgriTrustError> {
    let slug: String = farm_name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let slug = if slug.is_empty() { "farm".to_string() } else { slug };
    FarmerId::new(format!("{}-{slug}-{:04}", date.format("%Y%m%d"), suffix % 10_000))
}

/// What the farmer typed before submitting. Only `product_name` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchDraft {
    pub product_name: String,
    pub variety: Option<String>,
    pub quantity: Option<u64>,
    pub unit: Option<String>,
    pub harvest_date: Option<NaiveDate>,
    pub origin: Option<String>,
    pub price_minor: Option<u64>,
    pub notes: Option<String>,
}

/// A finalized batch.
///
/// `cid` and `vc_digest` are absent while the content digest is computed
/// and are written back afterwards. They are skipped when `None`, so the
/// stored batch with both cleared reproduces the hashed payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: BatchId,
    pub farmer_id: FarmerId,
    pub farmer_name: String,
    pub product_name: String,
    pub variety: String,
    pub quantity: u64,
    pub unit: String,
    pub harvest_date: NaiveDate,
    pub origin: String,
    pub price_minor: u64,
    pub notes: String,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<ContentDigest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vc_digest: Option<ContentDigest>,
}

impl Batch {
    /// Finalize a draft, filling every missing attribute with its default.
    pub fn finalize(
        draft: &BatchDraft,
        id: BatchId,
        farmer: &Farmer,
        now: Timestamp,
    ) -> Result<Self, AgriTrustError> {
        let product_name = draft.product_name.trim();
        if product_name.is_empty() {
            return Err(AgriTrustError::Validation(
                "product name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id,
            farmer_id: farmer.id.clone(),
            farmer_name: farmer.name.clone(),
            product_name: product_name.to_string(),
            variety: draft.variety.clone().unwrap_or_default(),
            quantity: draft.quantity.unwrap_or(0),
            unit: draft
                .unit
                .clone()
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            harvest_date: draft.harvest_date.unwrap_or_else(|| now.date()),
            origin: draft
                .origin
                .clone()
                .filter(|o| !o.trim().is_empty())
                .unwrap_or_else(|| farmer.location.clone()),
            price_minor: draft.price_minor.unwrap_or(0),
            notes: draft.notes.clone().unwrap_or_default(),
            created_at: now,
            cid: None,
            vc_digest: None,
        })
    }

    /// The batch as it was when its CID was computed.
    pub fn without_digests(&self) -> Self {
        Self {
            cid: None,
            vc_digest: None,
            ..self.clone()
        }
    }
}

/// Kind of provenance claim.
///
/// Serialized as a kebab-case string; custom labels use `other:{label}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ClaimType {
    Organic,
    FairTrade,
    PesticideFree,
    LocallyGrown,
    NonGmo,
    Other(String),
}

impl std::fmt::Display for ClaimType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimType::Organic => f.write_str("organic"),
            ClaimType::FairTrade => f.write_str("fair-trade"),
            ClaimType::PesticideFree => f.write_str("pesticide-free"),
            ClaimType::LocallyGrown => f.write_str("locally-grown"),
            ClaimType::NonGmo => f.write_str("non-gmo"),
            ClaimType::Other(label) => write!(f, "other:{label}"),
        }
    }
}

impl FromStr for ClaimType {
    type Err = AgriTrustError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "organic" => ClaimType::Organic,
            "fair-trade" => ClaimType::FairTrade,
            "pesticide-free" => ClaimType::PesticideFree,
            "locally-grown" => ClaimType::LocallyGrown,
            "non-gmo" => ClaimType::NonGmo,
            other => match other.strip_prefix("other:") {
                Some(label) if !label.trim().is_empty() => ClaimType::Other(label.to_string()),
                _ => {
                    return Err(AgriTrustError::Validation(format!(
                        "unknown claim type {other:?}"
                    )))
                }
            },
        })
    }
}

impl TryFrom<String> for ClaimType {
    type Error = AgriTrustError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClaimType> for String {
    fn from(value: ClaimType) -> Self {
        value.to_string()
    }
}

/// Kind of supporting evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvidenceKind {
    Certificate,
    Photo,
    Document,
    Link,
}

/// A reference to supporting evidence (a certificate number, file name, URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    pub kind: EvidenceKind,
    pub reference: String,
}

/// A claim as drafted, not yet attached to a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDraft {
    pub claim_type: ClaimType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

/// A claim attached to a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: ClaimId,
    pub batch_id: BatchId,
    pub claim_type: ClaimType,
    pub description: String,
    pub evidence: Vec<Evidence>,
}

impl Claim {
    /// Attach a drafted claim to a batch.
    pub fn attach(draft: &ClaimDraft, batch_id: BatchId) -> Self {
        Self {
            id: ClaimId::new(),
            batch_id,
            claim_type: draft.claim_type.clone(),
            description: draft.description.clone(),
            evidence: draft.evidence.clone(),
        }
    }
}

/// The payload whose digest is the batch CID.
#[derive(Debug, Serialize)]
pub struct BatchPayload<'a> {
    pub batch: &'a Batch,
    pub claims: &'a [Claim],
}

/// A farmer's saved, unsubmitted work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub batch: BatchDraft,
    #[serde(default)]
    pub claims: Vec<ClaimDraft>,
    pub saved_at: Timestamp,
}

/// A problem reported by a consumer against a code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerIssue {
    pub id: Uuid,
    pub code: ConsumerCode,
    pub description: String,
    pub contact: Option<String>,
    pub reported_at: Timestamp,
}

/// A consumer rating for a code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: Uuid,
    pub code: ConsumerCode,
    pub rating: u8,
    pub comment: String,
    pub submitted_at: Timestamp,
}
