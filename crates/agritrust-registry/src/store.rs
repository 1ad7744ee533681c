//! # Storage Ports
//!
//! One trait per persisted collection. The registry only ever talks to
//! these traits; [`MemoryStore`] implements all of them for tests and for
//! single-process deployments.
//!
//! Collections are keyed independently and nothing enforces foreign keys.
//! Readers check referential integrity themselves (a code whose batch is
//! missing is reported, not assumed away).

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use agritrust_core::{BatchId, ContentDigest, FarmerId};
use agritrust_vc::Credential;

use crate::code::ConsumerCode;
use crate::error::StoreError;
use crate::model::{Batch, Claim, ConsumerIssue, Draft, Farmer, Feedback};

pub trait FarmerStore: Send + Sync {
    fn add(&self, farmer: Farmer) -> Result<(), StoreError>;
    fn get_by_id(&self, id: &FarmerId) -> Result<Option<Farmer>, StoreError>;
}

pub trait BatchStore: Send + Sync {
    fn add(&self, batch: Batch) -> Result<(), StoreError>;
    fn get_by_id(&self, id: &BatchId) -> Result<Option<Batch>, StoreError>;
}

pub trait ClaimStore: Send + Sync {
    fn add(&self, claim: Claim) -> Result<(), StoreError>;
    /// Claims for a batch, in the order they were added.
    fn get_by_batch_id(&self, batch_id: &BatchId) -> Result<Vec<Claim>, StoreError>;
}

pub trait DraftStore: Send + Sync {
    fn save(&self, farmer_id: &FarmerId, draft: Draft) -> Result<(), StoreError>;
    fn get(&self, farmer_id: &FarmerId) -> Result<Option<Draft>, StoreError>;
    /// Remove the draft. Returns whether one existed.
    fn clear(&self, farmer_id: &FarmerId) -> Result<bool, StoreError>;
}

pub trait CredentialStore: Send + Sync {
    /// Store a credential under its digest. Idempotent for the same digest.
    fn put(&self, vc_digest: ContentDigest, credential: Credential) -> Result<(), StoreError>;
    fn get(&self, vc_digest: &ContentDigest) -> Result<Option<Credential>, StoreError>;
}

pub trait IssueStore: Send + Sync {
    fn add(&self, issue: ConsumerIssue) -> Result<(), StoreError>;
    fn list_by_code(&self, code: &ConsumerCode) -> Result<Vec<ConsumerIssue>, StoreError>;
}

pub trait FeedbackStore: Send + Sync {
    fn add(&self, feedback: Feedback) -> Result<(), StoreError>;
    fn list_by_code(&self, code: &ConsumerCode) -> Result<Vec<Feedback>, StoreError>;
}

/// The full set of ports the registry needs.
#[derive(Clone)]
pub struct Stores {
    pub farmers: Arc<dyn FarmerStore>,
    pub batches: Arc<dyn BatchStore>,
    pub claims: Arc<dyn ClaimStore>,
    pub drafts: Arc<dyn DraftStore>,
    pub credentials: Arc<dyn CredentialStore>,
    pub issues: Arc<dyn IssueStore>,
    pub feedback: Arc<dyn FeedbackStore>,
}

impl Stores {
    /// Every port backed by one shared [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::new()))
    }

    /// Every port backed by `store`.
    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            farmers: store.clone(),
            batches: store.clone(),
            claims: store.clone(),
            drafts: store.clone(),
            credentials: store.clone(),
            issues: store.clone(),
            feedback: store,
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

/// In-memory implementation of every storage port.
///
/// Locks are `parking_lot` and are never held across an `.await`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    farmers: RwLock<HashMap<FarmerId, Farmer>>,
    batches: RwLock<HashMap<BatchId, Batch>>,
    claims: RwLock<Vec<Claim>>,
    drafts: RwLock<HashMap<FarmerId, Draft>>,
    credentials: RwLock<HashMap<ContentDigest, Credential>>,
    issues: RwLock<Vec<ConsumerIssue>>,
    feedback: RwLock<Vec<Feedback>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Tampering helpers for tests. Stored records are otherwise never mutated.
#[cfg(any(test, feature = "test-util"))]
impl MemoryStore {
    /// Overwrite a stored batch. Used to simulate tampering at rest.
    pub fn replace_batch(&self, batch: Batch) {
        self.batches.write().insert(batch.id, batch);
    }

    /// Overwrite a stored credential. Used to simulate tampering at rest.
    pub fn replace_credential(&self, vc_digest: ContentDigest, credential: Credential) {
        self.credentials.write().insert(vc_digest, credential);
    }

    /// Remove a batch without touching anything that references it.
    pub fn remove_batch(&self, id: &BatchId) -> Option<Batch> {
        self.batches.write().remove(id)
    }

    /// Number of stored batches.
    pub fn batch_count(&self) -> usize {
        self.batches.read().len()
    }
}

impl FarmerStore for MemoryStore {
    fn add(&self, farmer: Farmer) -> Result<(), StoreError> {
        let mut farmers = self.farmers.write();
        if farmers.contains_key(&farmer.id) {
            return Err(StoreError::Conflict(format!("farmer {}", farmer.id)));
        }
        farmers.insert(farmer.id.clone(), farmer);
        Ok(())
    }

    fn get_by_id(&self, id: &FarmerId) -> Result<Option<Farmer>, StoreError> {
        Ok(self.farmers.read().get(id).cloned())
    }
}

impl BatchStore for MemoryStore {
    fn add(&self, batch: Batch) -> Result<(), StoreError> {
        let mut batches = self.batches.write();
        if batches.contains_key(&batch.id) {
            return Err(StoreError::Conflict(format!("batch {}", batch.id)));
        }
        batches.insert(batch.id, batch);
        Ok(())
    }

    fn get_by_id(&self, id: &BatchId) -> Result<Option<Batch>, StoreError> {
        Ok(self.batches.read().get(id).cloned())
    }
}

impl ClaimStore for MemoryStore {
    fn add(&self, claim: Claim) -> Result<(), StoreError> {
        let mut claims = self.claims.write();
        if claims.iter().any(|c| c.id == claim.id) {
            return Err(StoreError::Conflict(format!("claim {}", claim.id)));
        }
        claims.push(claim);
        Ok(())
    }

    fn get_by_batch_id(&self, batch_id: &BatchId) -> Result<Vec<Claim>, StoreError> {
        Ok(self
            .claims
            .read()
            .iter()
            .filter(|c| c.batch_id == *batch_id)
            .cloned()
            .collect())
    }
}

impl DraftStore for MemoryStore {
    fn save(&self, farmer_id: &FarmerId, draft: Draft) -> Result<(), StoreError> {
        self.drafts.write().insert(farmer_id.clone(), draft);
        Ok(())
    }

    fn get(&self, farmer_id: &FarmerId) -> Result<Option<Draft>, StoreError> {
        Ok(self.drafts.read().get(farmer_id).cloned())
    }

    fn clear(&self, farmer_id: &FarmerId) -> Result<bool, StoreError> {
        Ok(self.drafts.write().remove(farmer_id).is_some())
    }
}

impl CredentialStore for MemoryStore {
    fn put(&self, vc_digest: ContentDigest, credential: Credential) -> Result<(), StoreError> {
        let mut credentials = self.credentials.write();
        match credentials.get(&vc_digest) {
            Some(existing) if *existing == credential => Ok(()),
            Some(_) => Err(StoreError::Conflict(format!("credential {vc_digest}"))),
            None => {
                credentials.insert(vc_digest, credential);
                Ok(())
            }
        }
    }

    fn get(&self, vc_digest: &ContentDigest) -> Result<Option<Credential>, StoreError> {
        Ok(self.credentials.read().get(vc_digest).cloned())
    }
}

impl IssueStore for MemoryStore {
    fn add(&self, issue: ConsumerIssue) -> Result<(), StoreError> {
        self.issues.write().push(issue);
        Ok(())
    }

    fn list_by_code(&self, code: &ConsumerCode) -> Result<Vec<ConsumerIssue>, StoreError> {
        Ok(self
            .issues
            .read()
            .iter()
            .filter(|i| i.code == *code)
            .cloned()
            .collect())
    }
}

impl FeedbackStore for MemoryStore {
    fn add(&self, feedback: Feedback) -> Result<(), StoreError> {
        self.feedback.write().push(feedback);
        Ok(())
    }

    fn list_by_code(&self, code: &ConsumerCode) -> Result<Vec<Feedback>, StoreError> {
        Ok(self
            .feedback
            .read()
            .iter()
            .filter(|f| f.code == *code)
            .cloned()
            .collect())
    }
}
