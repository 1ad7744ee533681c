//! # Ledger
//!
//! Wires the stores, lookup index, transparency log, issuer and verifier
//! into one handle. The HTTP service holds a single `Ledger` behind an
//! `Arc`; tests build one over [`Stores::in_memory`].

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use agritrust_core::{BatchId, FarmerId, Timestamp};
use agritrust_crypto::{ProofSigner, ProofVerifier};
use agritrust_log::{DuplicatePolicy, HashChainLog};
use agritrust_vc::{CredentialIssuer, CredentialVerifier};

use crate::code::{CodeGenerator, DEFAULT_CODE_PREFIX};
use crate::consumer::ConsumerService;
use crate::error::{ConsumerError, IndexError, RegistrationError, StoreError, SubmissionError};
use crate::index::CodeIndex;
use crate::model::{
    farmer_id_for, Batch, BatchDraft, Claim, ClaimDraft, ConsumerIssue, Draft, Farmer,
    FarmerRegistration, Feedback,
};
use crate::store::Stores;
use crate::submission::{Submission, SubmissionOrchestrator, DEFAULT_CODE_ATTEMPTS};
use crate::trail::{TrailReport, TrailService};

/// Ledger tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Consumer code prefix.
    pub code_prefix: String,
    /// Code generation retry limit.
    pub max_code_attempts: u32,
    /// How the log treats a repeated vcDigest.
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            code_prefix: DEFAULT_CODE_PREFIX.to_string(),
            max_code_attempts: DEFAULT_CODE_ATTEMPTS,
            duplicate_policy: DuplicatePolicy::Reject,
        }
    }
}

/// A batch with its claims.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BatchRecord {
    pub batch: Batch,
    pub claims: Vec<Claim>,
}

pub struct Ledger {
    stores: Stores,
    index: Arc<CodeIndex>,
    log: Arc<HashChainLog>,
    verifier: CredentialVerifier,
    submissions: SubmissionOrchestrator,
    trail: TrailService,
    consumer: ConsumerService,
}

impl Ledger {
    /// Build a ledger with an entropy-seeded code generator.
    pub fn new(
        config: &LedgerConfig,
        stores: Stores,
        signer: Arc<dyn ProofSigner>,
        verifier: Arc<dyn ProofVerifier>,
    ) -> Result<Self, IndexError> {
        Self::with_rng(config, stores, signer, verifier, StdRng::from_entropy())
    }

    /// Build a ledger with a caller-supplied RNG for code generation.
    pub fn with_rng(
        config: &LedgerConfig,
        stores: Stores,
        signer: Arc<dyn ProofSigner>,
        verifier: Arc<dyn ProofVerifier>,
        rng: StdRng,
    ) -> Result<Self, IndexError> {
        let codes = CodeGenerator::new(config.code_prefix.clone(), rng)?;
        let index = Arc::new(CodeIndex::new());
        let log = Arc::new(HashChainLog::with_policy(config.duplicate_policy));
        let verifier = CredentialVerifier::new(verifier);

        let submissions = SubmissionOrchestrator::new(
            stores.clone(),
            index.clone(),
            log.clone(),
            CredentialIssuer::new(signer),
            codes,
            config.max_code_attempts,
        );
        let trail = TrailService::new(stores.clone(), index.clone(), log.clone(), verifier.clone());
        let consumer = ConsumerService::new(stores.clone(), index.clone());

        Ok(Self {
            stores,
            index,
            log,
            verifier,
            submissions,
            trail,
            consumer,
        })
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn index(&self) -> &CodeIndex {
        &self.index
    }

    pub fn log(&self) -> &HashChainLog {
        &self.log
    }

    pub fn verifier(&self) -> &CredentialVerifier {
        &self.verifier
    }

    /// Register a farmer, generating a registration-style id when none is
    /// supplied.
    pub fn register_farmer(
        &self,
        registration: FarmerRegistration,
        now: Timestamp,
    ) -> Result<Farmer, RegistrationError> {
        let name = registration.name.trim();
        if name.is_empty() {
            return Err(RegistrationError::Invalid("name must not be empty".to_string()));
        }
        let id = match registration.id {
            Some(id) => id,
            None => {
                let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
                farmer_id_for(now.date(), &registration.farm_name, suffix)
                    .map_err(|e| RegistrationError::Invalid(e.to_string()))?
            }
        };
        let farmer = Farmer {
            id,
            name: name.to_string(),
            farm_name: registration.farm_name.trim().to_string(),
            location: registration.location.trim().to_string(),
            registered_at: now,
        };
        self.stores.farmers.add(farmer.clone())?;
        tracing::info!(farmer_id = %farmer.id, "farmer registered");
        Ok(farmer)
    }

    pub fn farmer(&self, id: &FarmerId) -> Result<Option<Farmer>, StoreError> {
        self.stores.farmers.get_by_id(id)
    }

    pub fn save_draft(
        &self,
        farmer_id: &FarmerId,
        batch: BatchDraft,
        claims: Vec<ClaimDraft>,
        now: Timestamp,
    ) -> Result<Draft, StoreError> {
        let draft = Draft {
            batch,
            claims,
            saved_at: now,
        };
        self.stores.drafts.save(farmer_id, draft.clone())?;
        Ok(draft)
    }

    pub fn draft(&self, farmer_id: &FarmerId) -> Result<Option<Draft>, StoreError> {
        self.stores.drafts.get(farmer_id)
    }

    pub fn clear_draft(&self, farmer_id: &FarmerId) -> Result<bool, StoreError> {
        self.stores.drafts.clear(farmer_id)
    }

    pub fn submit_batch(
        &self,
        draft: &BatchDraft,
        claims: &[ClaimDraft],
        farmer_id: &FarmerId,
    ) -> Result<Submission, SubmissionError> {
        self.submissions.submit_batch(draft, claims, farmer_id)
    }

    pub fn submit_batch_at(
        &self,
        draft: &BatchDraft,
        claims: &[ClaimDraft],
        farmer_id: &FarmerId,
        now: Timestamp,
    ) -> Result<Submission, SubmissionError> {
        self.submissions.submit_batch_at(draft, claims, farmer_id, now)
    }

    /// A batch and its claims, if the batch exists.
    pub fn batch(&self, id: &BatchId) -> Result<Option<BatchRecord>, StoreError> {
        let Some(batch) = self.stores.batches.get_by_id(id)? else {
            return Ok(None);
        };
        let claims = self.stores.claims.get_by_batch_id(id)?;
        Ok(Some(BatchRecord { batch, claims }))
    }

    pub fn lookup(&self, code: &str) -> Result<TrailReport, StoreError> {
        self.trail.lookup(code)
    }

    pub fn report_issue(
        &self,
        code: &str,
        description: &str,
        contact: Option<String>,
        now: Timestamp,
    ) -> Result<ConsumerIssue, ConsumerError> {
        self.consumer.report_issue(code, description, contact, now)
    }

    pub fn leave_feedback(
        &self,
        code: &str,
        rating: u8,
        comment: &str,
        now: Timestamp,
    ) -> Result<Feedback, ConsumerError> {
        self.consumer.leave_feedback(code, rating, comment, now)
    }

    pub fn consumer(&self) -> &ConsumerService {
        &self.consumer
    }

    /// Fail-closed verification of untyped credential JSON.
    pub fn verify_credential_value(&self, value: &Value) -> bool {
        self.verifier.verify_credential_value(value)
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("submissions", &self.submissions)
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agritrust_crypto::{KeyedHashScheme, ProofSecret};

    fn ledger() -> Ledger {
        let scheme = Arc::new(KeyedHashScheme::new(
            ProofSecret::new(b"ledger-unit-secret".to_vec()).unwrap(),
        ));
        Ledger::with_rng(
            &LedgerConfig::default(),
            Stores::in_memory(),
            scheme.clone(),
            scheme,
            StdRng::seed_from_u64(11),
        )
        .unwrap()
    }

    #[test]
    fn register_generates_id() {
        let l = ledger();
        let now = Timestamp::parse("2023-01-15T09:00:00Z").unwrap();
        let farmer = l
            .register_farmer(
                FarmerRegistration {
                    id: None,
                    name: "Ada Green".into(),
                    farm_name: "Green Acres".into(),
                    location: "Cauca".into(),
                },
                now,
            )
            .unwrap();
        assert!(farmer.id.as_str().starts_with("20230115-greenacres-"));
        assert_eq!(l.farmer(&farmer.id).unwrap(), Some(farmer));
    }

    #[test]
    fn register_rejects_blank_name_and_duplicate_id() {
        let l = ledger();
        let reg = FarmerRegistration {
            id: Some(FarmerId::new("f-1").unwrap()),
            name: "Ada".into(),
            farm_name: "Acres".into(),
            location: "Cauca".into(),
        };
        l.register_farmer(reg.clone(), Timestamp::now()).unwrap();
        assert!(matches!(
            l.register_farmer(reg.clone(), Timestamp::now()),
            Err(RegistrationError::Store(StoreError::Conflict(_)))
        ));
        let blank = FarmerRegistration {
            name: " ".into(),
            ..reg
        };
        assert!(matches!(
            l.register_farmer(blank, Timestamp::now()),
            Err(RegistrationError::Invalid(_))
        ));
    }

    #[test]
    fn bad_prefix_fails_construction() {
        let scheme = Arc::new(KeyedHashScheme::new(
            ProofSecret::new(b"ledger-unit-secret".to_vec()).unwrap(),
        ));
        let config = LedgerConfig {
            code_prefix: "lower".into(),
            ..Default::default()
        };
        assert!(Ledger::new(&config, Stores::in_memory(), scheme.clone(), scheme).is_err());
    }

    #[test]
    fn batch_record_missing() {
        assert!(ledger().batch(&BatchId::new()).unwrap().is_none());
    }
}
