//! # Credential Issuer
//!
//! `issue_credential(cid, farmerId, batchId)` captures the issuance time,
//! derives the issuer DID, signs `{batchId, cid, created, issuer}` and
//! returns the credential with its digest. The only non-determinism is the
//! timestamp; [`CredentialIssuer::issue_credential_at`] takes it as input.

use std::sync::Arc;

use agritrust_core::{BatchId, ContentDigest, Did, FarmerId, Timestamp};
use agritrust_crypto::ProofSigner;

use crate::credential::{
    signing_input, Credential, CredentialSubject, VcError, CREDENTIALS_V1_CONTEXT,
    PROVENANCE_CREDENTIAL_TYPE, VERIFIABLE_CREDENTIAL_TYPE,
};
use crate::proof::{Proof, ProofPurpose, ProofType};

/// Key fragment appended to the issuer DID in `verificationMethod`.
pub const KEY_FRAGMENT: &str = "keys-1";

/// A freshly issued credential and its vcDigest.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedCredential {
    /// The credential.
    pub credential: Credential,
    /// `compute_digest(credential)`.
    pub vc_digest: ContentDigest,
}

/// Issues provenance credentials with an injected signer.
#[derive(Clone)]
pub struct CredentialIssuer {
    signer: Arc<dyn ProofSigner>,
}

impl CredentialIssuer {
    /// Build an issuer around a signer.
    pub fn new(signer: Arc<dyn ProofSigner>) -> Self {
        Self { signer }
    }

    /// Issue a credential stamped with the current time.
    pub fn issue_credential(
        &self,
        cid: ContentDigest,
        farmer_id: &FarmerId,
        batch_id: BatchId,
    ) -> Result<IssuedCredential, VcError> {
        self.issue_credential_at(cid, farmer_id, batch_id, Timestamp::now())
    }

    /// Issue a credential stamped with `created`.
    pub fn issue_credential_at(
        &self,
        cid: ContentDigest,
        farmer_id: &FarmerId,
        batch_id: BatchId,
        created: Timestamp,
    ) -> Result<IssuedCredential, VcError> {
        let issuer = Did::farmer(farmer_id);
        let message = signing_input(&batch_id, &cid, &created, &issuer)?;
        let signature = self.signer.sign(&message)?;

        let credential = Credential {
            context: vec![CREDENTIALS_V1_CONTEXT.to_string()],
            credential_type: vec![
                VERIFIABLE_CREDENTIAL_TYPE.to_string(),
                PROVENANCE_CREDENTIAL_TYPE.to_string(),
            ],
            id: Credential::id_for(&batch_id),
            issuer: issuer.clone(),
            issuance_date: created,
            credential_subject: CredentialSubject {
                id: Did::batch(&batch_id),
                cid,
                batch_id,
                farmer_id: farmer_id.clone(),
            },
            proof: Proof {
                proof_type: ProofType::for_scheme(self.signer.scheme()),
                created,
                verification_method: format!("{issuer}#{KEY_FRAGMENT}"),
                proof_purpose: ProofPurpose::AssertionMethod,
                signature_value: signature.to_hex(),
            },
        };
        let vc_digest = credential.digest()?;

        tracing::debug!(
            batch_id = %batch_id,
            cid = %cid,
            vc_digest = %vc_digest,
            "credential issued"
        );

        Ok(IssuedCredential {
            credential,
            vc_digest,
        })
    }
}

impl std::fmt::Debug for CredentialIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialIssuer")
            .field("scheme", &self.signer.scheme())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agritrust_core::compute_digest;
    use agritrust_crypto::{KeyedHashScheme, ProofSecret};

    fn issuer() -> CredentialIssuer {
        let secret = ProofSecret::new(b"test-ledger-secret".to_vec()).unwrap();
        CredentialIssuer::new(Arc::new(KeyedHashScheme::new(secret)))
    }

    fn farmer() -> FarmerId {
        FarmerId::new("20230115-greenacres-1234").unwrap()
    }

    #[test]
    fn credential_shape() {
        let batch_id = BatchId::new();
        let cid = ContentDigest::from_bytes([3; 32]);
        let issued = issuer().issue_credential(cid, &farmer(), batch_id).unwrap();
        let vc = &issued.credential;

        assert_eq!(vc.issuer.as_str(), "did:agritrust:farmer:20230115-greenacres-1234");
        assert_eq!(vc.id, format!("urn:agritrust:vc:{batch_id}"));
        assert_eq!(vc.credential_subject.id, Did::batch(&batch_id));
        assert_eq!(vc.credential_subject.cid, cid);
        assert_eq!(vc.issuance_date, vc.proof.created);
        assert_eq!(
            vc.proof.verification_method,
            "did:agritrust:farmer:20230115-greenacres-1234#keys-1"
        );
        assert_eq!(vc.proof.signature_value.len(), 64);
        assert!(vc.is_provenance_credential());
    }

    #[test]
    fn vc_digest_is_digest_of_credential() {
        let issued = issuer()
            .issue_credential(ContentDigest::from_bytes([1; 32]), &farmer(), BatchId::new())
            .unwrap();
        assert_eq!(issued.vc_digest, compute_digest(&issued.credential).unwrap());
    }

    #[test]
    fn issuance_is_deterministic_given_time() {
        let batch_id = BatchId::new();
        let cid = ContentDigest::from_bytes([9; 32]);
        let t = Timestamp::parse("2024-05-01T10:00:00Z").unwrap();
        let a = issuer().issue_credential_at(cid, &farmer(), batch_id, t).unwrap();
        let b = issuer().issue_credential_at(cid, &farmer(), batch_id, t).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_time_changes_signature_and_digest() {
        let batch_id = BatchId::new();
        let cid = ContentDigest::from_bytes([9; 32]);
        let t1 = Timestamp::parse("2024-05-01T10:00:00Z").unwrap();
        let t2 = Timestamp::parse("2024-05-01T10:00:01Z").unwrap();
        let a = issuer().issue_credential_at(cid, &farmer(), batch_id, t1).unwrap();
        let b = issuer().issue_credential_at(cid, &farmer(), batch_id, t2).unwrap();
        assert_ne!(a.credential.proof.signature_value, b.credential.proof.signature_value);
        assert_ne!(a.vc_digest, b.vc_digest);
    }

    #[test]
    fn debug_does_not_expose_secret() {
        assert!(!format!("{:?}", issuer()).contains("test-ledger-secret"));
    }
}
