//! # Credential Verifier
//!
//! Recomputes the expected proof from a credential's own fields and compares.
//! Verification outcomes are booleans, never errors: anything missing,
//! malformed or mismatched is `false`. [`CredentialVerifier::check`] keeps
//! the reason for callers that want to log it.

use std::sync::Arc;

use serde_json::Value;

use agritrust_crypto::{CryptoError, ProofSignature, ProofVerifier};

use crate::credential::{Credential, VcError};

/// Checks provenance credentials with an injected verifier.
#[derive(Clone)]
pub struct CredentialVerifier {
    verifier: Arc<dyn ProofVerifier>,
}

impl CredentialVerifier {
    /// Build a verifier around a proof verifier.
    pub fn new(verifier: Arc<dyn ProofVerifier>) -> Self {
        Self { verifier }
    }

    /// `true` only if the proof matches the credential's fields.
    pub fn verify(&self, credential: &Credential) -> bool {
        match self.check(credential) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(credential = %credential.id, error = %e, "credential rejected");
                false
            }
        }
    }

    /// Verify untyped JSON. Fails closed on any input that is not a
    /// well-formed provenance credential.
    pub fn verify_credential_value(&self, value: &Value) -> bool {
        if !has_required_fields(value) {
            return false;
        }
        match serde_json::from_value::<Credential>(value.clone()) {
            Ok(credential) => self.verify(&credential),
            Err(e) => {
                tracing::debug!(error = %e, "not a credential");
                false
            }
        }
    }

    /// Verify and report why a credential failed.
    pub fn check(&self, credential: &Credential) -> Result<(), VcError> {
        if !credential.is_provenance_credential() {
            return Err(VcError::Malformed(format!(
                "type must include VerifiableCredential and AgriculturalProvenanceCredential, got {:?}",
                credential.credential_type
            )));
        }

        let expected = self.verifier.scheme();
        let actual = credential.proof.proof_type.scheme();
        if actual != expected {
            return Err(CryptoError::SchemeMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
            }
            .into());
        }

        let signature = ProofSignature::from_hex(&credential.proof.signature_value)?;
        let message = credential.signing_input()?;
        self.verifier.verify(&message, &signature)?;
        Ok(())
    }
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("scheme", &self.verifier.scheme())
            .finish()
    }
}

fn has_required_fields(value: &Value) -> bool {
    let non_empty_str = |v: Option<&Value>| v.and_then(Value::as_str).is_some_and(|s| !s.is_empty());
    let proof = value.get("proof");
    non_empty_str(value.get("issuer"))
        && non_empty_str(proof.and_then(|p| p.get("signatureValue")))
        && non_empty_str(proof.and_then(|p| p.get("created")))
}
