//! Property tests: any change to a signed field breaks verification.

use std::sync::Arc;

use proptest::prelude::*;

use agritrust_core::{BatchId, ContentDigest, Did, FarmerId, Timestamp};
use agritrust_crypto::{KeyedHashScheme, ProofSecret};
use agritrust_vc::{CredentialIssuer, CredentialVerifier};

fn pair() -> (CredentialIssuer, CredentialVerifier) {
    let scheme = Arc::new(KeyedHashScheme::new(
        ProofSecret::new(b"property-test-secret".to_vec()).unwrap(),
    ));
    (
        CredentialIssuer::new(scheme.clone()),
        CredentialVerifier::new(scheme),
    )
}

fn farmer_id() -> impl Strategy<Value = FarmerId> {
    "[a-z0-9][a-z0-9-]{0,23}".prop_map(|s| FarmerId::new(s).unwrap())
}

proptest! {
    #[test]
    fn issued_credentials_always_verify(
        cid in any::<[u8; 32]>(),
        farmer in farmer_id(),
        secs in 0i64..4_000_000_000,
    ) {
        let (issuer, verifier) = pair();
        let created = Timestamp::from_utc(
            chrono::DateTime::from_timestamp(secs, 0).unwrap(),
        );
        let issued = issuer
            .issue_credential_at(ContentDigest::from_bytes(cid), &farmer, BatchId::new(), created)
            .unwrap();
        prop_assert!(verifier.verify(&issued.credential));

        let value = serde_json::to_value(&issued.credential).unwrap();
        prop_assert!(verifier.verify_credential_value(&value));
    }

    #[test]
    fn flipping_any_cid_byte_breaks_verification(
        cid in any::<[u8; 32]>(),
        pos in 0usize..32,
        mask in 1u8..=255,
    ) {
        let (issuer, verifier) = pair();
        let farmer = FarmerId::new("20230115-greenacres-1234").unwrap();
        let issued = issuer
            .issue_credential(ContentDigest::from_bytes(cid), &farmer, BatchId::new())
            .unwrap();

        let mut tampered = issued.credential.clone();
        let mut bytes = cid;
        bytes[pos] ^= mask;
        tampered.credential_subject.cid = ContentDigest::from_bytes(bytes);
        prop_assert!(!verifier.verify(&tampered));
    }

    #[test]
    fn reassigning_issuer_breaks_verification(
        a in farmer_id(),
        b in farmer_id(),
    ) {
        prop_assume!(a != b);
        let (issuer, verifier) = pair();
        let issued = issuer
            .issue_credential(ContentDigest::from_bytes([0; 32]), &a, BatchId::new())
            .unwrap();
        let mut tampered = issued.credential;
        tampered.issuer = Did::farmer(&b);
        prop_assert!(!verifier.verify(&tampered));
    }
}
