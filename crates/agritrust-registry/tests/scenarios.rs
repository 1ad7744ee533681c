//! End-to-end ledger scenarios: submit a batch, resolve its consumer code,
//! and observe how each trail signal reacts to tampering at rest.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use agritrust_core::{FarmerId, Timestamp};
use agritrust_crypto::{KeyedHashScheme, ProofSecret};
use agritrust_log::TransparencyLog;
use agritrust_registry::{
    BatchDraft, ClaimDraft, ClaimType, ContentStatus, CredentialStore, Evidence, EvidenceKind,
    FarmerRegistration, Ledger, LedgerConfig, LogStatus, MemoryStore, SignatureStatus, Stores,
    Submission, TrailReport, Verdict,
};

const FARMER: &str = "20230115-greenacres-1234";

struct World {
    memory: Arc<MemoryStore>,
    ledger: Ledger,
}

fn world() -> World {
    let memory = Arc::new(MemoryStore::new());
    let scheme = Arc::new(KeyedHashScheme::new(
        ProofSecret::new(b"scenario-proof-secret".to_vec()).unwrap(),
    ));
    let ledger = Ledger::with_rng(
        &LedgerConfig::default(),
        Stores::from_memory(memory.clone()),
        scheme.clone(),
        scheme,
        StdRng::seed_from_u64(2024),
    )
    .unwrap();
    ledger
        .register_farmer(
            FarmerRegistration {
                id: Some(FarmerId::new(FARMER).unwrap()),
                name: "Ada Green".into(),
                farm_name: "Green Acres".into(),
                location: "Cauca".into(),
            },
            Timestamp::parse("2023-01-15T08:00:00Z").unwrap(),
        )
        .unwrap();
    World { memory, ledger }
}

fn farmer_id() -> FarmerId {
    FarmerId::new(FARMER).unwrap()
}

fn apples() -> BatchDraft {
    BatchDraft {
        product_name: "Apples".into(),
        quantity: Some(120),
        ..Default::default()
    }
}

fn submit(world: &World) -> Submission {
    world
        .ledger
        .submit_batch(&apples(), &[], &farmer_id())
        .unwrap()
}

fn is_code_shaped(code: &str) -> bool {
    let parts: Vec<&str> = code.split('-').collect();
    parts.len() == 3
        && parts[0] == "AGRITRUST"
        && parts[1].len() == 6
        && parts[1].bytes().all(|b| b.is_ascii_digit())
        && parts[2].len() == 4
        && parts[2].bytes().all(|b| b.is_ascii_digit())
}

fn found(report: TrailReport) -> agritrust_registry::Trail {
    match report {
        TrailReport::Found(trail) => *trail,
        TrailReport::UnknownCode { code } => panic!("expected a trail for {code}"),
    }
}

#[test]
fn apples_without_claims_are_verified() {
    let w = world();
    let sub = submit(&w);

    assert!(is_code_shaped(sub.consumer_code.as_str()), "{}", sub.consumer_code);
    assert_eq!(w.ledger.log().len(), 1);

    let cid = sub.batch.cid.unwrap();
    let check = w.ledger.log().check_consistency(&sub.vc_digest, &cid);
    assert!(check.exists);
    assert!(check.consistent);

    let trail = found(w.ledger.lookup(sub.consumer_code.as_str()).unwrap());
    assert_eq!(trail.signature, SignatureStatus::Valid);
    assert_eq!(trail.log, LogStatus::Consistent);
    assert_eq!(trail.content, ContentStatus::Intact);
    assert_eq!(trail.verdict, Verdict::Verified);
    assert!(trail.claims.is_empty());
    assert_eq!(trail.batch.unwrap().product_name, "Apples");
}

#[test]
fn claims_travel_with_the_batch() {
    let w = world();
    let claims = vec![
        ClaimDraft {
            claim_type: ClaimType::Organic,
            description: "EU organic".into(),
            evidence: vec![Evidence {
                kind: EvidenceKind::Certificate,
                reference: "EU-ORG-0091".into(),
            }],
        },
        ClaimDraft {
            claim_type: ClaimType::Other("shade-grown".into()),
            description: "grown under canopy".into(),
            evidence: vec![],
        },
    ];
    let sub = w
        .ledger
        .submit_batch(&apples(), &claims, &farmer_id())
        .unwrap();
    let record = w.ledger.batch(&sub.batch.id).unwrap().unwrap();
    assert_eq!(record.claims.len(), 2);

    let trail = found(w.ledger.lookup(sub.consumer_code.as_str()).unwrap());
    assert_eq!(trail.claims.len(), 2);
    assert_eq!(trail.verdict, Verdict::Verified);
}

#[test]
fn unknown_and_malformed_codes() {
    let w = world();
    submit(&w);
    for code in ["AGRITRUST-000000-0000", "not-a-code", ""] {
        let report = w.ledger.lookup(code).unwrap();
        assert!(report.is_unknown(), "{code}");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "unknown_code");
    }
}

#[test]
fn altered_batch_is_detected() {
    let w = world();
    let sub = submit(&w);
    let mut stored = w.ledger.batch(&sub.batch.id).unwrap().unwrap().batch;
    stored.quantity += 1;
    w.memory.replace_batch(stored);

    let trail = found(w.ledger.lookup(sub.consumer_code.as_str()).unwrap());
    assert_eq!(trail.content, ContentStatus::Altered);
    assert_eq!(trail.signature, SignatureStatus::Valid);
    assert_eq!(trail.log, LogStatus::Consistent);
    assert_eq!(trail.verdict, Verdict::Unverified);
}

#[test]
fn replaced_credential_is_detected() {
    let w = world();
    let sub = submit(&w);
    let mut vc = CredentialStore::get(w.memory.as_ref(), &sub.vc_digest)
        .unwrap()
        .unwrap();
    let mut sig = vc.proof.signature_value.into_bytes();
    sig[0] = if sig[0] == b'0' { b'1' } else { b'0' };
    vc.proof.signature_value = String::from_utf8(sig).unwrap();
    w.memory.replace_credential(sub.vc_digest, vc);

    let trail = found(w.ledger.lookup(sub.consumer_code.as_str()).unwrap());
    assert_eq!(trail.signature, SignatureStatus::Invalid);
    assert_eq!(trail.content, ContentStatus::Intact);
    assert_eq!(trail.verdict, Verdict::Unverified);
}

#[test]
fn stored_credential_with_respelled_created_does_not_verify() {
    let w = world();
    let sub = submit(&w);
    let vc = CredentialStore::get(w.memory.as_ref(), &sub.vc_digest)
        .unwrap()
        .unwrap();
    let value = serde_json::to_value(&vc).unwrap();
    assert!(w.ledger.verify_credential_value(&value));

    let created = value["proof"]["created"].as_str().unwrap().to_string();
    for respelled in [created.replace('Z', ".999Z"), created.replace('Z', "+00:00")] {
        let mut altered = value.clone();
        altered["proof"]["created"] = serde_json::json!(respelled);
        assert!(!w.ledger.verify_credential_value(&altered), "{respelled}");
    }
}

#[test]
fn removed_batch_is_unavailable() {
    let w = world();
    let sub = submit(&w);
    w.memory.remove_batch(&sub.batch.id);

    let trail = found(w.ledger.lookup(sub.consumer_code.as_str()).unwrap());
    assert_eq!(trail.content, ContentStatus::Unavailable);
    assert!(trail.batch.is_none());
    assert_eq!(trail.verdict, Verdict::Unverified);
}

#[test]
fn codes_are_unique_and_log_stays_linked() {
    let w = world();
    let subs: Vec<Submission> = (0..20).map(|_| submit(&w)).collect();
    let mut codes: Vec<&str> = subs.iter().map(|s| s.consumer_code.as_str()).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), 20);
    assert_eq!(w.ledger.index().bound().len(), 20);

    let audit = w.ledger.log().audit();
    assert!(audit.ok, "{:?}", audit.faults);
    assert_eq!(audit.length, 20);
}

#[test]
fn submission_clears_saved_draft() {
    let w = world();
    let now = Timestamp::now();
    w.ledger
        .save_draft(&farmer_id(), apples(), vec![], now)
        .unwrap();
    assert!(w.ledger.draft(&farmer_id()).unwrap().is_some());
    submit(&w);
    assert!(w.ledger.draft(&farmer_id()).unwrap().is_none());
}

#[test]
fn consumers_can_report_and_rate_bound_codes() {
    let w = world();
    let sub = submit(&w);
    let code = sub.consumer_code.as_str();
    let now = Timestamp::now();

    w.ledger
        .report_issue(code, "label says 2kg, bag holds 1kg", None, now)
        .unwrap();
    w.ledger.leave_feedback(code, 5, "crisp", now).unwrap();

    assert_eq!(w.ledger.consumer().issues(code).unwrap().len(), 1);
    assert_eq!(w.ledger.consumer().feedback(code).unwrap()[0].rating, 5);
    assert!(w
        .ledger
        .report_issue("AGRITRUST-000000-0000", "x", None, now)
        .is_err());
}
