//! # Digest Engine Properties
//!
//! The content-addressing contract: same content gives the same CID no
//! matter how the payload was assembled, and any change to a field gives a
//! different CID.

use std::collections::BTreeMap;

use agritrust_core::{compute_digest, ContentDigest};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn batch_fields() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-z][a-zA-Z]{0,11}", "[A-Za-z0-9 ]{0,16}", 1..8)
}

proptest! {
    #[test]
    fn insertion_order_never_changes_the_digest(fields in batch_fields()) {
        let forward: Map<String, Value> = fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        let mut reversed = Map::new();
        for (k, v) in fields.iter().rev() {
            reversed.insert(k.clone(), Value::String(v.clone()));
        }
        prop_assert_eq!(
            compute_digest(&Value::Object(forward)).unwrap(),
            compute_digest(&Value::Object(reversed)).unwrap()
        );
    }

    #[test]
    fn changing_one_value_changes_the_digest(
        fields in batch_fields(),
        suffix in "[A-Za-z0-9]{1,4}",
    ) {
        let original = json!(fields);
        let mut mutated = fields.clone();
        let first_key = mutated.keys().next().cloned().unwrap();
        if let Some(v) = mutated.get_mut(&first_key) {
            v.push_str(&suffix);
        }
        prop_assert_ne!(
            compute_digest(&original).unwrap(),
            compute_digest(&json!(mutated)).unwrap()
        );
    }

    #[test]
    fn digest_hex_round_trips(fields in batch_fields()) {
        let digest = compute_digest(&json!(fields)).unwrap();
        prop_assert_eq!(ContentDigest::from_hex(&digest.to_hex()).unwrap(), digest);
    }
}

#[test]
fn mangoes_and_mangos_differ() {
    let a = compute_digest(&json!({"productName": "Mangoes", "quantity": 20})).unwrap();
    let b = compute_digest(&json!({"productName": "Mangos", "quantity": 20})).unwrap();
    assert_ne!(a, b);
}
