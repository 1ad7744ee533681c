//! Property tests for consumer codes and the lookup index.

use std::collections::HashSet;

use chrono::NaiveDate;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use agritrust_core::{BatchId, ContentDigest};
use agritrust_registry::{CodeGenerator, CodeIndex, ConsumerCode, IndexEntry, LookupIndex};

fn entry(seed: u8) -> IndexEntry {
    IndexEntry {
        cid: ContentDigest::from_bytes([seed; 32]),
        vc_digest: ContentDigest::from_bytes([seed.wrapping_add(1); 32]),
        batch_id: BatchId::new(),
    }
}

proptest! {
    #[test]
    fn generated_codes_always_parse(
        prefix in "[A-Z][A-Z0-9]{0,11}",
        seed in any::<u64>(),
        days in 0i64..20_000,
    ) {
        let date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + chrono::Duration::days(days);
        let mut gen = CodeGenerator::new(prefix.clone(), StdRng::seed_from_u64(seed)).unwrap();
        let code = gen.generate(date);
        let reparsed = ConsumerCode::parse(code.as_str()).unwrap();
        prop_assert_eq!(&reparsed, &code);
        let expected_date = date.format("%y%m%d").to_string();
        let expected_prefix = format!("{}-{}-", prefix, expected_date);
        prop_assert!(code.as_str().starts_with(&expected_prefix));
    }

    #[test]
    fn wrong_digit_counts_are_rejected(date in "[0-9]{1,5}|[0-9]{7,9}", serial in "[0-9]{4}") {
        let code = format!("AGRITRUST-{date}-{serial}");
        prop_assert!(ConsumerCode::parse(&code).is_err());
    }

    #[test]
    fn reservations_never_repeat(seed in any::<u64>(), n in 1usize..60) {
        let index = CodeIndex::new();
        let mut gen = CodeGenerator::new("T", StdRng::seed_from_u64(seed)).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let mut seen = HashSet::new();
        for i in 0..n {
            let mut draw = || gen.generate(date);
            let code = index.reserve_unique(&mut draw, 64).unwrap();
            prop_assert!(seen.insert(code.clone()));
            // Reserved codes stay invisible until bound.
            prop_assert!(index.get(&code).is_none());
            if i % 2 == 0 {
                index.put(&code, entry(i as u8)).unwrap();
                prop_assert!(index.get(&code).is_some());
            }
        }
        prop_assert_eq!(index.len(), n.div_ceil(2));
    }
}

#[test]
fn released_reservation_can_be_reused() {
    let index = CodeIndex::new();
    let code = ConsumerCode::parse("AGRITRUST-240602-0001").unwrap();
    let mut same = || code.clone();
    let reserved = index.reserve_unique(&mut same, 1).unwrap();
    assert!(index.reserve_unique(&mut same, 3).is_err());
    index.release(&reserved);
    assert!(index.reserve_unique(&mut same, 1).is_ok());
}

#[test]
fn bound_code_cannot_be_rebound_differently() {
    let index = CodeIndex::new();
    let code = ConsumerCode::parse("AGRITRUST-240602-0002").unwrap();
    let first = entry(1);
    index.put(&code, first).unwrap();
    index.put(&code, first).unwrap();
    assert!(index.put(&code, entry(9)).is_err());
    index.release(&code);
    assert_eq!(index.get(&code), Some(first));
}
