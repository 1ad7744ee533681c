//! # Chain Audit
//!
//! `check_consistency` never looks at linkage. This module does: it walks a
//! log and reports every place where the hash-chain invariants fail.
//!
//! ```text
//! log[i].index        == i
//! log[0].previousHash == null
//! log[i].previousHash == log[i-1].digest      (i > 0)
//! ```
//!
//! The audit collects all faults rather than stopping at the first one, so
//! an auditor sees the full extent of any corruption.

use serde::{Deserialize, Serialize};

use agritrust_core::ContentDigest;

use crate::entry::LogEntry;

/// One broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChainFault {
    /// The entry at `position` claims a different index.
    IndexMismatch {
        /// Actual position in the sequence.
        position: u64,
        /// Index written in the entry.
        index: u64,
    },
    /// The first entry has a previous hash.
    GenesisHasPrevious {
        /// The unexpected previous hash.
        previous: ContentDigest,
    },
    /// `previousHash` does not equal the preceding entry's digest.
    BrokenLink {
        /// Position of the entry with the bad link.
        position: u64,
        /// The preceding entry's digest.
        expected: ContentDigest,
        /// What the entry recorded.
        actual: Option<ContentDigest>,
    },
}

impl std::fmt::Display for ChainFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainFault::IndexMismatch { position, index } => {
                write!(f, "entry at position {position} has index {index}")
            }
            ChainFault::GenesisHasPrevious { previous } => {
                write!(f, "genesis entry has previousHash {previous}")
            }
            ChainFault::BrokenLink {
                position,
                expected,
                actual,
            } => match actual {
                Some(a) => write!(
                    f,
                    "entry {position} previousHash {a} does not match {expected}"
                ),
                None => write!(f, "entry {position} previousHash is null, expected {expected}"),
            },
        }
    }
}

/// Outcome of a chain audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainAudit {
    /// No faults found.
    pub ok: bool,
    /// Number of entries audited.
    pub length: u64,
    /// Every broken invariant, in log order.
    pub faults: Vec<ChainFault>,
}

/// Audit a sequence of entries.
pub fn audit_chain(entries: &[LogEntry]) -> ChainAudit {
    let mut faults = Vec::new();

    for (position, entry) in entries.iter().enumerate() {
        let position = position as u64;
        if entry.index != position {
            faults.push(ChainFault::IndexMismatch {
                position,
                index: entry.index,
            });
        }

        if position == 0 {
            if let Some(previous) = entry.previous_hash {
                faults.push(ChainFault::GenesisHasPrevious { previous });
            }
            continue;
        }

        let expected = entries[position as usize - 1].digest;
        if entry.previous_hash != Some(expected) {
            faults.push(ChainFault::BrokenLink {
                position,
                expected,
                actual: entry.previous_hash,
            });
        }
    }

    ChainAudit {
        ok: faults.is_empty(),
        length: entries.len() as u64,
        faults,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agritrust_core::Timestamp;

    fn d(b: u8) -> ContentDigest {
        ContentDigest::from_bytes([b; 32])
    }

    fn chain(n: u8) -> Vec<LogEntry> {
        let ts = Timestamp::parse("2024-05-01T10:00:00Z").unwrap();
        (0..n)
            .map(|i| LogEntry {
                index: i as u64,
                digest: d(i + 1),
                previous_hash: if i == 0 { None } else { Some(d(i)) },
                timestamp: ts,
                cid: d(100 + i),
            })
            .collect()
    }

    #[test]
    fn empty_log_is_ok() {
        let audit = audit_chain(&[]);
        assert!(audit.ok);
        assert_eq!(audit.length, 0);
    }

    #[test]
    fn well_formed_chain_is_ok() {
        let audit = audit_chain(&chain(5));
        assert!(audit.ok, "{:?}", audit.faults);
        assert_eq!(audit.length, 5);
    }

    #[test]
    fn genesis_with_previous_detected() {
        let mut entries = chain(2);
        entries[0].previous_hash = Some(d(42));
        let audit = audit_chain(&entries);
        assert!(!audit.ok);
        assert_eq!(audit.faults, vec![ChainFault::GenesisHasPrevious { previous: d(42) }]);
    }

    #[test]
    fn broken_link_detected() {
        let mut entries = chain(4);
        entries[2].previous_hash = Some(d(99));
        let audit = audit_chain(&entries);
        assert_eq!(
            audit.faults,
            vec![ChainFault::BrokenLink {
                position: 2,
                expected: d(2),
                actual: Some(d(99)),
            }]
        );
    }

    #[test]
    fn removed_entry_breaks_index_and_link() {
        let mut entries = chain(4);
        entries.remove(1);
        let audit = audit_chain(&entries);
        assert!(audit.faults.contains(&ChainFault::IndexMismatch { position: 1, index: 2 }));
        assert!(audit
            .faults
            .iter()
            .any(|f| matches!(f, ChainFault::BrokenLink { position: 1, .. })));
    }

    #[test]
    fn reordered_entries_detected() {
        let mut entries = chain(3);
        entries.swap(1, 2);
        assert!(!audit_chain(&entries).ok);
    }

    #[test]
    fn fault_serializes_with_kind_tag() {
        let val = serde_json::to_value(ChainFault::IndexMismatch { position: 1, index: 3 }).unwrap();
        assert_eq!(val["kind"], "index_mismatch");
    }

    #[test]
    fn null_link_message() {
        let fault = ChainFault::BrokenLink {
            position: 3,
            expected: d(1),
            actual: None,
        };
        assert!(fault.to_string().contains("is null"));
    }
}
