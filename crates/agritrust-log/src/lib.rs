//! # agritrust-log — Transparency Log
//!
//! An append-only, singly hash-linked sequence of credential digests. Each
//! entry records a vcDigest, the CID its credential covers, and the digest
//! of the entry before it.
//!
//! ## Scope of the consistency check
//!
//! [`TransparencyLog::check_consistency`] answers two questions about one
//! digest: is it logged, and does its entry carry the expected CID. It does
//! not verify linkage and gives no inclusion proof. Linkage is covered by
//! [`audit_chain`]. A Merkle-tree log with real inclusion proofs can
//! implement the same trait.
//!
//! ## Crate Policy
//!
//! - Entries are never edited, reordered or removed.
//! - An append is one critical section.

pub mod audit;
pub mod chain;
pub mod entry;
pub mod error;

pub use audit::{audit_chain, ChainAudit, ChainFault};
pub use chain::{DuplicatePolicy, HashChainLog};
pub use entry::{ConsistencyCheck, LogEntry};
pub use error::LogError;

use agritrust_core::ContentDigest;

/// An append-only log of credential digests.
pub trait TransparencyLog: Send + Sync {
    /// Append `{vc_digest, cid}` and return the new entry's index.
    fn append(&self, vc_digest: ContentDigest, cid: ContentDigest) -> Result<u64, LogError>;

    /// The first entry recording `vc_digest`.
    fn exists(&self, vc_digest: &ContentDigest) -> Option<LogEntry>;

    /// Whether `vc_digest` is logged and bound to `expected_cid`.
    fn check_consistency(
        &self,
        vc_digest: &ContentDigest,
        expected_cid: &ContentDigest,
    ) -> ConsistencyCheck {
        ConsistencyCheck::of(self.exists(vc_digest).as_ref(), expected_cid)
    }

    /// Number of entries.
    fn len(&self) -> usize;

    /// Whether the log has no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all entries in order.
    fn entries(&self) -> Vec<LogEntry>;

    /// The most recent entry.
    fn head(&self) -> Option<LogEntry>;
}
