//! # Hash-Chain Log
//!
//! In-memory [`TransparencyLog`] holding a flat, singly-linked sequence of
//! entries. Each append runs inside one write-lock critical section that
//! reads the length, takes the head digest as `previousHash`, and pushes the
//! new entry. Concurrent appends therefore never share an index and never
//! fork the chain.
//!
//! The lock is `parking_lot::RwLock`: it does not poison, and it is never
//! held across an `.await`.

use std::collections::HashMap;
use std::str::FromStr;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use agritrust_core::{ContentDigest, Timestamp};

use crate::audit::{audit_chain, ChainAudit};
use crate::entry::LogEntry;
use crate::error::LogError;
use crate::TransparencyLog;

/// What to do when an appended digest is already in the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with [`LogError::DuplicateDigest`].
    #[default]
    Reject,
    /// Append anyway. `exists` returns the first match.
    Allow,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "allow" => Ok(Self::Allow),
            other => Err(format!("unknown duplicate policy {other:?}, expected reject|allow")),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<LogEntry>,
    // digest -> index of first entry recording it
    first_seen: HashMap<ContentDigest, u64>,
}

impl Inner {
    fn from_entries(entries: Vec<LogEntry>) -> Self {
        let mut first_seen = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            first_seen.entry(entry.digest).or_insert(position as u64);
        }
        Self {
            entries,
            first_seen,
        }
    }
}

/// Append-only hash-chained log.
#[derive(Debug, Default)]
pub struct HashChainLog {
    inner: RwLock<Inner>,
    policy: DuplicatePolicy,
}

impl HashChainLog {
    /// Empty log rejecting duplicate digests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty log with the given duplicate policy.
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            policy,
        }
    }

    /// Restore a persisted log as-is.
    ///
    /// Entries are not re-linked or validated; run [`HashChainLog::audit`]
    /// to find corruption.
    pub fn from_entries(entries: Vec<LogEntry>, policy: DuplicatePolicy) -> Self {
        Self {
            inner: RwLock::new(Inner::from_entries(entries)),
            policy,
        }
    }

    /// The configured duplicate policy.
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Append with an explicit timestamp.
    pub fn append_at(
        &self,
        vc_digest: ContentDigest,
        cid: ContentDigest,
        timestamp: Timestamp,
    ) -> Result<u64, LogError> {
        let mut inner = self.inner.write();

        if self.policy == DuplicatePolicy::Reject {
            if let Some(&index) = inner.first_seen.get(&vc_digest) {
                tracing::warn!(digest = %vc_digest, index, "duplicate digest rejected");
                return Err(LogError::DuplicateDigest {
                    digest: vc_digest,
                    index,
                });
            }
        }

        let index = inner.entries.len() as u64;
        let previous_hash = inner.entries.last().map(|e| e.digest);
        inner.entries.push(LogEntry {
            index,
            digest: vc_digest,
            previous_hash,
            timestamp,
            cid,
        });
        inner.first_seen.entry(vc_digest).or_insert(index);
        drop(inner);

        tracing::info!(index, digest = %vc_digest, cid = %cid, "log entry appended");
        Ok(index)
    }

    /// Audit the live log's linkage.
    pub fn audit(&self) -> ChainAudit {
        audit_chain(&self.inner.read().entries)
    }

    /// Entry at an index.
    pub fn get(&self, index: u64) -> Option<LogEntry> {
        let inner = self.inner.read();
        usize::try_from(index)
            .ok()
            .and_then(|i| inner.entries.get(i))
            .cloned()
    }
}

impl TransparencyLog for HashChainLog {
    fn append(&self, vc_digest: ContentDigest, cid: ContentDigest) -> Result<u64, LogError> {
        self.append_at(vc_digest, cid, Timestamp::now())
    }

    fn exists(&self, vc_digest: &ContentDigest) -> Option<LogEntry> {
        let inner = self.inner.read();
        let index = *inner.first_seen.get(vc_digest)?;
        inner.entries.get(index as usize).cloned()
    }

    fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    fn entries(&self) -> Vec<LogEntry> {
        self.inner.read().entries.clone()
    }

    fn head(&self) -> Option<LogEntry> {
        self.inner.read().entries.last().cloned()
    }
}
