//! # Lookup Index
//!
//! Maps a consumer code to `{cid, vcDigest, batchId}`.
//!
//! A code moves through two states. [`LookupIndex::reserve_unique`] claims
//! an unused code atomically (generate, check, reserve under one lock), so
//! two submissions can never be handed the same code. A reservation is
//! invisible to [`LookupIndex::get`]. [`LookupIndex::put`] binds it, and from
//! then on the entry never changes. A submission that fails before binding
//! calls [`LookupIndex::release`].

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use agritrust_core::{BatchId, ContentDigest};

use crate::code::ConsumerCode;
use crate::error::IndexError;

/// What a bound code resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub cid: ContentDigest,
    pub vc_digest: ContentDigest,
    pub batch_id: BatchId,
}

/// Code-to-entry index with reservation.
pub trait LookupIndex: Send + Sync {
    /// Draw candidates from `generate` until one is unused, reserve it, and
    /// return it. Gives up after `max_attempts` draws.
    fn reserve_unique(
        &self,
        generate: &mut dyn FnMut() -> ConsumerCode,
        max_attempts: u32,
    ) -> Result<ConsumerCode, IndexError>;

    /// Drop a reservation. Bound codes are left alone.
    fn release(&self, code: &ConsumerCode);

    /// Bind `code` to `entry`. Re-binding identical values is a no-op;
    /// different values fail with [`IndexError::CodeCollision`].
    fn put(&self, code: &ConsumerCode, entry: IndexEntry) -> Result<(), IndexError>;

    /// The entry bound to `code`, if any.
    fn get(&self, code: &ConsumerCode) -> Option<IndexEntry>;

    /// Number of bound codes.
    fn len(&self) -> usize;

    /// Whether no codes are bound.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Reserved,
    Bound(IndexEntry),
}

/// In-memory [`LookupIndex`].
#[derive(Debug, Default)]
pub struct CodeIndex {
    slots: RwLock<HashMap<ConsumerCode, Slot>>,
}

impl CodeIndex {
    /// Empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// All bound codes with their entries.
    pub fn bound(&self) -> Vec<(ConsumerCode, IndexEntry)> {
        let mut out: Vec<_> = self
            .slots
            .read()
            .iter()
            .filter_map(|(code, slot)| match slot {
                Slot::Bound(entry) => Some((code.clone(), *entry)),
                Slot::Reserved => None,
            })
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

impl LookupIndex for CodeIndex {
    fn reserve_unique(
        &self,
        generate: &mut dyn FnMut() -> ConsumerCode,
        max_attempts: u32,
    ) -> Result<ConsumerCode, IndexError> {
        let mut slots = self.slots.write();
        for attempt in 1..=max_attempts {
            let candidate = generate();
            if !slots.contains_key(&candidate) {
                slots.insert(candidate.clone(), Slot::Reserved);
                tracing::debug!(code = %candidate, attempt, "consumer code reserved");
                return Ok(candidate);
            }
            tracing::debug!(code = %candidate, attempt, "consumer code taken, retrying");
        }
        tracing::warn!(max_attempts, "consumer code generation exhausted");
        Err(IndexError::CodeGenerationExhausted {
            attempts: max_attempts,
        })
    }

    fn release(&self, code: &ConsumerCode) {
        let mut slots = self.slots.write();
        if slots.get(code) == Some(&Slot::Reserved) {
            slots.remove(code);
        }
    }

    fn put(&self, code: &ConsumerCode, entry: IndexEntry) -> Result<(), IndexError> {
        let mut slots = self.slots.write();
        match slots.get(code) {
            Some(Slot::Bound(existing)) if *existing == entry => Ok(()),
            Some(Slot::Bound(_)) => Err(IndexError::CodeCollision {
                code: code.to_string(),
            }),
            Some(Slot::Reserved) | None => {
                slots.insert(code.clone(), Slot::Bound(entry));
                Ok(())
            }
        }
    }

    fn get(&self, code: &ConsumerCode) -> Option<IndexEntry> {
        match self.slots.read().get(code) {
            Some(Slot::Bound(entry)) => Some(*entry),
            _ => None,
        }
    }

    fn len(&self) -> usize {
        self.slots
            .read()
            .values()
            .filter(|s| matches!(s, Slot::Bound(_)))
            .count()
    }
}
