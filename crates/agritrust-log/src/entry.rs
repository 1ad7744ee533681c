//! # Log Entries

use serde::{Deserialize, Serialize};

use agritrust_core::{ContentDigest, Timestamp};

/// One record in the transparency log.
///
/// `index` is the log length at append time. `previous_hash` is the
/// preceding entry's `digest`, or `None` for the genesis entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Position in the log.
    pub index: u64,
    /// The credential digest (vcDigest) this entry records.
    pub digest: ContentDigest,
    /// Digest of the previous entry. Serialized as `null` for genesis.
    pub previous_hash: Option<ContentDigest>,
    /// When the entry was appended.
    pub timestamp: Timestamp,
    /// Content digest the credential covers.
    pub cid: ContentDigest,
}

/// Result of [`crate::TransparencyLog::check_consistency`].
///
/// `consistent` implies `exists`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyCheck {
    /// A log entry records the digest.
    pub exists: bool,
    /// That entry's `cid` equals the expected one.
    pub consistent: bool,
}

impl ConsistencyCheck {
    /// The digest is not in the log.
    pub const ABSENT: Self = Self {
        exists: false,
        consistent: false,
    };

    /// Compare a found entry against the expected CID.
    pub fn of(entry: Option<&LogEntry>, expected_cid: &ContentDigest) -> Self {
        match entry {
            None => Self::ABSENT,
            Some(e) => Self {
                exists: true,
                consistent: e.cid == *expected_cid,
            },
        }
    }
}
