//! # Consumer Codes
//!
//! The short key printed on packaging: `{PREFIX}-{YYMMDD}-{NNNN}`, for
//! example `AGRITRUST-240602-0417`. The date is the submission date; the
//! four digits are random. Uniqueness is enforced by the lookup index, not
//! by the generator.

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::IndexError;

/// Default issuer prefix.
pub const DEFAULT_CODE_PREFIX: &str = "AGRITRUST";

/// A validated consumer code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConsumerCode(String);

impl ConsumerCode {
    /// Parse `{PREFIX}-{6 digits}-{4 digits}`. The prefix is upper-case
    /// ASCII letters and digits.
    pub fn parse(s: &str) -> Result<Self, IndexError> {
        let invalid = || IndexError::InvalidCode(s.to_string());
        let mut parts = s.rsplitn(3, '-');
        let (Some(serial), Some(date), Some(prefix)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        if !is_valid_prefix(prefix) || !all_digits(date, 6) || !all_digits(serial, 4) {
            return Err(invalid());
        }
        Ok(Self(s.to_string()))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConsumerCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ConsumerCode {
    type Error = IndexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ConsumerCode> for String {
    fn from(code: ConsumerCode) -> Self {
        code.0
    }
}

fn is_valid_prefix(prefix: &str) -> bool {
    !prefix.is_empty()
        && prefix
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

fn all_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// Produces candidate codes from a date and an RNG.
#[derive(Debug)]
pub struct CodeGenerator<R> {
    prefix: String,
    rng: R,
}

impl<R: Rng> CodeGenerator<R> {
    /// A generator for `prefix`. Rejects prefixes a code could not carry.
    pub fn new(prefix: impl Into<String>, rng: R) -> Result<Self, IndexError> {
        let prefix = prefix.into();
        if !is_valid_prefix(&prefix) {
            return Err(IndexError::InvalidCode(format!(
                "prefix must be upper-case letters and digits, got {prefix:?}"
            )));
        }
        Ok(Self { prefix, rng })
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// One candidate code for `date`.
    pub fn generate(&mut self, date: NaiveDate) -> ConsumerCode {
        let serial: u16 = self.rng.gen_range(0..10_000);
        ConsumerCode(format!("{}-{}-{serial:04}", self.prefix, date.format("%y%m%d")))
    }
}
