//! # agritrust-cli — Offline Ledger Tooling
//!
//! Lets an auditor or integrator reproduce ledger computations without a
//! running service.
//!
//! ## Subcommands
//!
//! - `digest` — content digest of a JSON document
//! - `issue` — issue a provenance credential for a CID
//! - `verify` — check a credential's proof
//! - `audit` — audit an exported transparency log
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers write to a caller-supplied writer and return an exit code.
//!   Errors are `anyhow` and exit with 1; a negative verdict exits with 2.

pub mod audit;
pub mod credential;
pub mod digest;
pub mod secret;

/// Exit code for a successful check.
pub const EXIT_OK: u8 = 0;
/// Exit code when a verification or audit fails.
pub const EXIT_REJECTED: u8 = 2;
