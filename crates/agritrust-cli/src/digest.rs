//! # Digest Subcommand
//!
//! Prints the content digest of a JSON file:
//!
//! ```bash
//! agritrust digest batch.json
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use agritrust_core::compute_digest;

use crate::EXIT_OK;

#[derive(Args, Debug)]
pub struct DigestArgs {
    /// JSON document to hash.
    pub file: PathBuf,
}

pub fn run_digest(args: &DigestArgs, out: &mut dyn Write) -> Result<u8> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let doc: Value = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {} as JSON", args.file.display()))?;
    let cid = compute_digest(&doc).context("canonicalizing document")?;
    writeln!(out, "{cid}")?;
    Ok(EXIT_OK)
}
