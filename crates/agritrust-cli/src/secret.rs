//! # Proof Secret Arguments

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use agritrust_crypto::{KeyedHashScheme, ProofSecret};

/// Shared `--secret` flag, falling back to `AGRITRUST_PROOF_SECRET`.
#[derive(Args, Debug, Clone)]
pub struct SecretArgs {
    /// Proof secret shared with the ledger service.
    #[arg(long, env = "AGRITRUST_PROOF_SECRET", hide_env_values = true)]
    pub secret: String,
}

impl SecretArgs {
    pub fn scheme(&self) -> Result<Arc<KeyedHashScheme>> {
        let secret = ProofSecret::new(self.secret.as_bytes().to_vec())
            .context("invalid proof secret")?;
        Ok(Arc::new(KeyedHashScheme::new(secret)))
    }
}
