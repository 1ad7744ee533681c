//! # Application State
//!
//! Shared state handed to every route handler: the ledger and the loaded
//! configuration. Cheap to clone.

use std::sync::Arc;

use agritrust_crypto::{KeyedHashScheme, ProofSecret};
use agritrust_registry::{Ledger, Stores};

use crate::config::AppConfig;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("proof secret rejected: {0}")]
    Secret(#[from] agritrust_crypto::CryptoError),
    #[error("ledger configuration rejected: {0}")]
    Ledger(#[from] agritrust_registry::IndexError),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// In-memory ledger built from `config`.
    pub fn from_config(config: AppConfig) -> Result<Self, StateError> {
        let scheme = Arc::new(KeyedHashScheme::new(ProofSecret::new(
            config.proof_secret.clone(),
        )?));
        let ledger = Ledger::new(&config.ledger, Stores::in_memory(), scheme.clone(), scheme)?;
        Ok(Self::with_ledger(Arc::new(ledger), config))
    }

    /// Wrap an already built ledger.
    pub fn with_ledger(ledger: Arc<Ledger>, config: AppConfig) -> Self {
        Self {
            ledger,
            config: Arc::new(config),
        }
    }
}
