//! # Service Configuration
//!
//! Loaded once at startup from environment variables:
//!
//! | Variable                    | Default       |
//! |-----------------------------|---------------|
//! | `AGRITRUST_PORT`            | `8080`        |
//! | `AGRITRUST_PROOF_SECRET`    | dev secret    |
//! | `AGRITRUST_CODE_PREFIX`     | `AGRITRUST`   |
//! | `AGRITRUST_CODE_ATTEMPTS`   | `16`          |
//! | `AGRITRUST_LOG_DUPLICATES`  | `reject`      |
//! | `AGRITRUST_METRICS_ENABLED` | `true`        |
//! | `AGRITRUST_LOG_FORMAT`      | text (`json`) |

use agritrust_log::DuplicatePolicy;
use agritrust_registry::{LedgerConfig, DEFAULT_CODE_ATTEMPTS, DEFAULT_CODE_PREFIX};

/// Secret used when `AGRITRUST_PROOF_SECRET` is unset. Development only.
pub const DEV_PROOF_SECRET: &str = "agritrust-development-secret";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub proof_secret: Vec<u8>,
    /// True when `proof_secret` is [`DEV_PROOF_SECRET`].
    pub dev_secret: bool,
    pub ledger: LedgerConfig,
    pub metrics_enabled: bool,
    pub json_logs: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("proof_secret", &"[REDACTED]")
            .field("dev_secret", &self.dev_secret)
            .field("ledger", &self.ledger)
            .field("metrics_enabled", &self.metrics_enabled)
            .field("json_logs", &self.json_logs)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            proof_secret: DEV_PROOF_SECRET.as_bytes().to_vec(),
            dev_secret: true,
            ledger: LedgerConfig::default(),
            metrics_enabled: true,
            json_logs: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = parse_var(&lookup, "AGRITRUST_PORT", defaults.port)?;
        let (proof_secret, dev_secret) = match lookup("AGRITRUST_PROOF_SECRET") {
            Some(s) if !s.is_empty() => (s.into_bytes(), false),
            _ => (defaults.proof_secret, true),
        };
        let code_prefix = lookup("AGRITRUST_CODE_PREFIX")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CODE_PREFIX.to_string());
        let max_code_attempts =
            parse_var(&lookup, "AGRITRUST_CODE_ATTEMPTS", DEFAULT_CODE_ATTEMPTS)?;
        let duplicate_policy =
            parse_var(&lookup, "AGRITRUST_LOG_DUPLICATES", DuplicatePolicy::Reject)?;
        let metrics_enabled = lookup("AGRITRUST_METRICS_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);
        let json_logs = lookup("AGRITRUST_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            port,
            proof_secret,
            dev_secret,
            ledger: LedgerConfig {
                code_prefix,
                max_code_attempts,
                duplicate_policy,
            },
            metrics_enabled,
            json_logs,
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.port, 8080);
        assert!(cfg.dev_secret);
        assert_eq!(cfg.ledger, LedgerConfig::default());
        assert!(cfg.metrics_enabled);
        assert!(!cfg.json_logs);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("AGRITRUST_PORT", "9000"),
            ("AGRITRUST_PROOF_SECRET", "a-much-longer-secret"),
            ("AGRITRUST_CODE_PREFIX", "FARM"),
            ("AGRITRUST_CODE_ATTEMPTS", "4"),
            ("AGRITRUST_LOG_DUPLICATES", "allow"),
            ("AGRITRUST_METRICS_ENABLED", "FALSE"),
            ("AGRITRUST_LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 9000);
        assert!(!cfg.dev_secret);
        assert_eq!(cfg.proof_secret, b"a-much-longer-secret");
        assert_eq!(cfg.ledger.code_prefix, "FARM");
        assert_eq!(cfg.ledger.max_code_attempts, 4);
        assert_eq!(cfg.ledger.duplicate_policy, DuplicatePolicy::Allow);
        assert!(!cfg.metrics_enabled);
        assert!(cfg.json_logs);
    }

    #[test]
    fn bad_port_is_reported() {
        let err = AppConfig::from_lookup(lookup(&[("AGRITRUST_PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("AGRITRUST_PORT"));
    }

    #[test]
    fn debug_redacts_secret() {
        let cfg = AppConfig::default();
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains(DEV_PROOF_SECRET));
        assert!(dbg.contains("[REDACTED]"));
    }
}
