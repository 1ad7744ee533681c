//! # Credential Subcommands
//!
//! ```bash
//! agritrust issue --cid <hex> --farmer <id> --batch <uuid> > vc.json
//! agritrust verify vc.json
//! ```
//!
//! `issue` prints `{ "credential": …, "vcDigest": … }`. `verify` accepts
//! either that envelope or a bare credential.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{json, Value};

use agritrust_core::{BatchId, ContentDigest, FarmerId, Timestamp};
use agritrust_vc::{Credential, CredentialIssuer, CredentialVerifier};

use crate::secret::SecretArgs;
use crate::{EXIT_OK, EXIT_REJECTED};

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Content digest the credential attests to (64 hex chars).
    #[arg(long)]
    pub cid: String,

    /// Issuing farmer id.
    #[arg(long)]
    pub farmer: String,

    /// Batch UUID.
    #[arg(long)]
    pub batch: String,

    /// Issuance time (RFC 3339, UTC). Defaults to now.
    #[arg(long)]
    pub created: Option<String>,

    #[command(flatten)]
    pub secret: SecretArgs,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Credential JSON file.
    pub file: PathBuf,

    #[command(flatten)]
    pub secret: SecretArgs,
}

pub fn run_issue(args: &IssueArgs, out: &mut dyn Write) -> Result<u8> {
    let cid = ContentDigest::from_hex(&args.cid).context("--cid")?;
    let farmer = FarmerId::new(args.farmer.clone()).context("--farmer")?;
    let batch = BatchId::parse(&args.batch).context("--batch")?;
    let created = match &args.created {
        Some(raw) => Timestamp::parse_lenient(raw).context("--created")?,
        None => Timestamp::now(),
    };

    let issuer = CredentialIssuer::new(args.secret.scheme()?);
    let issued = issuer
        .issue_credential_at(cid, &farmer, batch, created)
        .context("issuing credential")?;

    let envelope = json!({
        "credential": issued.credential,
        "vcDigest": issued.vc_digest,
    });
    writeln!(out, "{}", serde_json::to_string_pretty(&envelope)?)?;
    Ok(EXIT_OK)
}

pub fn run_verify(args: &VerifyArgs, out: &mut dyn Write) -> Result<u8> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let mut doc: Value = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {} as JSON", args.file.display()))?;
    if let Some(inner) = doc.get_mut("credential") {
        doc = inner.take();
    }

    let verifier = CredentialVerifier::new(args.secret.scheme()?);
    if !verifier.verify_credential_value(&doc) {
        let reason = serde_json::from_value::<Credential>(doc)
            .map_err(|e| e.to_string())
            .and_then(|vc| verifier.check(&vc).map_err(|e| e.to_string()))
            .err()
            .unwrap_or_else(|| "missing required fields".to_string());
        writeln!(out, "invalid: {reason}")?;
        return Ok(EXIT_REJECTED);
    }

    let vc: Credential = serde_json::from_value(doc)?;
    writeln!(out, "valid")?;
    writeln!(out, "vcDigest: {}", vc.digest()?)?;
    Ok(EXIT_OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "cli-test-proof-secret";

    fn secret() -> SecretArgs {
        SecretArgs {
            secret: SECRET.into(),
        }
    }

    fn issue_args() -> IssueArgs {
        IssueArgs {
            cid: "ab".repeat(32),
            farmer: "20230115-greenacres-1234".into(),
            batch: "2f1c7f0e-8d4a-4f5e-9c6b-1a2b3c4d5e6f".into(),
            created: Some("2024-06-02T12:00:00Z".into()),
            secret: secret(),
        }
    }

    fn issue_to_file(dir: &tempfile::TempDir) -> PathBuf {
        let mut out = Vec::new();
        assert_eq!(run_issue(&issue_args(), &mut out).unwrap(), EXIT_OK);
        let path = dir.path().join("vc.json");
        std::fs::write(&path, &out).unwrap();
        path
    }

    #[test]
    fn issue_is_deterministic_for_fixed_created() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        run_issue(&issue_args(), &mut a).unwrap();
        run_issue(&issue_args(), &mut b).unwrap();
        assert_eq!(a, b);

        let doc: Value = serde_json::from_slice(&a).unwrap();
        assert_eq!(doc["credential"]["credentialSubject"]["cid"], "ab".repeat(32));
        assert_eq!(doc["vcDigest"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn issued_credential_verifies() {
        let dir = tempfile::tempdir().unwrap();
        let file = issue_to_file(&dir);
        let mut out = Vec::new();
        let code = run_verify(&VerifyArgs { file, secret: secret() }, &mut out).unwrap();
        assert_eq!(code, EXIT_OK);
        assert!(String::from_utf8(out).unwrap().starts_with("valid"));
    }

    #[test]
    fn created_flag_accepts_offsets() {
        let mut args = issue_args();
        args.created = Some("2024-06-02T14:00:00.250+02:00".into());
        let mut out = Vec::new();
        run_issue(&args, &mut out).unwrap();
        let doc: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["credential"]["proof"]["created"], "2024-06-02T12:00:00Z");
    }

    #[test]
    fn respelled_created_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = issue_to_file(&dir);
        let raw = std::fs::read_to_string(&file).unwrap();
        std::fs::write(&file, raw.replace("2024-06-02T12:00:00Z", "2024-06-02T12:00:00.999Z"))
            .unwrap();
        let mut out = Vec::new();
        let code = run_verify(&VerifyArgs { file, secret: secret() }, &mut out).unwrap();
        assert_eq!(code, EXIT_REJECTED);
        assert!(String::from_utf8(out).unwrap().starts_with("invalid"));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = issue_to_file(&dir);
        let mut out = Vec::new();
        let args = VerifyArgs {
            file,
            secret: SecretArgs {
                secret: "a-different-proof-secret".into(),
            },
        };
        assert_eq!(run_verify(&args, &mut out).unwrap(), EXIT_REJECTED);
        assert!(String::from_utf8(out).unwrap().starts_with("invalid"));
    }

    #[test]
    fn incomplete_document_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("vc.json");
        std::fs::write(&file, r#"{"issuer": "did:agritrust:farmer:x"}"#).unwrap();
        let mut out = Vec::new();
        let code = run_verify(&VerifyArgs { file, secret: secret() }, &mut out).unwrap();
        assert_eq!(code, EXIT_REJECTED);
    }

    #[test]
    fn bad_cid_is_an_error() {
        let args = IssueArgs {
            cid: "xyz".into(),
            ..issue_args()
        };
        assert!(run_issue(&args, &mut Vec::new()).is_err());
    }

    #[test]
    fn short_secret_is_an_error() {
        let args = IssueArgs {
            secret: SecretArgs { secret: "short".into() },
            ..issue_args()
        };
        assert!(run_issue(&args, &mut Vec::new()).is_err());
    }
}
