//! # Audit Subcommand
//!
//! Audits an exported transparency log. The file is either a JSON array of
//! entries or the `GET /v1/log` response body.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;

use agritrust_log::{audit_chain, LogEntry};

use crate::{EXIT_OK, EXIT_REJECTED};

#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Exported log JSON file.
    pub file: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LogExport {
    Entries(Vec<LogEntry>),
    View { entries: Vec<LogEntry> },
}

pub fn run_audit(args: &AuditArgs, out: &mut dyn Write) -> Result<u8> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let export: LogExport = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {} as a log export", args.file.display()))?;
    let entries = match export {
        LogExport::Entries(entries) | LogExport::View { entries } => entries,
    };

    let report = audit_chain(&entries);
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    if report.ok {
        Ok(EXIT_OK)
    } else {
        tracing::warn!(faults = report.faults.len(), "log audit failed");
        Ok(EXIT_REJECTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agritrust_core::{ContentDigest, Timestamp};
    use agritrust_log::{HashChainLog, TransparencyLog};

    fn export(log: &HashChainLog) -> String {
        serde_json::to_string(&log.entries()).unwrap()
    }

    fn filled_log() -> HashChainLog {
        let log = HashChainLog::new();
        let ts = Timestamp::parse("2024-06-02T12:00:00Z").unwrap();
        for i in 1..=3u8 {
            log.append_at(
                ContentDigest::from_bytes([i; 32]),
                ContentDigest::from_bytes([i + 100; 32]),
                ts,
            )
            .unwrap();
        }
        log
    }

    fn audit_text(contents: &str) -> (u8, String) {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("log.json");
        std::fs::write(&file, contents).unwrap();
        let mut out = Vec::new();
        let code = run_audit(&AuditArgs { file }, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn intact_export_passes() {
        let (code, text) = audit_text(&export(&filled_log()));
        assert_eq!(code, EXIT_OK);
        assert!(text.contains("\"ok\": true"));
    }

    #[test]
    fn api_view_shape_is_accepted() {
        let entries = export(&filled_log());
        let (code, _) = audit_text(&format!(r#"{{"length": 3, "head": null, "entries": {entries}}}"#));
        assert_eq!(code, EXIT_OK);
    }

    #[test]
    fn removed_entry_breaks_the_chain() {
        let mut entries = filled_log().entries();
        entries.remove(1);
        let (code, text) = audit_text(&serde_json::to_string(&entries).unwrap());
        assert_eq!(code, EXIT_REJECTED);
        assert!(text.contains("\"ok\": false"));
    }
}
