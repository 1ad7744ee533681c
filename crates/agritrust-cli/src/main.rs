//! # agritrust CLI entry point

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use agritrust_cli::audit::{run_audit, AuditArgs};
use agritrust_cli::credential::{run_issue, run_verify, IssueArgs, VerifyArgs};
use agritrust_cli::digest::{run_digest, DigestArgs};

/// AgriTrust offline tooling.
#[derive(Parser, Debug)]
#[command(name = "agritrust", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Content digest of a JSON document.
    Digest(DigestArgs),
    /// Issue a provenance credential for a CID.
    Issue(IssueArgs),
    /// Verify a credential's proof.
    Verify(VerifyArgs),
    /// Audit an exported transparency log.
    Audit(AuditArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();
    let result = match &cli.command {
        Commands::Digest(args) => run_digest(args, &mut stdout),
        Commands::Issue(args) => run_issue(args, &mut stdout),
        Commands::Verify(args) => run_verify(args, &mut stdout),
        Commands::Audit(args) => run_audit(args, &mut stdout),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
