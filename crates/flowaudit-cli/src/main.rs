//! `flowaudit` -- CLI binary for the flowaudit workflow risk auditor.
//!
//! Provides the following subcommands:
//!
//! - `flowaudit audit` -- Audit exported workflows and print the risk reports.
//! - `flowaudit categories` -- List risk categories and the sections they emit.
//!
//! Exit status is 0 for a clean audit, 1 when findings were reported, and 2
//! on errors (including argument errors reported by clap).

use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;
mod config_loader;

/// flowaudit workflow risk auditor.
#[derive(Parser)]
#[command(name = "flowaudit", about = "Static risk audit for automation workflows", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Audit a workflow export file or directory.
    Audit(commands::audit::AuditArgs),

    /// List risk categories and their sections.
    Categories,
}

/// Exit status when the audit produced at least one report.
const EXIT_FINDINGS: u8 = 1;
/// Exit status when the command failed before producing a result.
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(true) => ExitCode::from(EXIT_FINDINGS),
        Ok(false) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Dispatch a subcommand. `Ok(true)` means findings were reported.
fn run(command: Commands) -> anyhow::Result<bool> {
    match command {
        Commands::Audit(args) => commands::audit::run(args),
        Commands::Categories => {
            commands::categories::run();
            Ok(false)
        }
    }
}
