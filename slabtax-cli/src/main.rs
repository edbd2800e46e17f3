use std::io;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tracing::debug;

use slabtax_cli::app::{self, OutputFormat};
use slabtax_cli::logging;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Progressive slab income tax calculator.
///
/// Computes tax for one gross income, or for every row of a batch CSV,
/// under the reference policy or a policy loaded from a TOML file.
#[derive(Debug, Parser)]
#[command(name = "slabtax", version, about)]
struct Cli {
    /// Gross annual income, e.g. `1500000` or `15,00,000`. Blank means 0.
    #[arg(conflicts_with = "batch")]
    income: Option<String>,

    /// TOML policy file. Defaults to the built-in reference policy.
    #[arg(long, env = "SLABTAX_POLICY")]
    policy: Option<PathBuf>,

    /// CSV slab table (`lower_bound,upper_bound,rate`) replacing the policy's slabs.
    #[arg(long)]
    slabs: Option<PathBuf>,

    /// CSV of incomes (`label,gross_income`) to compute in one run.
    #[arg(long)]
    batch: Option<PathBuf>,

    /// Emit JSON instead of tables.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Also append log records to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.log_file.as_deref())?;
    debug!(?cli, "parsed arguments");

    let policy = app::load_policy(cli.policy.as_deref(), cli.slabs.as_deref())?;
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    let mut out = io::stdout().lock();
    match &cli.batch {
        Some(path) => app::run_batch_file(&policy, path, format, &mut out),
        None => app::run_single(&policy, cli.income.as_deref().unwrap_or(""), format, &mut out),
    }
}
