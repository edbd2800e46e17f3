use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use slabtax_core::{TaxEngine, TaxPolicy};
use slabtax_policy::PolicyLoader;
use tracing::{debug, info};

use crate::csv_loader::{self, IncomeRecord};
use crate::report::{self, ComputationReport};
use crate::utils::parse_amount;

/// How results are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Resolves the policy for this run.
///
/// `policy_file` wins over the built-in reference policy; `slabs_file`
/// replaces the slabs of whichever policy was chosen.
pub fn load_policy(
    policy_file: Option<&Path>,
    slabs_file: Option<&Path>,
) -> Result<TaxPolicy> {
    let policy = match policy_file {
        Some(path) => PolicyLoader::load_file(path)
            .with_context(|| format!("Failed to load policy: {}", path.display()))?,
        None => {
            debug!("using built-in reference policy");
            TaxPolicy::reference()
        }
    };

    match slabs_file {
        Some(path) => {
            let slabs = PolicyLoader::load_slabs_file(path)
                .with_context(|| format!("Failed to read slabs: {}", path.display()))?;
            PolicyLoader::with_slabs(policy, slabs)
                .with_context(|| format!("Slab table is invalid: {}", path.display()))
        }
        None => Ok(policy),
    }
}

/// Computes and writes a single income given as raw user input.
pub fn run_single<W: Write>(
    policy: &TaxPolicy,
    income: &str,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let engine = TaxEngine::new(policy).context("Tax policy is invalid")?;
    let gross_income = parse_amount(income)?;

    let result = engine
        .compute(gross_income)
        .with_context(|| format!("Failed to compute tax for {gross_income}"))?;
    info!(%gross_income, total_tax = %result.total_tax, "computed tax");

    let report = ComputationReport::new(None, result);
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
        OutputFormat::Table => {
            writeln!(out, "{}", report::render_summary(&report))?;
            match report::render_breakdown(&report.result.bracket_contributions) {
                Some(table) => writeln!(out, "{table}")?,
                None if report.result.rebated => {
                    writeln!(out, "No tax payable: taxable income is within the rebate limit.")?
                }
                None => {}
            }
        }
    }

    Ok(())
}

/// Computes every record and writes one report covering all of them.
pub fn run_batch<W: Write>(
    policy: &TaxPolicy,
    records: &[IncomeRecord],
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let engine = TaxEngine::new(policy).context("Tax policy is invalid")?;

    let reports = records
        .iter()
        .map(|record| {
            let result = engine
                .compute(record.gross_income)
                .with_context(|| format!("Failed to compute tax for '{}'", record.label))?;
            Ok(ComputationReport::new(Some(record.label.clone()), result))
        })
        .collect::<Result<Vec<_>>>()?;
    info!(count = reports.len(), "computed batch");

    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&reports)?)?,
        OutputFormat::Table => writeln!(out, "{}", report::render_batch(&reports))?,
    }

    Ok(())
}

/// Loads a batch CSV and runs it.
pub fn run_batch_file<W: Write>(
    policy: &TaxPolicy,
    path: &Path,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let records = csv_loader::load_from_file(path)
        .with_context(|| format!("Failed to load incomes: {}", path.display()))?;
    run_batch(policy, &records, format, out)
}
