use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use slabtax_core::TaxPolicy;
use slabtax_policy::PolicyLoader;

/// Validate a tax policy file and print its slab table.
///
/// Without `--file` the built-in reference policy is checked. A CSV slab
/// table (columns `lower_bound,upper_bound,rate`) may replace the slabs of
/// the policy.
#[derive(Parser, Debug)]
#[command(name = "slabtax-policy-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a TOML policy file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to a CSV slab table overriding the policy's slabs
    #[arg(short, long)]
    slabs: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let policy = match &args.file {
        Some(path) => PolicyLoader::load_file(path)
            .with_context(|| format!("Failed to load policy: {}", path.display()))?,
        None => TaxPolicy::reference(),
    };

    let policy = match &args.slabs {
        Some(path) => {
            let slabs = PolicyLoader::load_slabs_file(path)
                .with_context(|| format!("Failed to read slabs: {}", path.display()))?;
            PolicyLoader::with_slabs(policy, slabs)
                .with_context(|| format!("Slab table is invalid: {}", path.display()))?
        }
        None => policy,
    };

    println!("Policy is valid.");
    println!("Standard deduction: {}", policy.standard_deduction);
    println!("Rebate up to taxable income: {}", policy.rebate_threshold);
    println!(
        "Cess: {} above {}",
        policy.cess_rate, policy.cess_threshold
    );
    println!(
        "Surcharge: {} above {}",
        policy.surcharge_rate, policy.surcharge_threshold
    );
    println!("Slabs:");
    for slab in &policy.slabs {
        match slab.upper_bound {
            Some(upper) => println!("  {} - {} @ {}", slab.lower_bound, upper, slab.rate),
            None => println!("  {}+ @ {}", slab.lower_bound, slab.rate),
        }
    }

    Ok(())
}
