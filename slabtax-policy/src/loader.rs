//! Loading of [`TaxPolicy`] configuration from TOML files and CSV slab tables.
//!
//! ## TOML format
//!
//! Field names mirror [`TaxPolicy`]. Amounts may be integers or quoted
//! decimals; rates are quoted decimals so they stay exact.
//!
//! ```toml
//! standard_deduction = 75000
//! rebate_threshold = 1200000
//! cess_threshold = 1300000
//! cess_rate = "0.04"
//! surcharge_threshold = 6000000
//! surcharge_rate = "0.10"
//!
//! [[slabs]]
//! lower_bound = 0
//! upper_bound = 400000
//! rate = "0"
//!
//! [[slabs]]
//! lower_bound = 400000
//! rate = "0.05"
//! ```
//!
//! Omitting `upper_bound` marks the open-ended top slab.
//!
//! ## CSV format
//!
//! | Column | Required | Notes |
//! |---------------|----------|------------------------------------|
//! | `lower_bound` | yes | decimal |
//! | `upper_bound` | yes | decimal, leave empty for unbounded |
//! | `rate` | yes | decimal fraction, e.g. `0.05` |
//!
//! Every policy returned by this module has passed [`TaxPolicy::validate`].

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use slabtax_core::{PolicyError, SlabRule, TaxPolicy};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading policy data.
#[derive(Debug, Error)]
pub enum PolicyLoaderError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("invalid policy: {0}")]
    Policy(#[from] PolicyError),
}

impl From<csv::Error> for PolicyLoaderError {
    fn from(err: csv::Error) -> Self {
        PolicyLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of a slab CSV table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SlabRecord {
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl From<SlabRecord> for SlabRule {
    fn from(record: SlabRecord) -> Self {
        SlabRule::new(record.lower_bound, record.upper_bound, record.rate)
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for tax policy configuration.
pub struct PolicyLoader;

impl PolicyLoader {
    /// Parses and validates a policy from TOML text.
    pub fn from_toml_str(text: &str) -> Result<TaxPolicy, PolicyLoaderError> {
        let policy: TaxPolicy = toml::from_str(text)?;
        policy.validate()?;
        debug!(slabs = policy.slabs.len(), "parsed policy from TOML");
        Ok(policy)
    }

    /// Reads, parses and validates a TOML policy file.
    pub fn load_file(path: &Path) -> Result<TaxPolicy, PolicyLoaderError> {
        let text = std::fs::read_to_string(path).map_err(|source| PolicyLoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let policy = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "loaded tax policy");
        Ok(policy)
    }

    /// Parses slab rows from a CSV reader, in file order.
    ///
    /// The rows are not validated on their own; combine them with a policy
    /// through [`PolicyLoader::with_slabs`].
    pub fn parse_slabs<R: Read>(reader: R) -> Result<Vec<SlabRule>, PolicyLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut slabs = Vec::new();

        for result in csv_reader.deserialize() {
            let record: SlabRecord = result?;
            slabs.push(record.into());
        }

        Ok(slabs)
    }

    /// Reads slab rows from a CSV file.
    pub fn load_slabs_file(path: &Path) -> Result<Vec<SlabRule>, PolicyLoaderError> {
        let file = File::open(path).map_err(|source| PolicyLoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let slabs = Self::parse_slabs(file)?;
        info!(path = %path.display(), count = slabs.len(), "loaded slab table");
        Ok(slabs)
    }

    /// Replaces the slabs of `policy` and validates the result.
    pub fn with_slabs(
        policy: TaxPolicy,
        slabs: Vec<SlabRule>,
    ) -> Result<TaxPolicy, PolicyLoaderError> {
        let policy = TaxPolicy { slabs, ..policy };
        policy.validate()?;
        Ok(policy)
    }
}
