//! CSV loader for batch income input.
//!
//! ## CSV Format
//!
//! Headers are matched by name; column order does not matter.
//!
//! | Column         | Required | Type    | Notes                                         |
//! |----------------|----------|---------|-----------------------------------------------|
//! | `label`        | yes      | string  | Free text shown in the report; may be empty    |
//! | `gross_income` | yes      | amount  | Commas allowed (`"15,00,000"`); empty means 0  |
//!
//! ```csv
//! label,gross_income
//! intern,300000
//! engineer,"15,00,000"
//! director,7000000
//! ```
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::utils::{ParseAmountError, parse_amount};

#[derive(Debug, Deserialize)]
struct CsvRow {
    label: String,
    gross_income: String,
}

/// One income to compute tax for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeRecord {
    pub label: String,
    pub gross_income: Decimal,
}

/// Errors that can occur while loading batch income data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The file could not be opened.
    #[error("cannot open '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The underlying CSV deserialisation failed (bad structure, missing
    /// column, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A `gross_income` cell was not a usable amount. `row` is 1-based,
    /// counting data rows only.
    #[error("row {row}: {source}")]
    InvalidAmount {
        row: usize,
        #[source]
        source: ParseAmountError,
    },
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<IncomeRecord, CsvLoadError> {
    let gross_income =
        parse_amount(&row.gross_income).map_err(|source| CsvLoadError::InvalidAmount {
            row: row_number,
            source,
        })?;

    Ok(IncomeRecord {
        label: row.label.trim().to_string(),
        gross_income,
    })
}

/// Loads income records from any reader.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Vec<IncomeRecord>, CsvLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    csv_reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(i, result)| convert_row(result?, i + 1))
        .collect()
}

/// Loads income records from a CSV file on disk.
pub fn load_from_file(path: &Path) -> Result<Vec<IncomeRecord>, CsvLoadError> {
    let file = File::open(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let records = load_from_reader(file)?;
    tracing::info!(path = %path.display(), count = records.len(), "loaded batch incomes");
    Ok(records)
}
