use rust_decimal::Decimal;
use slabtax_core::calculations::common::{checked_ratio, round_half_up};
use thiserror::Error;

/// Error returned when user input cannot be used as an income amount.
#[derive(Debug, Error)]
pub enum ParseAmountError {
    #[error("invalid amount '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("amount '{input}' must not be negative")]
    Negative { input: String },
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas.
///
/// Any comma grouping is accepted, so `1,500,000` and `15,00,000` read the same.
fn normalize_amount_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a user-supplied income amount.
///
/// Empty or whitespace-only input is treated as 0. Negative amounts are
/// rejected here so they never reach the engine.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let amount: Decimal = normalized.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid amount: {}", e);
        ParseAmountError::Invalid {
            input: s.to_string(),
            source: e,
        }
    })?;
    if amount.is_zero() {
        return Ok(Decimal::ZERO);
    }
    if amount.is_sign_negative() {
        return Err(ParseAmountError::Negative {
            input: s.to_string(),
        });
    }
    Ok(amount)
}

/// Formats an amount rounded to two places.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_half_up(amount))
}

/// Formats a fraction as a percentage, e.g. `0.05` as `5%`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

/// Tax as a fraction of gross income, `None` when income is zero.
pub fn effective_rate(
    total_tax: Decimal,
    gross_income: Decimal,
) -> Option<Decimal> {
    checked_ratio(total_tax, gross_income)
}

/// Formats an optional effective rate as a percentage with two places.
pub fn format_effective_rate(rate: Option<Decimal>) -> String {
    rate.map(|r| format!("{:.2}%", round_half_up(r * Decimal::ONE_HUNDRED)))
        .unwrap_or_else(|| "n/a".to_string())
}
