//! Rendering of tax results as text tables or JSON.

use rust_decimal::Decimal;
use serde::Serialize;
use slabtax_core::{BracketContribution, SlabRule, TaxResult};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::utils::{effective_rate, format_amount, format_effective_rate, format_rate};

/// A computed result with its display-only metrics.
#[derive(Debug, Clone, Serialize)]
pub struct ComputationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub effective_rate: Option<Decimal>,
    #[serde(flatten)]
    pub result: TaxResult,
}

impl ComputationReport {
    pub fn new(
        label: Option<String>,
        result: TaxResult,
    ) -> Self {
        Self {
            label,
            effective_rate: effective_rate(result.total_tax, result.gross_income),
            result,
        }
    }
}

#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Item")]
    item: &'static str,
    #[tabled(rename = "Amount")]
    amount: String,
}

#[derive(Debug, Clone, Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Slab")]
    slab: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Tax")]
    tax: String,
}

#[derive(Debug, Clone, Tabled)]
struct BatchRow {
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Gross Income")]
    gross_income: String,
    #[tabled(rename = "Taxable Income")]
    taxable_income: String,
    #[tabled(rename = "Rebate")]
    rebate: String,
    #[tabled(rename = "Total Tax")]
    total_tax: String,
    #[tabled(rename = "Effective Rate")]
    effective_rate: String,
}

/// Range label for a slab, `lower - upper` or `lower+` for the top slab.
pub fn slab_label(slab: &SlabRule) -> String {
    match slab.upper_bound {
        Some(upper) => format!("{} - {}", slab.lower_bound, upper),
        None => format!("{}+", slab.lower_bound),
    }
}

fn right_aligned<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string()
}

/// Summary table for a single computation.
///
/// Cess and surcharge lines appear only when they were charged; the rebate
/// line appears whenever the rebate branch was taken.
pub fn render_summary(report: &ComputationReport) -> String {
    let result = &report.result;
    let mut rows = vec![
        SummaryRow {
            item: "Gross income",
            amount: format_amount(result.gross_income),
        },
        SummaryRow {
            item: "Standard deduction",
            amount: format_amount(result.deduction_applied),
        },
        SummaryRow {
            item: "Taxable income",
            amount: format_amount(result.taxable_income),
        },
        SummaryRow {
            item: "Slab tax",
            amount: format_amount(result.tax_before_adjustments),
        },
    ];
    if result.rebated {
        rows.push(SummaryRow {
            item: "Rebate",
            amount: format_amount(-result.rebate_applied),
        });
    }
    if !result.cess.is_zero() {
        rows.push(SummaryRow {
            item: "Education cess",
            amount: format_amount(result.cess),
        });
    }
    if !result.surcharge.is_zero() {
        rows.push(SummaryRow {
            item: "Surcharge",
            amount: format_amount(result.surcharge),
        });
    }
    rows.push(SummaryRow {
        item: "Total tax",
        amount: format_amount(result.total_tax),
    });
    rows.push(SummaryRow {
        item: "Effective rate",
        amount: format_effective_rate(report.effective_rate),
    });

    right_aligned(rows)
}

/// Per-slab breakdown table, or `None` when the breakdown is empty.
pub fn render_breakdown(contributions: &[BracketContribution]) -> Option<String> {
    if contributions.is_empty() {
        return None;
    }

    let rows: Vec<BreakdownRow> = contributions
        .iter()
        .map(|c| BreakdownRow {
            slab: slab_label(&c.slab),
            amount: format_amount(c.taxable_amount),
            rate: format_rate(c.slab.rate),
            tax: format_amount(c.tax_at_slab),
        })
        .collect();

    Some(right_aligned(rows))
}

/// One summary line per report.
pub fn render_batch(reports: &[ComputationReport]) -> String {
    let rows: Vec<BatchRow> = reports
        .iter()
        .map(|r| BatchRow {
            label: r.label.clone().unwrap_or_default(),
            gross_income: format_amount(r.result.gross_income),
            taxable_income: format_amount(r.result.taxable_income),
            rebate: format_amount(r.result.rebate_applied),
            total_tax: format_amount(r.result.total_tax),
            effective_rate: format_effective_rate(r.effective_rate),
        })
        .collect();

    right_aligned(rows)
}
