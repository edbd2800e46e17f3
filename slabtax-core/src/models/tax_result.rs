use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::SlabRule;

/// Tax attributed to one slab that received a nonzero share of taxable income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketContribution {
    pub slab: SlabRule,
    pub taxable_amount: Decimal,
    pub tax_at_slab: Decimal,
}

/// Outcome of a single tax computation.
///
/// When `rebated` is true the breakdown is cleared and `total_tax` is zero;
/// `rebate_applied` holds the slab tax that was waived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Income as supplied by the caller.
    pub gross_income: Decimal,

    /// Portion of the standard deduction actually used (never more than gross income).
    pub deduction_applied: Decimal,

    /// Gross income less the standard deduction, floored at zero.
    pub taxable_income: Decimal,

    /// Per-slab breakdown in ascending slab order. Empty when rebated.
    pub bracket_contributions: Vec<BracketContribution>,

    /// Sum of slab tax before rebate, cess and surcharge.
    pub tax_before_adjustments: Decimal,

    /// Whether taxable income fell at or below the rebate threshold.
    pub rebated: bool,

    /// Slab tax waived by the rebate.
    pub rebate_applied: Decimal,

    /// Amount added by the education cess.
    pub cess: Decimal,

    /// Amount added by the surcharge, computed on the cess-inclusive total.
    pub surcharge: Decimal,

    /// Final liability.
    pub total_tax: Decimal,
}

impl TaxResult {
    /// Sum of the per-slab tax in the breakdown.
    pub fn breakdown_total(&self) -> Decimal {
        self.bracket_contributions
            .iter()
            .map(|c| c.tax_at_slab)
            .sum()
    }
}
