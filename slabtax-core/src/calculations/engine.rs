//! Progressive slab tax engine.
//!
//! Computes liability for a gross income under a [`TaxPolicy`] in five fixed
//! steps:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Taxable income = gross income - standard deduction, minimum 0 |
//! | 2    | Split taxable income across slabs and tax each share at the slab rate |
//! | 3    | Rebate: taxable income at or below the threshold waives all slab tax and clears the breakdown |
//! | 4    | Cess: taxable income above the threshold scales the total by `1 + cess_rate` |
//! | 5    | Surcharge: taxable income above the threshold scales the cess-inclusive total by `1 + surcharge_rate` |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use slabtax_core::{TaxEngine, TaxPolicy};
//!
//! let policy = TaxPolicy::reference();
//! let engine = TaxEngine::new(&policy).unwrap();
//!
//! let result = engine.compute(dec!(1500000)).unwrap();
//!
//! assert_eq!(result.taxable_income, dec!(1425000));
//! assert_eq!(result.tax_before_adjustments, dec!(93750));
//! assert_eq!(result.total_tax, dec!(97500));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::max;
use crate::{BracketContribution, PolicyError, TaxPolicy, TaxResult};

/// Errors that can occur during a tax computation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxEngineError {
    /// Gross income below zero.
    #[error("gross income must not be negative, got {gross_income}")]
    InvalidInput { gross_income: Decimal },

    /// The policy failed validation.
    #[error("invalid tax policy: {0}")]
    Configuration(#[from] PolicyError),

    /// An intermediate amount exceeded the decimal range.
    #[error("tax amount overflowed the decimal range")]
    Overflow,
}

/// Computes tax for `gross_income` under `policy`.
///
/// Validates the policy on every call; use [`TaxEngine`] to validate once and
/// compute many times.
pub fn compute(
    gross_income: Decimal,
    policy: &TaxPolicy,
) -> Result<TaxResult, TaxEngineError> {
    TaxEngine::new(policy)?.compute(gross_income)
}

/// Calculator bound to a validated [`TaxPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct TaxEngine<'a> {
    policy: &'a TaxPolicy,
}

impl<'a> TaxEngine<'a> {
    /// Validates `policy` and binds it to a new engine.
    ///
    /// # Errors
    ///
    /// Returns the first [`PolicyError`] found by [`TaxPolicy::validate`].
    pub fn new(policy: &'a TaxPolicy) -> Result<Self, PolicyError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// Runs the full pipeline for one gross income.
    ///
    /// # Errors
    ///
    /// Returns [`TaxEngineError::InvalidInput`] if `gross_income` is negative,
    /// or [`TaxEngineError::Overflow`] if an adjusted total leaves the decimal
    /// range.
    pub fn compute(
        &self,
        gross_income: Decimal,
    ) -> Result<TaxResult, TaxEngineError> {
        if gross_income < Decimal::ZERO {
            return Err(TaxEngineError::InvalidInput { gross_income });
        }

        let taxable_income = self.taxable_income(gross_income);
        let deduction_applied = gross_income - taxable_income;

        let mut bracket_contributions = self.split_brackets(taxable_income);
        let tax_before_adjustments: Decimal = bracket_contributions
            .iter()
            .map(|c| c.tax_at_slab)
            .sum();

        let rebated = self.is_rebated(taxable_income);
        let (rebate_applied, after_rebate) = if rebated {
            bracket_contributions.clear();
            (tax_before_adjustments, Decimal::ZERO)
        } else {
            (Decimal::ZERO, tax_before_adjustments)
        };

        let after_cess = if taxable_income > self.policy.cess_threshold {
            scale(after_rebate, self.policy.cess_rate)?
        } else {
            after_rebate
        };

        let total_tax = if taxable_income > self.policy.surcharge_threshold {
            scale(after_cess, self.policy.surcharge_rate)?
        } else {
            after_cess
        };

        debug!(
            %gross_income,
            %taxable_income,
            %tax_before_adjustments,
            rebated,
            %total_tax,
            "computed slab tax"
        );

        Ok(TaxResult {
            gross_income,
            deduction_applied,
            taxable_income,
            bracket_contributions,
            tax_before_adjustments,
            rebated,
            rebate_applied,
            cess: after_cess - after_rebate,
            surcharge: total_tax - after_cess,
            total_tax,
        })
    }

    /// Gross income less the standard deduction, floored at zero.
    fn taxable_income(
        &self,
        gross_income: Decimal,
    ) -> Decimal {
        max(
            gross_income - self.policy.standard_deduction,
            Decimal::ZERO,
        )
    }

    /// One contribution per slab receiving a positive share, in slab order.
    fn split_brackets(
        &self,
        taxable_income: Decimal,
    ) -> Vec<BracketContribution> {
        self.policy
            .slabs
            .iter()
            .filter_map(|slab| {
                let taxable_amount = slab.portion_of(taxable_income);
                (taxable_amount > Decimal::ZERO).then(|| BracketContribution {
                    slab: slab.clone(),
                    taxable_amount,
                    tax_at_slab: taxable_amount * slab.rate,
                })
            })
            .collect()
    }

    /// The rebate boundary is inclusive.
    fn is_rebated(
        &self,
        taxable_income: Decimal,
    ) -> bool {
        taxable_income <= self.policy.rebate_threshold
    }
}

/// Returns `amount × (1 + rate)`.
fn scale(
    amount: Decimal,
    rate: Decimal,
) -> Result<Decimal, TaxEngineError> {
    amount
        .checked_mul(Decimal::ONE + rate)
        .ok_or(TaxEngineError::Overflow)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::SlabRule;

    fn engine(policy: &TaxPolicy) -> TaxEngine<'_> {
        TaxEngine::new(policy).unwrap()
    }

    // =========================================================================
    // taxable_income tests
    // =========================================================================

    #[test]
    fn taxable_income_subtracts_standard_deduction() {
        let policy = TaxPolicy::reference();

        assert_eq!(engine(&policy).taxable_income(dec!(500000)), dec!(425000));
    }

    #[test]
    fn taxable_income_floors_at_zero() {
        let policy = TaxPolicy::reference();

        assert_eq!(engine(&policy).taxable_income(dec!(50000)), dec!(0));
    }

    // =========================================================================
    // split_brackets tests
    // =========================================================================

    #[test]
    fn split_brackets_zero_income_has_no_contributions() {
        let policy = TaxPolicy::reference();

        assert!(engine(&policy).split_brackets(dec!(0)).is_empty());
    }

    #[test]
    fn split_brackets_includes_zero_rate_slab_with_positive_share() {
        let policy = TaxPolicy::reference();

        let contributions = engine(&policy).split_brackets(dec!(300000));

        assert_eq!(contributions.len(), 1);
        assert_eq!(contributions[0].taxable_amount, dec!(300000));
        assert_eq!(contributions[0].tax_at_slab, dec!(0));
    }

    #[test]
    fn split_brackets_skips_slabs_above_income() {
        let policy = TaxPolicy::reference();

        let contributions = engine(&policy).split_brackets(dec!(1425000));

        let amounts: Vec<_> = contributions.iter().map(|c| c.taxable_amount).collect();
        let taxes: Vec<_> = contributions.iter().map(|c| c.tax_at_slab).collect();
        assert_eq!(
            amounts,
            vec![dec!(400000), dec!(400000), dec!(400000), dec!(225000)]
        );
        assert_eq!(taxes, vec![dec!(0), dec!(20000), dec!(40000), dec!(33750)]);
    }

    #[test]
    fn split_brackets_fills_unbounded_top_slab() {
        let policy = TaxPolicy::reference();

        let contributions = engine(&policy).split_brackets(dec!(6925000));

        assert_eq!(contributions.len(), 6);
        let top = &contributions[5];
        assert!(top.slab.is_unbounded());
        assert_eq!(top.taxable_amount, dec!(4525000));
        assert_eq!(top.tax_at_slab, dec!(1357500));
    }

    #[test]
    fn split_brackets_income_on_slab_boundary_stops_there() {
        let policy = TaxPolicy::reference();

        let contributions = engine(&policy).split_brackets(dec!(800000));

        assert_eq!(contributions.len(), 2);
        assert_eq!(contributions[1].taxable_amount, dec!(400000));
    }

    // =========================================================================
    // compute: rebate
    // =========================================================================

    #[test]
    fn compute_rebate_clears_breakdown() {
        let policy = TaxPolicy::reference();

        let result = engine(&policy).compute(dec!(500000)).unwrap();

        assert_eq!(result.taxable_income, dec!(425000));
        assert!(result.rebated);
        assert_eq!(result.rebate_applied, dec!(1250));
        assert_eq!(result.total_tax, dec!(0));
        assert!(result.bracket_contributions.is_empty());
    }

    #[test]
    fn compute_rebate_boundary_is_inclusive() {
        let policy = TaxPolicy::reference();

        let result = engine(&policy).compute(dec!(1275000)).unwrap();

        assert_eq!(result.taxable_income, dec!(1200000));
        assert!(result.rebated);
        assert_eq!(result.rebate_applied, dec!(60000));
        assert_eq!(result.total_tax, dec!(0));
        assert!(result.bracket_contributions.is_empty());
    }

    #[test]
    fn compute_one_above_rebate_boundary_is_taxed() {
        let policy = TaxPolicy::reference();

        let result = engine(&policy).compute(dec!(1275001)).unwrap();

        assert_eq!(result.taxable_income, dec!(1200001));
        assert!(!result.rebated);
        assert_eq!(result.rebate_applied, dec!(0));
        assert_eq!(result.total_tax, dec!(60000.15));
        assert_eq!(result.bracket_contributions.len(), 4);
    }

    #[test]
    fn compute_zero_rate_band_still_counts_as_rebated() {
        let policy = TaxPolicy::reference();

        let result = engine(&policy).compute(dec!(200000)).unwrap();

        assert!(result.rebated);
        assert_eq!(result.rebate_applied, dec!(0));
        assert!(result.bracket_contributions.is_empty());
    }

    // =========================================================================
    // compute: cess and surcharge
    // =========================================================================

    #[test]
    fn compute_between_rebate_and_cess_thresholds_has_no_cess() {
        let policy = TaxPolicy::reference();

        let result = engine(&policy).compute(dec!(1375000)).unwrap();

        assert_eq!(result.taxable_income, dec!(1300000));
        assert_eq!(result.tax_before_adjustments, dec!(75000));
        assert_eq!(result.cess, dec!(0));
        assert_eq!(result.total_tax, dec!(75000));
    }

    #[test]
    fn compute_applies_cess_above_threshold() {
        let policy = TaxPolicy::reference();

        let result = engine(&policy).compute(dec!(1500000)).unwrap();

        assert_eq!(result.tax_before_adjustments, dec!(93750));
        assert_eq!(result.cess, dec!(3750));
        assert_eq!(result.surcharge, dec!(0));
        assert_eq!(result.total_tax, dec!(97500));
    }

    #[test]
    fn compute_surcharge_threshold_is_exclusive() {
        let policy = TaxPolicy::reference();

        let at = engine(&policy).compute(dec!(6075000)).unwrap();
        let above = engine(&policy).compute(dec!(6075001)).unwrap();

        assert_eq!(at.taxable_income, dec!(6000000));
        assert_eq!(at.surcharge, dec!(0));
        assert_eq!(above.taxable_income, dec!(6000001));
        assert!(above.surcharge > dec!(0));
    }

    #[test]
    fn compute_surcharge_compounds_on_cess() {
        let policy = TaxPolicy::reference();

        let result = engine(&policy).compute(dec!(7000000)).unwrap();

        assert_eq!(result.taxable_income, dec!(6925000));
        assert_eq!(result.tax_before_adjustments, dec!(1677500));
        assert_eq!(result.cess, dec!(67100));
        assert_eq!(result.surcharge, dec!(174460));
        assert_eq!(result.total_tax, dec!(1919060));
        assert!(result.total_tax != dec!(1677500) * dec!(1.14));
    }

    #[test]
    fn compute_adjustments_reconcile_with_total() {
        let policy = TaxPolicy::reference();

        let result = engine(&policy).compute(dec!(9000000)).unwrap();

        assert_eq!(
            result.total_tax,
            result.tax_before_adjustments - result.rebate_applied + result.cess + result.surcharge
        );
        assert_eq!(result.breakdown_total(), result.tax_before_adjustments);
    }

    #[test]
    fn compute_rebate_precedes_cess() {
        // Rebate threshold above the cess threshold: cess on a zero base stays zero.
        let policy = TaxPolicy {
            rebate_threshold: dec!(1500000),
            ..TaxPolicy::reference()
        };

        let result = engine(&policy).compute(dec!(1475000)).unwrap();

        assert!(result.rebated);
        assert_eq!(result.cess, dec!(0));
        assert_eq!(result.total_tax, dec!(0));
    }

    // =========================================================================
    // compute: inputs and errors
    // =========================================================================

    #[test]
    fn compute_zero_income() {
        let policy = TaxPolicy::reference();

        let result = engine(&policy).compute(dec!(0)).unwrap();

        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.deduction_applied, dec!(0));
        assert_eq!(result.total_tax, dec!(0));
        assert!(result.bracket_contributions.is_empty());
    }

    #[test]
    fn compute_deduction_applied_capped_at_gross() {
        let policy = TaxPolicy::reference();

        let result = engine(&policy).compute(dec!(30000)).unwrap();

        assert_eq!(result.deduction_applied, dec!(30000));
    }

    #[test]
    fn compute_rejects_negative_income() {
        let policy = TaxPolicy::reference();

        let result = engine(&policy).compute(dec!(-1));

        assert_eq!(
            result,
            Err(TaxEngineError::InvalidInput {
                gross_income: dec!(-1),
            })
        );
    }

    #[test]
    fn compute_fn_rejects_invalid_policy() {
        let policy = TaxPolicy {
            slabs: vec![SlabRule::new(dec!(0), Some(dec!(100)), dec!(0.10))],
            ..TaxPolicy::reference()
        };

        let result = compute(dec!(1000), &policy);

        assert_eq!(
            result,
            Err(TaxEngineError::Configuration(
                PolicyError::MissingUnboundedTop
            ))
        );
    }

    #[test]
    fn compute_fn_rejects_first_slab_above_zero() {
        let policy = TaxPolicy {
            standard_deduction: dec!(0),
            slabs: vec![
                SlabRule::new(dec!(100), Some(dec!(200)), dec!(0.10)),
                SlabRule::new(dec!(200), None, dec!(0.20)),
            ],
            rebate_threshold: dec!(0),
            ..TaxPolicy::reference()
        };

        let result = compute(dec!(50), &policy);

        assert_eq!(
            result,
            Err(TaxEngineError::Configuration(
                PolicyError::FirstSlabNotAtZero {
                    lower_bound: dec!(100),
                }
            ))
        );
    }

    #[test]
    fn compute_fn_matches_engine() {
        let policy = TaxPolicy::reference();

        assert_eq!(
            compute(dec!(2500000), &policy),
            engine(&policy).compute(dec!(2500000))
        );
    }

    #[test]
    fn compute_overflow_is_reported() {
        let policy = TaxPolicy {
            standard_deduction: dec!(0),
            slabs: vec![SlabRule::new(dec!(0), None, dec!(0.9))],
            rebate_threshold: dec!(0),
            cess_threshold: dec!(0),
            cess_rate: dec!(0.9),
            surcharge_threshold: dec!(0),
            surcharge_rate: dec!(0.9),
        };

        let result = engine(&policy).compute(dec!(40000000000000000000000000000));

        assert_eq!(result, Err(TaxEngineError::Overflow));
    }
}
