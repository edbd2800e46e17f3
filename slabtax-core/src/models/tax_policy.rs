use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::SlabRule;

/// Errors raised when a [`TaxPolicy`] violates its structural invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// The policy has no slabs at all.
    #[error("policy has no slabs")]
    NoSlabs,

    /// The first slab does not start at zero.
    #[error("first slab must start at 0, got {lower_bound}")]
    FirstSlabNotAtZero { lower_bound: Decimal },

    /// A bounded slab whose upper bound does not exceed its lower bound.
    #[error("slab {index} is empty: lower bound {lower_bound} is not below upper bound {upper_bound}")]
    EmptySlab {
        index: usize,
        lower_bound: Decimal,
        upper_bound: Decimal,
    },

    /// A slab does not start where the previous one ended.
    #[error("slab {index} starts at {found}, expected {expected}")]
    NonContiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    /// An unbounded slab appears before the last position.
    #[error("slab {index} is unbounded but is not the last slab")]
    UnboundedNotLast { index: usize },

    /// The last slab has an upper bound.
    #[error("last slab must be unbounded")]
    MissingUnboundedTop,

    /// A slab rate outside `[0, 1)`.
    #[error("slab {index} has rate {rate} outside [0, 1)")]
    RateOutOfRange { index: usize, rate: Decimal },

    /// A deduction or threshold below zero.
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    /// A cess or surcharge rate outside `[0, 1)`.
    #[error("{field} {rate} outside [0, 1)")]
    AdjustmentRateOutOfRange { field: &'static str, rate: Decimal },
}

/// Immutable configuration for one tax computation.
///
/// Slabs must be ascending, contiguous, and end with a single unbounded slab.
/// Call [`TaxPolicy::validate`] (or build a [`crate::TaxEngine`]) before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxPolicy {
    pub standard_deduction: Decimal,
    pub slabs: Vec<SlabRule>,
    pub rebate_threshold: Decimal,
    pub cess_threshold: Decimal,
    pub cess_rate: Decimal,
    pub surcharge_threshold: Decimal,
    pub surcharge_rate: Decimal,
}

impl TaxPolicy {
    /// The reference slab structure: 75,000 standard deduction, six slabs
    /// from 0% to 30%, full rebate up to 12,00,000 taxable, 4% cess above
    /// 13,00,000 and 10% surcharge above 60,00,000.
    pub fn reference() -> Self {
        let slab = |lower: i64, upper: Option<i64>, rate_pct: i64| {
            SlabRule::new(
                Decimal::from(lower),
                upper.map(Decimal::from),
                Decimal::new(rate_pct, 2),
            )
        };

        Self {
            standard_deduction: Decimal::from(75_000),
            slabs: vec![
                slab(0, Some(400_000), 0),
                slab(400_000, Some(800_000), 5),
                slab(800_000, Some(1_200_000), 10),
                slab(1_200_000, Some(1_600_000), 15),
                slab(1_600_000, Some(2_400_000), 25),
                slab(2_400_000, None, 30),
            ],
            rebate_threshold: Decimal::from(1_200_000),
            cess_threshold: Decimal::from(1_300_000),
            cess_rate: Decimal::new(4, 2),
            surcharge_threshold: Decimal::from(6_000_000),
            surcharge_rate: Decimal::new(10, 2),
        }
    }

    /// Checks every structural invariant, returning the first violation.
    pub fn validate(&self) -> Result<(), PolicyError> {
        for (field, value) in [
            ("standard_deduction", self.standard_deduction),
            ("rebate_threshold", self.rebate_threshold),
            ("cess_threshold", self.cess_threshold),
            ("surcharge_threshold", self.surcharge_threshold),
        ] {
            if value < Decimal::ZERO {
                return Err(PolicyError::NegativeAmount { field, value });
            }
        }

        for (field, rate) in [
            ("cess_rate", self.cess_rate),
            ("surcharge_rate", self.surcharge_rate),
        ] {
            if !is_fraction(rate) {
                return Err(PolicyError::AdjustmentRateOutOfRange { field, rate });
            }
        }

        self.validate_slabs()
    }

    fn validate_slabs(&self) -> Result<(), PolicyError> {
        let first = self.slabs.first().ok_or(PolicyError::NoSlabs)?;
        if !first.lower_bound.is_zero() {
            return Err(PolicyError::FirstSlabNotAtZero {
                lower_bound: first.lower_bound,
            });
        }

        let last_index = self.slabs.len() - 1;
        let mut expected_lower = first.lower_bound;

        for (index, slab) in self.slabs.iter().enumerate() {
            if slab.lower_bound != expected_lower {
                return Err(PolicyError::NonContiguous {
                    index,
                    expected: expected_lower,
                    found: slab.lower_bound,
                });
            }
            if !is_fraction(slab.rate) {
                return Err(PolicyError::RateOutOfRange {
                    index,
                    rate: slab.rate,
                });
            }

            match slab.upper_bound {
                Some(upper_bound) if upper_bound <= slab.lower_bound => {
                    return Err(PolicyError::EmptySlab {
                        index,
                        lower_bound: slab.lower_bound,
                        upper_bound,
                    });
                }
                Some(_) if index == last_index => {
                    return Err(PolicyError::MissingUnboundedTop);
                }
                Some(upper_bound) => expected_lower = upper_bound,
                None if index != last_index => {
                    return Err(PolicyError::UnboundedNotLast { index });
                }
                None => {}
            }
        }

        Ok(())
    }
}

fn is_fraction(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate < Decimal::ONE
}
