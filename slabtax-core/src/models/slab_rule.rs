use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::max;

/// A contiguous income range taxed at a single marginal rate.
///
/// `upper_bound` is `None` for the open-ended top slab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlabRule {
    pub lower_bound: Decimal,
    #[serde(default)]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl SlabRule {
    pub fn new(
        lower_bound: Decimal,
        upper_bound: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.upper_bound.is_none()
    }

    /// Width of the slab, or `None` for the unbounded top slab.
    pub fn width(&self) -> Option<Decimal> {
        self.upper_bound.map(|upper| upper - self.lower_bound)
    }

    /// Portion of `taxable_income` that falls inside this slab.
    ///
    /// Clamped below at zero and, for bounded slabs, above at the slab width.
    pub fn portion_of(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        let above_floor = max(taxable_income - self.lower_bound, Decimal::ZERO);
        match self.width() {
            Some(width) => above_floor.min(width),
            None => above_floor,
        }
    }
}
