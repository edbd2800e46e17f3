mod slab_rule;
mod tax_policy;
mod tax_result;

pub use slab_rule::SlabRule;
pub use tax_policy::{PolicyError, TaxPolicy};
pub use tax_result::{BracketContribution, TaxResult};
