pub mod calculations;
pub mod models;

pub use calculations::engine::{TaxEngine, TaxEngineError, compute};
pub use models::*;
