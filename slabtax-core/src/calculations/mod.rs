//! Tax calculation modules.
//!
//! `engine` holds the slab tax pipeline; `common` holds the decimal helpers
//! shared by the engine and the presentation layer.

pub mod common;
pub mod engine;

pub use engine::{TaxEngine, TaxEngineError, compute};
