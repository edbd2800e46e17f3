pub mod loader;

pub use loader::{PolicyLoader, PolicyLoaderError, SlabRecord};
