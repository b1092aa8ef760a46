//! Configuration module — model and loading.

pub mod load;
pub mod model;

pub use model::{IngestConfig, PoolConfig};
