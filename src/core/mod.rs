//! Core cookbook logic: types, parsing, registry, aggregation, normalization.

pub mod aggregator;
pub mod normalize;
pub mod parser;
pub mod registry;
pub mod types;

pub use aggregator::AggregationError;
pub use registry::{Registry, RegistryError};
