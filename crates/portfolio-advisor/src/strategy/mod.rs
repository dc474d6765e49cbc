//! Allocation Strategies
//!
//! Post-processing applied to model-proposed allocations.

mod normalizer;

pub use normalizer::{AllocationNormalizer, TARGET_PERCENT};
