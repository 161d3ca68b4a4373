//! Chart data preparation.
//!
//! Aggregation, axis domains and stacked series. All functions here are pure.

pub mod aggregator;
pub mod domain;
pub mod stacked;

pub use aggregator::*;
pub use domain::*;
pub use stacked::*;
