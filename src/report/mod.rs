//! Output rendering for prepared chart data.

pub mod generator;

pub use generator::*;
