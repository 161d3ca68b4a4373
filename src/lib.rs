//! `chartprep` library crate.
//!
//! Prepares time-series records for bar/line and stacked-bar charts:
//! grouping by date granularity, per-group mean and sum, and padded axis
//! domains. The `chartprep` binary is a thin wrapper that reads a JSON
//! dataset and writes the prepared data.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod source;

pub use error::{ChartError, ChartResult};
