//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::ChartKind;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// chartprep - prepare time-series records for bar/line and stacked-bar charts
///
/// Groups records by date granularity, averages the line values, sums the
/// bar values and computes padded axis domains for a renderer.
///
/// Examples:
///   chartprep --input sales.json
///   chartprep --input sales.json --format markdown --output sales.md
///   chartprep --input mix.json --chart stacked --series yval1,yval2,yval3
///   chartprep --input sales.json --dry-run
///   chartprep --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// JSON dataset to prepare (an array of records)
    #[arg(short, long, value_name = "FILE", required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// Chart the data is prepared for
    #[arg(long, value_enum, default_value_t = ChartKind::BarLine)]
    pub chart: ChartKind,

    /// Output file path (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (json, markdown)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Series fields to stack, bottom to top (comma-separated)
    ///
    /// Example: --series yval1,yval2,yval3
    #[arg(long, value_name = "KEYS", value_delimiter = ',')]
    pub series: Option<Vec<String>>,

    /// Leave padded domains out of bar/line output
    #[arg(long)]
    pub no_domains: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .chartprep.toml in the current directory
    #[arg(short, long, value_name = "FILE", env = "CHARTPREP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Load and validate the dataset without writing output
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .chartprep.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the prepared data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON for a renderer (default)
    #[default]
    Json,
    /// Markdown tables
    Markdown,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match self.input {
            None => return Err("--input is required".to_string()),
            Some(ref input) if !input.is_file() => {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
            Some(_) => {}
        }

        if let Some(ref series) = self.series {
            if series.iter().any(|s| s.trim().is_empty()) {
                return Err("Series names must not be empty".to_string());
            }
            if self.chart != ChartKind::Stacked {
                return Err("--series only applies to --chart stacked".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
