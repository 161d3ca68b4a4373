//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.chartprep.toml` files.

use crate::analysis::{is_valid_step, DomainOptions};
use crate::cli::OutputFormat;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".chartprep.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Axis domain padding.
    #[serde(default)]
    pub domain: DomainConfig,

    /// Stacked-bar settings.
    #[serde(default)]
    pub stacked: StackedConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path. Empty means stdout.
    #[serde(default)]
    pub output: String,
}

/// Axis padding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Rounding step for the line axis.
    #[serde(default = "default_y_step")]
    pub y_step: f64,

    /// Start bars at zero when every bar value is positive.
    #[serde(default = "default_true")]
    pub zero_baseline: bool,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            y_step: default_y_step(),
            zero_baseline: true,
        }
    }
}

impl From<&DomainConfig> for DomainOptions {
    fn from(config: &DomainConfig) -> Self {
        Self {
            y_step: config.y_step,
            zero_baseline: config.zero_baseline,
        }
    }
}

fn default_y_step() -> f64 {
    10.0
}

/// Stacked-bar settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackedConfig {
    /// Field names to stack, bottom to top.
    #[serde(default = "default_series")]
    pub series: Vec<String>,

    /// Approximate tick count used to round the value domain.
    #[serde(default = "default_nice_ticks")]
    pub nice_ticks: usize,
}

impl Default for StackedConfig {
    fn default() -> Self {
        Self {
            series: default_series(),
            nice_ticks: default_nice_ticks(),
        }
    }
}

fn default_series() -> Vec<String> {
    vec!["yval1", "yval2", "yval3"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_nice_ticks() -> usize {
    10
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Include padded domains for bar/line output.
    #[serde(default = "default_true")]
    pub include_domains: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            include_domains: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Reject settings that would produce unusable axis domains.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_step(self.domain.y_step) {
            bail!(
                "domain.y_step must be a finite number greater than 0, got {}",
                self.domain.y_step
            );
        }
        Ok(())
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Only explicitly provided values override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }

        if let Some(ref series) = args.series {
            self.stacked.series = series.clone();
        }

        if args.no_domains {
            self.report.include_domains = false;
        }
    }

    /// Domain options derived from `[domain]`.
    pub fn domain_options(&self) -> DomainOptions {
        DomainOptions::from(&self.domain)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
