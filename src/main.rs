//! chartprep - chart data preparation
//!
//! Reads a JSON dataset, aggregates it for a bar/line or stacked-bar chart,
//! computes padded axis domains and writes the result as JSON or Markdown.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (arguments, config, file I/O)
//!   2 - Data error (bad dates, unsupported breakdown, empty input)

use anyhow::{Context, Result};
use chartprep::cli::Args;
use chartprep::config::{Config, DEFAULT_CONFIG_FILE};
use chartprep::error::ChartError;
use chartprep::pipeline;
use chartprep::report;
use chartprep::source::DataSource;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    init_logging(&args);

    debug!("chartprep v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args) {
        error!("Preparation failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code_for(&e));
    }
}

/// Data errors exit with 2, everything else with 1.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<ChartError>().is_some() {
        2
    } else {
        1
    }
}

/// Handle --init-config: generate a default .chartprep.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("Created {} with default settings.", DEFAULT_CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so prepared data can be piped from stdout.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the preparation workflow.
fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let input = args
        .input
        .clone()
        .context("--input is required")?;
    let source = DataSource::new(input);

    if args.dry_run {
        return handle_dry_run(&source, &args, &config);
    }

    let report = pipeline::prepare(&source, args.chart, &config)?;
    let output = report::render_report(&report, config.report.format)?;

    if config.general.output.is_empty() {
        println!("{}", output);
    } else {
        let path = PathBuf::from(&config.general.output);
        report::write_output(&output, &path)?;
        info!("Prepared data written to {}", path.display());
    }

    Ok(())
}

/// Handle --dry-run: load and validate, print what would be produced.
fn handle_dry_run(source: &DataSource, args: &Args, config: &Config) -> Result<()> {
    let summary = pipeline::validate_dataset(source, args.chart, config)?;

    println!("Dry run: {}", source.path().display());
    println!("   Chart: {}", args.chart);
    println!("   Rows: {}", summary.rows);
    for (kind, count) in &summary.breakdowns {
        println!("   Breakdown {}: {} row(s)", kind, count);
    }
    if summary.breakdowns.len() > 1 {
        warn!("Dataset mixes breakdown kinds; the first record's kind is used");
    }
    println!("   Output points: {}", summary.groups);
    println!("Dataset is valid. Nothing was written.");

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
