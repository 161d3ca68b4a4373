//! Shared preparation pipeline used by the binary and by integration tests.
//!
//! load -> aggregate (or stack) -> domains -> report

use crate::analysis::{aggregate, compute_domains, stack_series};
use crate::config::Config;
use crate::models::{ChartBody, ChartKind, PointSummary, Report, ReportMetadata};
use crate::source::DataSource;
use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info};

/// Load a dataset and prepare it for `chart`.
pub fn prepare(source: &DataSource, chart: ChartKind, config: &Config) -> Result<Report> {
    let start_time = Instant::now();
    let source_name = source.path().display().to_string();

    let (body, breakdown, records_read, points_produced) = match chart {
        ChartKind::BarLine => {
            let records = source.load_records()?;
            let breakdown = records.first().map(|r| r.breakdown.clone());

            let points = aggregate(&records)
                .with_context(|| format!("Failed to aggregate {}", source_name))?;
            let summary = PointSummary::from_points(&points);

            let domains = if config.report.include_domains {
                Some(compute_domains(&points, &config.domain_options())?)
            } else {
                debug!("Domains disabled by configuration");
                None
            };

            let produced = points.len();
            (
                ChartBody::BarLine {
                    points,
                    summary,
                    domains,
                },
                breakdown,
                records.len(),
                produced,
            )
        }
        ChartKind::Stacked => {
            let rows = source.load_stacked_rows(&config.stacked.series)?;
            let layout = stack_series(&rows, &config.stacked.series, config.stacked.nice_ticks)
                .with_context(|| format!("Failed to stack {}", source_name))?;

            let produced = layout.categories.len();
            (ChartBody::Stacked { layout }, None, rows.len(), produced)
        }
    };

    info!(
        "Prepared {} points from {} records for {} chart",
        points_produced, records_read, chart
    );

    Ok(Report {
        metadata: ReportMetadata {
            source: source_name,
            generated_at: Utc::now(),
            chart,
            breakdown,
            records_read,
            points_produced,
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        body,
    })
}

/// What a dry run found in a dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetSummary {
    /// Number of rows in the file.
    pub rows: usize,
    /// Row count per breakdown kind (bar/line only).
    pub breakdowns: BTreeMap<String, usize>,
    /// Number of groups or categories the data would produce.
    pub groups: usize,
}

/// Load and validate a dataset without producing a report.
pub fn validate_dataset(
    source: &DataSource,
    chart: ChartKind,
    config: &Config,
) -> Result<DatasetSummary> {
    let mut summary = DatasetSummary::default();

    match chart {
        ChartKind::BarLine => {
            let records = source.load_records()?;
            summary.rows = records.len();
            for record in &records {
                *summary
                    .breakdowns
                    .entry(record.breakdown.to_string())
                    .or_default() += 1;
            }
            summary.groups = aggregate(&records)?.len();
        }
        ChartKind::Stacked => {
            let rows = source.load_stacked_rows(&config.stacked.series)?;
            summary.rows = rows.len();
            summary.groups = stack_series(&rows, &config.stacked.series, config.stacked.nice_ticks)?
                .categories
                .len();
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChartError;
    use crate::models::Domain;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_dataset(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const MONTHLY: &str = r#"[
        {"xval": "Feb-03-2020", "yval": -23, "zval": 5, "breakdownType": "YM"},
        {"xval": "Jan-05-2020", "yval": 10, "zval": 100, "breakdownType": "YM"},
        {"xval": "Jan-20-2020", "yval": 20, "zval": 50, "breakdownType": "YM"},
        {"xval": "Feb-14-2020", "yval": 47, "zval": 0, "breakdownType": "YM"}
    ]"#;

    #[test]
    fn test_prepare_bar_line() {
        let file = write_dataset(MONTHLY);
        let report = prepare(
            &DataSource::new(file.path()),
            ChartKind::BarLine,
            &Config::default(),
        )
        .unwrap();

        assert_eq!(report.metadata.records_read, 4);
        assert_eq!(report.metadata.points_produced, 2);

        let ChartBody::BarLine {
            points, domains, ..
        } = report.body
        else {
            panic!("expected bar/line body");
        };

        assert_eq!(points[0].xval, "Jan 2020");
        assert_eq!(points[0].yval, 15.0);
        assert_eq!(points[0].zval, 150.0);
        assert_eq!(points[1].xval, "Feb 2020");
        assert_eq!(points[1].yval, 12.0);

        let domains = domains.unwrap();
        assert_eq!(domains.y, Domain::new(12.0, 20.0));
        assert_eq!(domains.z, Domain::new(0.0, 200.0));
    }

    #[test]
    fn test_prepare_without_domains() {
        let file = write_dataset(MONTHLY);
        let mut config = Config::default();
        config.report.include_domains = false;

        let report = prepare(&DataSource::new(file.path()), ChartKind::BarLine, &config).unwrap();

        assert!(matches!(report.body, ChartBody::BarLine { domains: None, .. }));
    }

    #[test]
    fn test_prepare_stacked() {
        let file = write_dataset(
            r#"[
                {"xval": "Q1", "yval1": 10, "yval2": 20, "yval3": 30},
                {"xval": "Q2", "yval1": 5, "yval2": 0, "yval3": 82}
            ]"#,
        );

        let report = prepare(
            &DataSource::new(file.path()),
            ChartKind::Stacked,
            &Config::default(),
        )
        .unwrap();

        let ChartBody::Stacked { layout } = report.body else {
            panic!("expected stacked body");
        };
        assert_eq!(layout.categories, vec!["Q1", "Q2"]);
        assert_eq!(layout.domain, Domain::new(0.0, 90.0));
    }

    #[test]
    fn test_prepare_surfaces_chart_errors() {
        let file = write_dataset(
            r#"[{"xval": "Jan-05-2020", "yval": 1, "zval": 1, "breakdownType": "YW"}]"#,
        );

        let err = prepare(
            &DataSource::new(file.path()),
            ChartKind::BarLine,
            &Config::default(),
        )
        .unwrap_err();

        assert_eq!(
            err.downcast_ref::<ChartError>(),
            Some(&ChartError::UnsupportedBreakdownKind {
                kind: "YW".to_string()
            })
        );
    }

    #[test]
    fn test_validate_dataset() {
        let file = write_dataset(MONTHLY);
        let summary = validate_dataset(
            &DataSource::new(file.path()),
            ChartKind::BarLine,
            &Config::default(),
        )
        .unwrap();

        assert_eq!(summary.rows, 4);
        assert_eq!(summary.groups, 2);
        assert_eq!(summary.breakdowns.get("YM"), Some(&4));
    }
}
