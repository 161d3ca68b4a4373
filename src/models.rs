//! Data models for chart preparation.
//!
//! This module contains the input records, the aggregated output points,
//! axis domains, and the report structure written by the binary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Granularity at which raw records are grouped.
///
/// Unknown strings are kept as `Other` so the aggregator can report them
/// instead of failing at deserialization time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BreakdownKind {
    /// Year-month (`Jan 2020`).
    YearMonth,
    /// Year-month-day (`Jan 05 2020`).
    YearMonthDay,
    /// Year-week. No grouping rule is defined for it.
    YearWeek,
    /// No breakdown.
    None,
    Other(String),
}

impl BreakdownKind {
    /// The chrono format used to build a DateKey, if this kind can be grouped.
    pub fn date_format(&self) -> Option<&'static str> {
        match self {
            BreakdownKind::YearMonth => Some("%b %Y"),
            BreakdownKind::YearMonthDay => Some("%b %d %Y"),
            _ => None,
        }
    }

    /// The wire code of this kind (`YM`, `YMD`, ...).
    pub fn code(&self) -> &str {
        match self {
            BreakdownKind::YearMonth => "YM",
            BreakdownKind::YearMonthDay => "YMD",
            BreakdownKind::YearWeek => "YW",
            BreakdownKind::None => "NONE",
            BreakdownKind::Other(s) => s,
        }
    }
}

impl fmt::Display for BreakdownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<&str> for BreakdownKind {
    fn from(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "YM" => BreakdownKind::YearMonth,
            "YMD" => BreakdownKind::YearMonthDay,
            "YW" => BreakdownKind::YearWeek,
            "NONE" | "" => BreakdownKind::None,
            _ => BreakdownKind::Other(s.to_string()),
        }
    }
}

impl From<String> for BreakdownKind {
    fn from(s: String) -> Self {
        BreakdownKind::from(s.as_str())
    }
}

impl From<BreakdownKind> for String {
    fn from(kind: BreakdownKind) -> Self {
        kind.code().to_string()
    }
}

/// A single raw input record for the bar/line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Date-like token, `MMM-DD-YYYY`.
    pub xval: String,
    /// Line value; averaged per group.
    pub yval: f64,
    /// Bar value; summed per group.
    pub zval: f64,
    /// Grouping granularity.
    #[serde(
        rename = "breakdownType",
        alias = "breakdowntype",
        alias = "breakdown_type"
    )]
    pub breakdown: BreakdownKind,
    /// Optional display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Record {
    /// Creates a record without a label.
    pub fn new(xval: impl Into<String>, yval: f64, zval: f64, breakdown: BreakdownKind) -> Self {
        Self {
            xval: xval.into(),
            yval,
            zval,
            breakdown,
            label: None,
        }
    }
}

/// One aggregated group: mean of `yval`, sum of `zval`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPoint {
    /// DateKey of the group.
    pub xval: String,
    pub yval: f64,
    pub zval: f64,
}

/// A `[min, max]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain<T> {
    pub min: T,
    pub max: T,
}

impl<T> Domain<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl Domain<f64> {
    /// Whether `value` lies within the bounds (inclusive).
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Padded axis domains for the bar/line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDomains {
    /// Earliest and latest DateKey.
    pub x: Domain<String>,
    /// Distinct DateKeys in chronological order (ordinal axis bands).
    pub x_categories: Vec<String>,
    /// Line axis.
    pub y: Domain<f64>,
    /// Bar axis.
    pub z: Domain<f64>,
}

/// A single row of stacked-bar input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedRow {
    pub xval: String,
    /// One value per series, in series order.
    pub values: Vec<f64>,
}

/// One bar segment: starts at `y0`, extends by `y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackSegment {
    pub x: String,
    pub y0: f64,
    pub y: f64,
}

impl StackSegment {
    /// Top of the segment.
    pub fn top(&self) -> f64 {
        self.y0 + self.y
    }
}

/// Stacked series with cumulative baselines and a value domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedLayout {
    pub series: Vec<String>,
    /// Distinct `xval`s in first-appearance order.
    pub categories: Vec<String>,
    /// One layer per series; each layer has one segment per input row.
    pub layers: Vec<Vec<StackSegment>>,
    pub domain: Domain<f64>,
}

/// Which chart the data is being prepared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Combined bar (sum) and line (mean) chart.
    #[default]
    BarLine,
    /// Stacked bars.
    Stacked,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::BarLine => write!(f, "Bar/Line"),
            ChartKind::Stacked => write!(f, "Stacked Bar"),
        }
    }
}

/// Summary statistics over aggregated points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSummary {
    /// Number of groups.
    pub groups: usize,
    /// Sum of all bar values.
    pub total_z: f64,
    /// Mean of the group means.
    pub mean_y: f64,
    /// DateKey of the group with the largest bar value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak: Option<String>,
}

impl PointSummary {
    /// Creates a summary from aggregated points.
    pub fn from_points(points: &[AggregatedPoint]) -> Self {
        let mut summary = Self::default();
        summary.groups = points.len();

        if points.is_empty() {
            return summary;
        }

        summary.total_z = points.iter().map(|p| p.zval).sum();
        summary.mean_y = points.iter().map(|p| p.yval).sum::<f64>() / points.len() as f64;
        summary.peak = points
            .iter()
            .max_by(|a, b| a.zval.partial_cmp(&b.zval).unwrap_or(std::cmp::Ordering::Equal))
            .map(|p| p.xval.clone());

        summary
    }
}

/// Metadata about a preparation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Input file the records came from.
    pub source: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Target chart.
    pub chart: ChartKind,
    /// Breakdown kind of the first record (bar/line only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<BreakdownKind>,
    /// Number of input records.
    pub records_read: usize,
    /// Number of output points (groups or categories).
    pub points_produced: usize,
    /// Processing time in seconds.
    pub duration_seconds: f64,
}

/// Prepared chart data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "chart_data", rename_all = "snake_case")]
pub enum ChartBody {
    BarLine {
        points: Vec<AggregatedPoint>,
        summary: PointSummary,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        domains: Option<ChartDomains>,
    },
    Stacked {
        layout: StackedLayout,
    },
}

/// The complete report handed to a renderer or written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    #[serde(flatten)]
    pub body: ChartBody,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_from_str() {
        assert_eq!(BreakdownKind::from("YM"), BreakdownKind::YearMonth);
        assert_eq!(BreakdownKind::from("ymd"), BreakdownKind::YearMonthDay);
        assert_eq!(BreakdownKind::from("YW"), BreakdownKind::YearWeek);
        assert_eq!(BreakdownKind::from("NONE"), BreakdownKind::None);
        assert_eq!(
            BreakdownKind::from("Q"),
            BreakdownKind::Other("Q".to_string())
        );
    }

    #[test]
    fn test_breakdown_date_format() {
        assert_eq!(BreakdownKind::YearMonth.date_format(), Some("%b %Y"));
        assert_eq!(BreakdownKind::YearMonthDay.date_format(), Some("%b %d %Y"));
        assert_eq!(BreakdownKind::YearWeek.date_format(), None);
        assert_eq!(BreakdownKind::Other("X".into()).date_format(), None);
    }

    #[test]
    fn test_record_deserialize_aliases() {
        let json = r#"[
            {"xval": "Jan-05-2020", "yval": 10, "zval": 100, "breakdownType": "YM"},
            {"xval": "Jan-06-2020", "yval": 1.5, "zval": 2, "breakdowntype": "YMD", "label": "a"},
            {"xval": "Jan-07-2020", "yval": 0, "zval": 0, "breakdown_type": "weekly"}
        ]"#;

        let records: Vec<Record> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].breakdown, BreakdownKind::YearMonth);
        assert_eq!(records[1].breakdown, BreakdownKind::YearMonthDay);
        assert_eq!(records[1].label.as_deref(), Some("a"));
        assert_eq!(
            records[2].breakdown,
            BreakdownKind::Other("weekly".to_string())
        );
    }

    #[test]
    fn test_record_serializes_wire_code() {
        let record = Record::new("Jan-05-2020", 1.0, 2.0, BreakdownKind::YearMonthDay);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"breakdownType\":\"YMD\""));
        assert!(!json.contains("label"));
    }

    #[test]
    fn test_point_summary() {
        let points = vec![
            AggregatedPoint {
                xval: "Jan 2020".to_string(),
                yval: 10.0,
                zval: 100.0,
            },
            AggregatedPoint {
                xval: "Feb 2020".to_string(),
                yval: 20.0,
                zval: 300.0,
            },
        ];

        let summary = PointSummary::from_points(&points);
        assert_eq!(summary.groups, 2);
        assert_eq!(summary.total_z, 400.0);
        assert_eq!(summary.mean_y, 15.0);
        assert_eq!(summary.peak.as_deref(), Some("Feb 2020"));

        assert_eq!(PointSummary::from_points(&[]), PointSummary::default());
    }

    #[test]
    fn test_domain_helpers() {
        let d = Domain::new(-30.0, 50.0);
        assert!(d.contains(-30.0));
        assert!(!d.contains(50.5));
    }
}
