//! Record aggregation by date granularity.
//!
//! Raw records are grouped by a DateKey derived from their `xval`; each group
//! becomes one point carrying the mean of its `yval`s and the sum of its
//! `zval`s. Output is ordered by date, never by the DateKey string.

use crate::error::{ChartError, ChartResult};
use crate::models::{AggregatedPoint, BreakdownKind, Record};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Running totals for one DateKey.
#[derive(Debug)]
struct Group {
    start: NaiveDate,
    count: usize,
    sum_y: f64,
    sum_z: f64,
}

impl Group {
    fn new(start: NaiveDate) -> Self {
        Self {
            start,
            count: 0,
            sum_y: 0.0,
            sum_z: 0.0,
        }
    }

    fn push(&mut self, record: &Record) {
        self.count += 1;
        self.sum_y += record.yval;
        self.sum_z += record.zval;
    }

    fn into_point(self, key: String) -> AggregatedPoint {
        AggregatedPoint {
            xval: key,
            yval: self.sum_y / self.count as f64,
            zval: self.sum_z,
        }
    }
}

/// Parse an `xval` token into a date.
///
/// Accepts `MMM-DD-YYYY` with `-` or space separators and a case-insensitive
/// month name. The DateKey forms `MMM YYYY` (read as the first of the month)
/// and `MMM DD YYYY` are accepted as well, so aggregated output can be fed
/// back in.
pub fn parse_xval(value: &str) -> ChartResult<NaiveDate> {
    let invalid = || ChartError::InvalidDateFormat {
        value: value.to_string(),
    };

    let tokens: Vec<&str> = value
        .trim()
        .split(|c: char| c == '-' || c == ' ')
        .filter(|t| !t.is_empty())
        .collect();

    let (month, day, year) = match tokens.as_slice() {
        [month, day, year] => (*month, *day, *year),
        [month, year] => (*month, "01", *year),
        _ => return Err(invalid()),
    };

    let month_ok = month.len() >= 3 && month.chars().all(|c| c.is_ascii_alphabetic());
    let day_ok = (1..=2).contains(&day.len()) && day.chars().all(|c| c.is_ascii_digit());
    let year_ok = year.len() == 4 && year.chars().all(|c| c.is_ascii_digit());
    if !(month_ok && day_ok && year_ok) {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(&format!("{month}-{day}-{year}"), "%b-%d-%Y").map_err(|_| invalid())
}

/// Format a date as the DateKey for `kind`.
pub fn date_key(date: NaiveDate, kind: &BreakdownKind) -> ChartResult<String> {
    let format = kind
        .date_format()
        .ok_or_else(|| ChartError::UnsupportedBreakdownKind {
            kind: kind.to_string(),
        })?;
    Ok(date.format(format).to_string())
}

/// First day of the bucket `date` falls into.
fn bucket_start(date: NaiveDate, kind: &BreakdownKind) -> NaiveDate {
    match kind {
        BreakdownKind::YearMonth => date.with_day(1).unwrap_or(date),
        _ => date,
    }
}

/// Number of records whose breakdown kind differs from `kind`.
fn count_mismatched(records: &[Record], kind: &BreakdownKind) -> usize {
    records.iter().filter(|r| r.breakdown != *kind).count()
}

/// Aggregate records into one point per DateKey, sorted by date.
///
/// The breakdown kind of the first record decides the granularity for the
/// whole sequence.
pub fn aggregate(records: &[Record]) -> ChartResult<Vec<AggregatedPoint>> {
    let first = records.first().ok_or(ChartError::EmptyInput)?;
    let kind = &first.breakdown;
    if kind.date_format().is_none() {
        return Err(ChartError::UnsupportedBreakdownKind {
            kind: kind.to_string(),
        });
    }

    let mut groups: HashMap<String, Group> = HashMap::new();

    for record in records {
        let date = parse_xval(&record.xval)?;
        let key = date_key(date, kind)?;
        groups
            .entry(key)
            .or_insert_with(|| Group::new(bucket_start(date, kind)))
            .push(record);
    }

    let mismatched = count_mismatched(records, kind);
    if mismatched > 0 {
        warn!(
            "{} record(s) have a breakdown kind other than {}; grouped by {} anyway",
            mismatched, kind, kind
        );
    }

    let mut keyed: Vec<(NaiveDate, AggregatedPoint)> = groups
        .into_iter()
        .map(|(key, group)| (group.start, group.into_point(key)))
        .collect();
    keyed.sort_by_key(|(start, _)| *start);

    debug!(
        "Aggregated {} records into {} {} groups",
        records.len(),
        keyed.len(),
        kind
    );

    Ok(keyed.into_iter().map(|(_, point)| point).collect())
}
