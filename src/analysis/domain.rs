//! Axis domain computation.
//!
//! Raw extents come straight from the aggregated points. Padding then widens
//! them so rendered axes never clip a point and bars always sit on a zero
//! baseline.

use super::aggregator::parse_xval;
use crate::error::{ChartError, ChartResult};
use crate::models::{AggregatedPoint, ChartDomains, Domain};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Unpadded `[min, max]` per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct RawExtents {
    /// Earliest and latest DateKey, compared by date.
    pub x: Domain<String>,
    pub y: Domain<f64>,
    pub z: Domain<f64>,
}

/// Knobs for domain padding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainOptions {
    /// Rounding step for the line axis.
    pub y_step: f64,
    /// Pull a positive bar minimum down to zero.
    pub zero_baseline: bool,
}

/// Line-axis step used when none (or an unusable one) is configured.
pub const DEFAULT_Y_STEP: f64 = 10.0;

impl Default for DomainOptions {
    fn default() -> Self {
        Self {
            y_step: DEFAULT_Y_STEP,
            zero_baseline: true,
        }
    }
}

/// Whether `step` can round an axis: finite and strictly positive.
pub fn is_valid_step(step: f64) -> bool {
    step.is_finite() && step > 0.0
}

fn numeric_extent(values: impl Iterator<Item = f64>) -> Option<Domain<f64>> {
    values.fold(None, |acc, v| match acc {
        None => Some(Domain::new(v, v)),
        Some(d) => Some(Domain::new(d.min.min(v), d.max.max(v))),
    })
}

/// Parse every point's DateKey and return them sorted by date.
fn dated_keys(points: &[AggregatedPoint]) -> ChartResult<Vec<(NaiveDate, &str)>> {
    let mut dated = points
        .iter()
        .map(|p| parse_xval(&p.xval).map(|date| (date, p.xval.as_str())))
        .collect::<ChartResult<Vec<_>>>()?;
    dated.sort_by_key(|(date, _)| *date);
    Ok(dated)
}

/// Compute the unpadded extents of aggregated points.
pub fn extents(points: &[AggregatedPoint]) -> ChartResult<RawExtents> {
    let dated = dated_keys(points)?;
    let (Some(first), Some(last)) = (dated.first(), dated.last()) else {
        return Err(ChartError::EmptyInput);
    };
    let x = Domain::new(first.1.to_string(), last.1.to_string());

    let y = numeric_extent(points.iter().map(|p| p.yval)).ok_or(ChartError::EmptyInput)?;
    let z = numeric_extent(points.iter().map(|p| p.zval)).ok_or(ChartError::EmptyInput)?;

    Ok(RawExtents { x, y, z })
}

/// Pad the line axis.
///
/// A negative minimum moves down to the next multiple of `step` below
/// `min - 1`; a non-negative minimum is kept. The maximum moves up to the next
/// multiple of `step` above `max + 1`. A step that is not finite and positive
/// is replaced by [`DEFAULT_Y_STEP`].
pub fn pad_y_domain(domain: Domain<f64>, step: f64) -> Domain<f64> {
    let step = if is_valid_step(step) {
        step
    } else {
        warn!("Invalid line-axis step {}, using {}", step, DEFAULT_Y_STEP);
        DEFAULT_Y_STEP
    };

    let min = if domain.min < 0.0 {
        -((-domain.min + 1.0) / step).ceil() * step
    } else {
        domain.min
    };
    let max = ((domain.max + 1.0) / step).ceil() * step;

    Domain::new(min, max)
}

/// Pad the bar axis.
///
/// With `zero_baseline`, a positive minimum becomes zero. The maximum is
/// rounded up to a multiple of `10^floor(log10(max))` after adding a tenth of
/// that step, so the tallest bar never touches the top.
pub fn pad_z_domain(domain: Domain<f64>, zero_baseline: bool) -> Domain<f64> {
    let min = if zero_baseline && domain.min > 0.0 {
        0.0
    } else {
        domain.min
    };

    let max = if domain.max > 0.0 {
        let step = 10f64.powf(domain.max.log10().floor());
        ((domain.max + step / 10.0) / step).ceil() * step
    } else if zero_baseline {
        0.0
    } else {
        domain.max
    };

    Domain::new(min, max)
}

/// Tick step for roughly `count` ticks across `[start, stop]` (1, 2 or 5 × 10^k).
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let span = (stop - start).abs();
    if span == 0.0 || count == 0 || !span.is_finite() {
        return 0.0;
    }

    let count = count as f64;
    let mut step = 10f64.powf((span / count).log10().floor());
    let err = count / span * step;

    if err <= 0.15 {
        step *= 10.0;
    } else if err <= 0.35 {
        step *= 5.0;
    } else if err <= 0.75 {
        step *= 2.0;
    }

    step
}

/// Extend a domain outward to multiples of its tick step.
pub fn nice_domain(domain: Domain<f64>, count: usize) -> Domain<f64> {
    let step = tick_step(domain.min, domain.max, count);
    if step == 0.0 {
        return domain;
    }

    Domain::new(
        (domain.min / step).floor() * step,
        (domain.max / step).ceil() * step,
    )
}

/// Compute padded domains and ordinal categories for a bar/line chart.
pub fn compute_domains(
    points: &[AggregatedPoint],
    options: &DomainOptions,
) -> ChartResult<ChartDomains> {
    let raw = extents(points)?;

    let mut x_categories: Vec<String> = Vec::with_capacity(points.len());
    for (_, key) in dated_keys(points)? {
        if !x_categories.iter().any(|k| k == key) {
            x_categories.push(key.to_string());
        }
    }

    let y = pad_y_domain(raw.y, options.y_step);
    let z = pad_z_domain(raw.z, options.zero_baseline);

    debug!(
        "Domains: y [{}, {}] -> [{}, {}], z [{}, {}] -> [{}, {}]",
        raw.y.min, raw.y.max, y.min, y.max, raw.z.min, raw.z.max, z.min, z.max
    );

    Ok(ChartDomains {
        x: raw.x,
        x_categories,
        y,
        z,
    })
}
