//! Stacked-bar series preparation.
//!
//! Each series becomes one layer. Within a category, a series' segment starts
//! where the previous series ended, so the last layer's tops are the bar totals.

use super::domain::nice_domain;
use crate::error::{ChartError, ChartResult};
use crate::models::{Domain, StackSegment, StackedLayout, StackedRow};
use tracing::debug;

/// Build stacked layers for `rows`, one per entry in `series`.
///
/// Categories are the distinct `xval`s in first-appearance order; layers keep
/// one segment per row. The value domain spans every segment bound and always
/// includes zero, extended to a round tick step for `ticks` ticks.
pub fn stack_series(
    rows: &[StackedRow],
    series: &[String],
    ticks: usize,
) -> ChartResult<StackedLayout> {
    if rows.is_empty() || series.is_empty() {
        return Err(ChartError::EmptyInput);
    }

    let mut layers: Vec<Vec<StackSegment>> = vec![Vec::with_capacity(rows.len()); series.len()];
    let mut categories: Vec<String> = Vec::with_capacity(rows.len());
    let mut low = 0.0f64;
    let mut high = 0.0f64;

    for row in rows {
        if row.values.len() != series.len() {
            return Err(ChartError::SeriesMismatch {
                xval: row.xval.clone(),
                expected: series.len(),
                found: row.values.len(),
            });
        }

        let mut baseline = 0.0;
        for (layer, &value) in layers.iter_mut().zip(&row.values) {
            layer.push(StackSegment {
                x: row.xval.clone(),
                y0: baseline,
                y: value,
            });
            baseline += value;
            low = low.min(baseline);
            high = high.max(baseline);
        }

        if !categories.contains(&row.xval) {
            categories.push(row.xval.clone());
        }
    }

    let domain = nice_domain(Domain::new(low, high), ticks);

    debug!(
        "Stacked {} series over {} categories, domain [{}, {}]",
        series.len(),
        categories.len(),
        domain.min,
        domain.max
    );

    Ok(StackedLayout {
        series: series.to_vec(),
        categories,
        layers,
        domain,
    })
}
