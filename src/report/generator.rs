//! Report generation.
//!
//! Renders prepared chart data as pretty JSON (for a renderer) or as
//! Markdown tables (for people).

use crate::cli::OutputFormat;
use crate::models::{
    AggregatedPoint, ChartBody, ChartDomains, PointSummary, Report, ReportMetadata, StackedLayout,
};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Render a report in the requested format.
pub fn render_report(report: &Report, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => generate_json_report(report),
        OutputFormat::Markdown => Ok(generate_markdown_report(report)),
    }
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {} Chart Data\n\n", report.metadata.chart));
    output.push_str(&generate_metadata_section(&report.metadata));

    match &report.body {
        ChartBody::BarLine {
            points,
            summary,
            domains,
        } => {
            output.push_str(&generate_summary_section(summary));
            output.push_str(&generate_points_section(points));
            if let Some(domains) = domains {
                output.push_str(&generate_domains_section(domains));
            }
        }
        ChartBody::Stacked { layout } => {
            output.push_str(&generate_stacked_section(layout));
        }
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(ref breakdown) = metadata.breakdown {
        section.push_str(&format!("- **Breakdown:** {}\n", breakdown));
    }
    section.push_str(&format!("- **Records Read:** {}\n", metadata.records_read));
    section.push_str(&format!(
        "- **Points Produced:** {}\n",
        metadata.points_produced
    ));
    section.push_str(&format!(
        "- **Duration:** {:.3}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

fn generate_summary_section(summary: &PointSummary) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Groups | Total (bars) | Mean (line) | Peak |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {:.2} | {} |\n\n",
        summary.groups,
        summary.total_z,
        summary.mean_y,
        summary.peak.as_deref().unwrap_or("-")
    ));

    section
}

fn generate_points_section(points: &[AggregatedPoint]) -> String {
    let mut section = String::new();

    section.push_str("## Points\n\n");

    if points.is_empty() {
        section.push_str("No points.\n\n");
        return section;
    }

    section.push_str("| Date | Line (mean) | Bar (sum) |\n");
    section.push_str("|:---|---:|---:|\n");
    for point in points {
        section.push_str(&format!(
            "| {} | {:.2} | {} |\n",
            point.xval, point.yval, point.zval
        ));
    }
    section.push('\n');

    section
}

fn generate_domains_section(domains: &ChartDomains) -> String {
    let mut section = String::new();

    section.push_str("## Axis Domains\n\n");
    section.push_str("| Axis | Min | Max |\n");
    section.push_str("|:---|---:|---:|\n");
    section.push_str(&format!(
        "| x (date) | {} | {} |\n",
        domains.x.min, domains.x.max
    ));
    section.push_str(&format!(
        "| y (line) | {} | {} |\n",
        domains.y.min, domains.y.max
    ));
    section.push_str(&format!(
        "| z (bars) | {} | {} |\n\n",
        domains.z.min, domains.z.max
    ));

    section
}

fn generate_stacked_section(layout: &StackedLayout) -> String {
    let mut section = String::new();

    section.push_str("## Stacks\n\n");

    section.push_str("| Category |");
    for name in &layout.series {
        section.push_str(&format!(" {} |", name));
    }
    section.push_str(" Total |\n");

    section.push_str("|:---|");
    for _ in &layout.series {
        section.push_str("---:|");
    }
    section.push_str("---:|\n");

    // One table row per input row; a repeated category appears once per row.
    let rows = layout.layers.first().map_or(0, Vec::len);
    for i in 0..rows {
        let mut total = 0.0;
        for (depth, layer) in layout.layers.iter().enumerate() {
            if let Some(segment) = layer.get(i) {
                if depth == 0 {
                    section.push_str(&format!("| {} |", segment.x));
                }
                section.push_str(&format!(" {} |", segment.y));
                total = segment.top();
            }
        }
        section.push_str(&format!(" {} |\n", total));
    }
    section.push('\n');

    section.push_str(&format!(
        "**Value domain:** [{}, {}]\n\n",
        layout.domain.min, layout.domain.max
    ));

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Generated by chartprep*\n");

    footer
}

/// Write rendered output to a file.
pub fn write_output(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
