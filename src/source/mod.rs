//! Dataset loading.
//!
//! Input files are JSON arrays of flat objects. Bar/line datasets map onto
//! [`Record`]; stacked datasets carry an `xval` plus one numeric field per
//! series.

use crate::models::{Record, StackedRow};
use anyhow::{anyhow, bail, Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A JSON dataset on disk.
#[derive(Debug, Clone)]
pub struct DataSource {
    path: PathBuf,
}

impl DataSource {
    /// Create a data source for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file as a JSON array of objects.
    fn read_rows(&self) -> Result<Vec<Map<String, Value>>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read dataset: {}", self.path.display()))?;

        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse dataset: {}", self.path.display()))?;

        let Value::Array(items) = value else {
            bail!(
                "Dataset {} must be a JSON array of objects",
                self.path.display()
            );
        };

        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(map),
                other => Err(anyhow!("Row {} is not an object: {}", i, other)),
            })
            .collect()
    }

    /// Load bar/line records.
    pub fn load_records(&self) -> Result<Vec<Record>> {
        let rows = self.read_rows()?;
        let mut records = Vec::with_capacity(rows.len());

        for (i, row) in rows.into_iter().enumerate() {
            let record: Record = serde_json::from_value(Value::Object(row))
                .with_context(|| format!("Invalid record at row {}", i))?;
            records.push(record);
        }

        info!(
            "Loaded {} records from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    /// Load stacked rows, reading one value per key in `series`.
    ///
    /// Numeric strings are accepted as values.
    pub fn load_stacked_rows(&self, series: &[String]) -> Result<Vec<StackedRow>> {
        let rows = self.read_rows()?;
        let mut stacked = Vec::with_capacity(rows.len());

        for (i, row) in rows.iter().enumerate() {
            let xval = match row.get("xval") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => bail!("Row {} has no xval", i),
            };

            let values = series
                .iter()
                .map(|key| {
                    row.get(key)
                        .and_then(numeric_value)
                        .ok_or_else(|| anyhow!("Row {} ({}) has no numeric '{}'", i, xval, key))
                })
                .collect::<Result<Vec<f64>>>()?;

            stacked.push(StackedRow { xval, values });
        }

        debug!(
            "Loaded {} stacked rows with series {:?}",
            stacked.len(),
            series
        );
        Ok(stacked)
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BreakdownKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_dataset(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_records() {
        let file = write_dataset(
            r#"[
                {"xval": "Jan-05-2020", "yval": 10, "zval": 100, "breakdowntype": "YM"},
                {"xval": "Jan-20-2020", "yval": 20, "zval": 50, "breakdowntype": "YM", "label": "x"}
            ]"#,
        );

        let records = DataSource::new(file.path()).load_records().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].breakdown, BreakdownKind::YearMonth);
        assert_eq!(records[1].label.as_deref(), Some("x"));
    }

    #[test]
    fn test_load_records_rejects_bad_shapes() {
        let not_array = write_dataset(r#"{"xval": "Jan-05-2020"}"#);
        assert!(DataSource::new(not_array.path()).load_records().is_err());

        let missing_field = write_dataset(r#"[{"xval": "Jan-05-2020", "yval": 1}]"#);
        let err = DataSource::new(missing_field.path())
            .load_records()
            .unwrap_err();
        assert!(format!("{:#}", err).contains("row 0"));

        assert!(DataSource::new("/nonexistent/data.json")
            .load_records()
            .is_err());
    }

    #[test]
    fn test_load_stacked_rows() {
        let file = write_dataset(
            r#"[
                {"xval": "Q1", "yval1": 1, "yval2": "2.5", "yval3": 3},
                {"xval": "Q2", "yval1": 4, "yval2": 5, "yval3": 6, "extra": true}
            ]"#,
        );
        let series: Vec<String> = ["yval1", "yval2", "yval3"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let rows = DataSource::new(file.path())
            .load_stacked_rows(&series)
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].values, vec![1.0, 2.5, 3.0]);
        assert_eq!(rows[1].xval, "Q2");
    }

    #[test]
    fn test_load_stacked_rows_missing_series() {
        let file = write_dataset(r#"[{"xval": "Q1", "yval1": 1}]"#);
        let series = vec!["yval1".to_string(), "yval2".to_string()];

        let err = DataSource::new(file.path())
            .load_stacked_rows(&series)
            .unwrap_err();
        assert!(err.to_string().contains("yval2"));
    }
}
