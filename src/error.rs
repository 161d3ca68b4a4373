//! Error types for chart data preparation.
//!
//! Everything in `analysis` returns [`ChartError`] so callers can tell a bad
//! dataset apart from an I/O or configuration failure.

use thiserror::Error;

/// Failures produced while aggregating records or computing domains.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    /// An `xval` did not match the `MMM-DD-YYYY` token pattern.
    #[error("invalid date '{value}': expected MMM-DD-YYYY (e.g. Jan-05-2020)")]
    InvalidDateFormat { value: String },

    /// The breakdown kind has no grouping rule.
    #[error("unsupported breakdown kind '{kind}': expected YM or YMD")]
    UnsupportedBreakdownKind { kind: String },

    /// There was nothing to aggregate.
    #[error("no records to aggregate")]
    EmptyInput,

    /// A stacked row carries a different number of values than there are series.
    #[error("row '{xval}' has {found} series values, expected {expected}")]
    SeriesMismatch {
        xval: String,
        expected: usize,
        found: usize,
    },
}

/// Convenience alias for analysis results.
pub type ChartResult<T> = std::result::Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ChartError::InvalidDateFormat {
            value: "2020-01-05".to_string(),
        };
        assert!(err.to_string().contains("2020-01-05"));

        let err = ChartError::UnsupportedBreakdownKind {
            kind: "YW".to_string(),
        };
        assert!(err.to_string().contains("YW"));

        assert_eq!(ChartError::EmptyInput.to_string(), "no records to aggregate");
    }
}
