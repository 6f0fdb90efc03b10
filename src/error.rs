//! Custom error types for the analysis pipeline.
//!
//! This module provides the pipeline error hierarchy using `thiserror`.
//! Statistical insufficiency (too few valid pairs for a correlation, too few
//! years for a regression) is deliberately *not* an error anywhere in this
//! crate; it degrades to absent values in the report.

use thiserror::Error;

/// The main error type for the analysis pipeline.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Requested value column is absent from the input table.
    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),

    /// Plot rendering failed.
    #[error("Failed to render plot: {0}")]
    Plot(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_message() {
        let error = AnalysisError::MissingColumn("performance_rate".to_string());
        assert_eq!(
            error.to_string(),
            "Column 'performance_rate' not found in dataset"
        );
    }

    #[test]
    fn test_with_context() {
        let error = AnalysisError::MissingColumn("rate".to_string())
            .with_context("During aggregation");
        assert!(error.to_string().contains("During aggregation"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: AnalysisError = io.into();
        assert!(matches!(error, AnalysisError::Io(_)));
    }
}
