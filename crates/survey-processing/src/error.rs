//! Custom error types for the survey analysis engine.
//!
//! This module provides the error hierarchy using `thiserror`. Note that
//! statistically inapplicable tests (too few categories, too few numeric
//! pairs) are NOT errors: they are returned as structured results carrying
//! an explicit error marker, so callers can render "test not applicable"
//! without exception handling.

use thiserror::Error;

/// The main error type for survey analysis operations.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Input file failed validation before parsing.
    #[error("Invalid input file '{path}': {reason}")]
    InvalidFile { path: String, reason: String },

    /// The CSV parsed but produced no usable survey records.
    #[error("No valid survey records: {0}")]
    EmptyDataset(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Report generation failed.
    #[error("Failed to generate report: {0}")]
    ReportGenerationFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper (CSV parsing).
    #[error("CSV error: {0}")]
    Csv(#[from] polars::error::PolarsError),

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

    /// Get a stable error code for programmatic handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidFile { .. } => "INVALID_FILE",
            Self::EmptyDataset(_) => "EMPTY_DATASET",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ReportGenerationFailed(_) => "REPORT_GENERATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Csv(_) => "CSV_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }
}

impl From<crate::config::ConfigValidationError> for AnalysisError {
    fn from(error: crate::config::ConfigValidationError) -> Self {
        AnalysisError::InvalidConfig(error.to_string())
    }
}

/// Result type alias for analysis operations.
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
        self.map_err(|e| AnalysisError::Csv(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            AnalysisError::ColumnNotFound("satisfaction".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            AnalysisError::EmptyDataset("all rows invalid".to_string()).error_code(),
            "EMPTY_DATASET"
        );
    }

    #[test]
    fn test_config_error_converts() {
        let config_error = crate::config::ConfigValidationError::InvalidSampleRows(0);
        let error: AnalysisError = config_error.into();
        assert_eq!(error.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_with_context() {
        let error = AnalysisError::ColumnNotFound("age".to_string())
            .with_context("During cross-tabulation");
        assert!(error.to_string().contains("During cross-tabulation"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND"); // Preserves original code
    }

    #[test]
    fn test_display_includes_column() {
        let error = AnalysisError::ColumnNotFound("region".to_string());
        assert!(error.to_string().contains("region"));
    }
}
