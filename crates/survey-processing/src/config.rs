//! Configuration for the survey analysis engine.
//!
//! All analyzers share one [`AnalyzerConfig`], built with the builder
//! pattern. In particular the demographic field set lives here so the
//! pattern detector, association analyzer and summary all agree on which
//! columns are grouping keys rather than survey responses.

use serde::{Deserialize, Serialize};

/// Demographic grouping fields shared by every analyzer.
pub const DEFAULT_DEMOGRAPHIC_FIELDS: [&str; 4] = ["age", "gender", "region", "education"];

/// Maximum accepted input file size in bytes (50 MB).
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Placeholder survey response rate.
///
/// The source data carries no information about how many people were invited,
/// so this is a stand-in constant rather than a computed value.
pub const PLACEHOLDER_RESPONSE_RATE: f64 = 85.5;

/// Configuration for survey analysis.
///
/// Use [`AnalyzerConfig::builder()`] for customization:
///
/// ```rust,ignore
/// let config = AnalyzerConfig::builder()
///     .text_min_length(30)
///     .outlier_share_threshold(0.02)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Columns treated as demographic grouping keys, never as responses.
    /// Default: age, gender, region, education
    pub demographic_fields: Vec<String>,

    /// Number of leading records sampled when deciding whether a column
    /// holds free text. Default: 10
    pub text_sample_rows: usize,

    /// Minimum character length for a value to count as free text.
    /// Default: 20
    pub text_min_length: usize,

    /// Fraction of sampled non-empty values that must be free text for the
    /// column to qualify for the sentiment sweep (0.0 - 1.0). Default: 0.3
    pub text_column_ratio: f64,

    /// A response value whose share of a column is at or below this fraction
    /// is flagged as an outlier (0.0 - 1.0). Default: 0.05
    pub outlier_share_threshold: f64,

    /// Alpha level for chi-square significance. Default: 0.05
    pub significance_level: f64,

    /// Relatedness ratio above which two response columns are reported as
    /// correlated (0.0 - 1.0). Default: 0.6
    pub correlation_threshold: f64,

    /// Minimum share (in percent) of records a response combination must
    /// reach to be reported. Default: 10.0
    pub combination_min_share: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            demographic_fields: DEFAULT_DEMOGRAPHIC_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            text_sample_rows: 10,
            text_min_length: 20,
            text_column_ratio: 0.3,
            outlier_share_threshold: 0.05,
            significance_level: 0.05,
            correlation_threshold: 0.6,
            combination_min_share: 10.0,
        }
    }
}

impl AnalyzerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::default()
    }

    /// Check whether a column is a demographic grouping field.
    pub fn is_demographic(&self, column: &str) -> bool {
        self.demographic_fields.iter().any(|f| f == column)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, value) in [
            ("text_column_ratio", self.text_column_ratio),
            ("outlier_share_threshold", self.outlier_share_threshold),
            ("significance_level", self.significance_level),
            ("correlation_threshold", self.correlation_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidThreshold {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.text_sample_rows == 0 {
            return Err(ConfigValidationError::InvalidSampleRows(
                self.text_sample_rows,
            ));
        }

        if !(0.0..=100.0).contains(&self.combination_min_share) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "combination_min_share".to_string(),
                value: self.combination_min_share,
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (out of range)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid text sample rows: {0} (must be at least 1)")]
    InvalidSampleRows(usize),
}

/// Builder for [`AnalyzerConfig`].
#[derive(Debug, Default)]
pub struct AnalyzerConfigBuilder {
    config: Option<AnalyzerConfig>,
}

impl AnalyzerConfigBuilder {
    fn config_mut(&mut self) -> &mut AnalyzerConfig {
        self.config.get_or_insert_with(AnalyzerConfig::default)
    }

    /// Set the demographic grouping fields.
    pub fn demographic_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config_mut().demographic_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the number of records sampled for text-column detection.
    pub fn text_sample_rows(mut self, rows: usize) -> Self {
        self.config_mut().text_sample_rows = rows;
        self
    }

    /// Set the minimum character length for free-text values.
    pub fn text_min_length(mut self, length: usize) -> Self {
        self.config_mut().text_min_length = length;
        self
    }

    /// Set the free-text ratio threshold.
    pub fn text_column_ratio(mut self, ratio: f64) -> Self {
        self.config_mut().text_column_ratio = ratio;
        self
    }

    /// Set the outlier share threshold.
    pub fn outlier_share_threshold(mut self, threshold: f64) -> Self {
        self.config_mut().outlier_share_threshold = threshold;
        self
    }

    /// Set the chi-square significance level.
    pub fn significance_level(mut self, alpha: f64) -> Self {
        self.config_mut().significance_level = alpha;
        self
    }

    /// Set the response relatedness threshold.
    pub fn correlation_threshold(mut self, threshold: f64) -> Self {
        self.config_mut().correlation_threshold = threshold;
        self
    }

    /// Set the minimum combination share in percent.
    pub fn combination_min_share(mut self, share: f64) -> Self {
        self.config_mut().combination_min_share = share;
        self
    }

    /// Build and validate the configuration.
    pub fn build(mut self) -> Result<AnalyzerConfig, ConfigValidationError> {
        let config = self.config.take().unwrap_or_default();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.demographic_fields.len(), 4);
    }

    #[test]
    fn test_is_demographic() {
        let config = AnalyzerConfig::default();
        assert!(config.is_demographic("age"));
        assert!(config.is_demographic("gender"));
        assert!(!config.is_demographic("satisfaction"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = AnalyzerConfig::builder()
            .text_min_length(30)
            .outlier_share_threshold(0.02)
            .build()
            .unwrap();
        assert_eq!(config.text_min_length, 30);
        assert!((config.outlier_share_threshold - 0.02).abs() < f64::EPSILON);
        // untouched fields keep defaults
        assert_eq!(config.text_sample_rows, 10);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let result = AnalyzerConfig::builder().text_column_ratio(1.5).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_sample_rows_rejected() {
        let result = AnalyzerConfig::builder().text_sample_rows(0).build();
        assert!(result.is_err());
    }
}
