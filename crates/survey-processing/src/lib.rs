//! Survey Data Analysis Library
//!
//! A single-user analysis engine for survey CSV data: load a file into an
//! in-memory dataset and run descriptive analyses over it.
//!
//! # Overview
//!
//! - **Dataset Loading**: CSV ingestion with fallback parsing strategies,
//!   key/value normalization and row-level validation
//! - **Summary Statistics**: demographic breakdowns, per-question response
//!   distributions, data-quality assessment
//! - **Sentiment Scoring**: keyword-weighted scoring of free-text responses
//!   with negation and intensifier handling
//! - **Association Analysis**: cross-tabulation, chi-square independence
//!   tests and Pearson correlation for numeric column pairs
//! - **Pattern Detection**: demographic segment comparison, response
//!   relatedness, frequent combinations and rare-value outliers
//! - **Reporting**: a serializable result bundle rendered into a plain-text
//!   report document
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use survey_processing::{
//!     AnalyzerConfig, DatasetLoader, PatternDetector, SentimentAnalyzer, StatsAnalyzer,
//! };
//! use std::path::Path;
//!
//! let dataset = DatasetLoader::new().load(Path::new("survey.csv"))?;
//! let config = AnalyzerConfig::default();
//!
//! // Sentiment sweep over detected text columns
//! let sentiment = SentimentAnalyzer::new(config.clone()).analyze_all_text_columns(&dataset);
//!
//! // Cross-tabulation and chi-square for a chosen pair
//! let stats = StatsAnalyzer::new(&dataset, config.clone());
//! let chi = stats.chi_square_test("gender", "satisfaction")?;
//!
//! // Ranked heuristic patterns
//! let patterns = PatternDetector::new(&dataset, config).find_patterns();
//! ```
//!
//! Every analyzer is a pure function of the loaded dataset: analyses are
//! independent, idempotent, and never mutate the data.

pub mod config;
pub mod dataset;
pub mod error;
pub mod patterns;
pub mod reporting;
pub mod sentiment;
pub mod stats;
pub mod summary;
pub mod utils;

// Re-exports for convenient access
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder, ConfigValidationError};
pub use dataset::loader::DatasetLoader;
pub use dataset::{Dataset, Record};
pub use error::{AnalysisError, Result as AnalysisResult, ResultExt};
pub use patterns::{GroupResponse, OutlierValue, Pattern, PatternDetails, PatternDetector};
pub use reporting::{AnalysisReport, CrossTabAnalysis, ReportGenerator, ReportParams};
pub use sentiment::{ColumnSentiment, Sentiment, SentimentAnalyzer, SentimentResult};
pub use stats::{
    ChiSquareResult, ColumnClassification, CorrelationResult, CrossTab, CrossTabRow,
    PairwiseChiSquare, StatsAnalyzer,
};
pub use summary::{
    CategoryCount, ColumnCompleteness, DataQuality, FieldBreakdown, QuestionSummary,
    ResponseShare, SurveyOverview, SurveySummary,
};
