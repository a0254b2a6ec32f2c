//! Report generation module.
//!
//! Bundles every analysis result into one serializable [`AnalysisReport`]
//! and renders it as the plain-text survey report document.
//!
//! # Example
//!
//! ```rust,ignore
//! use survey_processing::reporting::{AnalysisReport, ReportGenerator};
//!
//! let report = ReportGenerator::build_report(ReportParams {
//!     input_file: "survey.csv",
//!     overview,
//!     sentiment,
//!     patterns,
//!     crosstab: None,
//!     associations: None,
//!     column_classification,
//! });
//!
//! // Print as JSON
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! // Or write the text document
//! let path = ReportGenerator::new().write(&report, Path::new("survey_report.txt"))?;
//! ```

mod generator;

pub use generator::{AnalysisReport, CrossTabAnalysis, ReportGenerator, ReportParams};
