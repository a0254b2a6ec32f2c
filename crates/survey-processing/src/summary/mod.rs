//! Summary statistics and demographic breakdowns.
//!
//! Produces the overview block of a report: response counts, demographic
//! category breakdowns, fixed-range age distribution, per-question response
//! distributions and a per-column data-quality assessment.

use serde::{Deserialize, Serialize};

use crate::config::{AnalyzerConfig, PLACEHOLDER_RESPONSE_RATE};
use crate::dataset::Dataset;
use crate::utils::{is_digit_string, ordered_counts, title_case, top_n};

/// Extra field treated as demographic by the summary only; the analysis
/// passes keep the shared four-field set.
const SUMMARY_EXTRA_FIELDS: [&str; 1] = ["income"];

/// Fixed age distribution buckets, identical to the pattern detector's.
const AGE_RANGES: [(&str, u32, u32); 6] = [
    ("18-25", 18, 25),
    ("26-35", 26, 35),
    ("36-45", 36, 45),
    ("46-55", 46, 55),
    ("56-65", 56, 65),
    ("65+", 66, u32::MAX),
];

/// How many top responses a question summary keeps.
const TOP_RESPONSES: usize = 5;

/// A category with its response count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Breakdown of one demographic field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldBreakdown {
    pub field: String,
    pub categories: Vec<CategoryCount>,
}

/// One response value's share of a question's answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseShare {
    pub value: String,
    pub count: usize,
    pub percentage: f64,
}

/// Response statistics for one survey question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub column: String,
    pub total_responses: usize,
    pub missing_responses: usize,
    pub response_rate: f64,
    pub top_responses: Vec<CategoryCount>,
    pub distribution: Vec<ResponseShare>,
}

/// Missing-data assessment for one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnCompleteness {
    pub column: String,
    pub missing_count: usize,
    pub missing_percentage: f64,
    pub completeness: f64,
}

/// Dataset-wide data quality metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataQuality {
    pub total_rows: usize,
    pub total_columns: usize,
    pub columns: Vec<ColumnCompleteness>,
}

impl DataQuality {
    /// Mean completeness across columns, in percent.
    pub fn average_completeness(&self) -> f64 {
        if self.columns.is_empty() {
            return 0.0;
        }
        self.columns.iter().map(|c| c.completeness).sum::<f64>() / self.columns.len() as f64
    }
}

/// The full overview block of a survey analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyOverview {
    pub total_responses: usize,
    /// Stand-in constant; the data carries no invitation counts to compute a
    /// real rate from.
    pub response_rate: f64,
    pub demographics: Vec<FieldBreakdown>,
    pub age_distribution: Vec<CategoryCount>,
    pub average_age: Option<f64>,
    pub question_summaries: Vec<QuestionSummary>,
    pub data_quality: DataQuality,
}

/// Summary statistics generator over one dataset.
pub struct SurveySummary<'a> {
    dataset: &'a Dataset,
    config: AnalyzerConfig,
}

impl<'a> SurveySummary<'a> {
    /// Create a summary generator for a dataset.
    pub fn new(dataset: &'a Dataset, config: AnalyzerConfig) -> Self {
        Self { dataset, config }
    }

    /// Generate the complete overview.
    pub fn generate(&self) -> SurveyOverview {
        SurveyOverview {
            total_responses: self.dataset.len(),
            response_rate: PLACEHOLDER_RESPONSE_RATE,
            demographics: self.demographics(),
            age_distribution: self.age_distribution(),
            average_age: self.average_age(),
            question_summaries: self.question_summaries(),
            data_quality: self.data_quality(),
        }
    }

    /// Fields the summary excludes from question analysis: the shared
    /// demographic set plus summary-only extras.
    fn summary_fields(&self) -> Vec<String> {
        let mut fields = self.config.demographic_fields.clone();
        for extra in SUMMARY_EXTRA_FIELDS {
            if !fields.iter().any(|f| f == extra) {
                fields.push(extra.to_string());
            }
        }
        fields
    }

    /// Category breakdown per demographic field present in the dataset.
    fn demographics(&self) -> Vec<FieldBreakdown> {
        self.summary_fields()
            .iter()
            .filter(|field| self.dataset.has_column(field))
            .map(|field| FieldBreakdown {
                field: field.clone(),
                categories: self.count_by_field(field),
            })
            .collect()
    }

    /// Title-cased category counts for one field, first-appearance order.
    fn count_by_field(&self, field: &str) -> Vec<CategoryCount> {
        let normalized: Vec<String> = self
            .dataset
            .column_values(field)
            .map(|v| title_case(v.trim()))
            .filter(|v| !v.is_empty())
            .collect();
        ordered_counts(normalized.iter().map(String::as_str))
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect()
    }

    /// Fixed-range age distribution; empty when there is no age column.
    fn age_distribution(&self) -> Vec<CategoryCount> {
        if !self.dataset.has_column("age") {
            return Vec::new();
        }

        let mut buckets: Vec<CategoryCount> = AGE_RANGES
            .iter()
            .map(|(label, _, _)| CategoryCount {
                category: label.to_string(),
                count: 0,
            })
            .collect();

        for age in self.integer_ages() {
            if let Some(idx) = AGE_RANGES
                .iter()
                .position(|(_, lo, hi)| age >= *lo && age <= *hi)
            {
                buckets[idx].count += 1;
            }
        }

        buckets
    }

    /// Mean age over values that are plain integers.
    fn average_age(&self) -> Option<f64> {
        if !self.dataset.has_column("age") {
            return None;
        }
        let ages: Vec<u32> = self.integer_ages().collect();
        if ages.is_empty() {
            return None;
        }
        Some(ages.iter().map(|&a| a as f64).sum::<f64>() / ages.len() as f64)
    }

    fn integer_ages(&self) -> impl Iterator<Item = u32> + '_ {
        self.dataset
            .column_values("age")
            .filter(|v| is_digit_string(v))
            .filter_map(|v| v.parse::<u32>().ok())
    }

    /// Response statistics for every non-demographic question.
    fn question_summaries(&self) -> Vec<QuestionSummary> {
        let excluded = self.summary_fields();
        self.dataset
            .columns()
            .iter()
            .filter(|column| !excluded.iter().any(|f| f == *column))
            .map(|column| self.question_summary(column))
            .collect()
    }

    fn question_summary(&self, column: &str) -> QuestionSummary {
        let total_rows = self.dataset.len();
        let values: Vec<&str> = self.dataset.column_values(column).collect();
        let total = values.len();

        if total == 0 {
            return QuestionSummary {
                column: column.to_string(),
                total_responses: 0,
                missing_responses: total_rows,
                response_rate: 0.0,
                top_responses: Vec::new(),
                distribution: Vec::new(),
            };
        }

        let counts = ordered_counts(values);
        let distribution = counts
            .iter()
            .map(|(value, count)| ResponseShare {
                value: value.clone(),
                count: *count,
                percentage: (*count as f64 / total as f64) * 100.0,
            })
            .collect();

        QuestionSummary {
            column: column.to_string(),
            total_responses: total,
            missing_responses: total_rows - total,
            response_rate: (total as f64 / total_rows as f64) * 100.0,
            top_responses: top_n(&counts, TOP_RESPONSES)
                .into_iter()
                .map(|(category, count)| CategoryCount { category, count })
                .collect(),
            distribution,
        }
    }

    /// Per-column missing data and completeness.
    fn data_quality(&self) -> DataQuality {
        let total_rows = self.dataset.len();
        let columns = self
            .dataset
            .columns()
            .iter()
            .map(|column| {
                let present = self.dataset.non_empty_count(column);
                let missing = total_rows - present;
                let missing_percentage = if total_rows > 0 {
                    (missing as f64 / total_rows as f64) * 100.0
                } else {
                    0.0
                };
                ColumnCompleteness {
                    column: column.clone(),
                    missing_count: missing,
                    missing_percentage,
                    completeness: 100.0 - missing_percentage,
                }
            })
            .collect();

        DataQuality {
            total_rows,
            total_columns: self.dataset.columns().len(),
            columns,
        }
    }
}
