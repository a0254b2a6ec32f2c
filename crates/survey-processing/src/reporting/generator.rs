use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{AnalysisError, Result};
use crate::patterns::Pattern;
use crate::sentiment::ColumnSentiment;
use crate::stats::{
    ChiSquareResult, ColumnClassification, CorrelationResult, CrossTab, PairwiseChiSquare,
};
use crate::summary::SurveyOverview;
use crate::utils::format_table;

/// Cross-tabulation analysis of one user-chosen column pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossTabAnalysis {
    pub column1: String,
    pub column2: String,
    pub table: CrossTab,
    pub chi_square: ChiSquareResult,
    pub correlation: CorrelationResult,
}

/// The complete result bundle of one analysis run.
///
/// Serialized as-is for `--json` output and rendered into the plain-text
/// report document otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Timestamp when the report was generated.
    pub generated_at: String,
    /// Stable report identifier derived from the generation time.
    pub report_id: String,
    /// Path to the analyzed input file.
    pub input_file: String,
    pub overview: SurveyOverview,
    pub sentiment: Vec<ColumnSentiment>,
    pub patterns: Vec<Pattern>,
    pub column_classification: ColumnClassification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crosstab: Option<CrossTabAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associations: Option<Vec<PairwiseChiSquare>>,
}

/// Inputs for building an [`AnalysisReport`].
pub struct ReportParams<'a> {
    pub input_file: &'a str,
    pub overview: SurveyOverview,
    pub sentiment: Vec<ColumnSentiment>,
    pub patterns: Vec<Pattern>,
    pub column_classification: ColumnClassification,
    pub crosstab: Option<CrossTabAnalysis>,
    pub associations: Option<Vec<PairwiseChiSquare>>,
}

/// Renders and writes survey analysis reports.
#[derive(Debug, Default)]
pub struct ReportGenerator;

impl ReportGenerator {
    /// Create a report generator.
    pub fn new() -> Self {
        Self
    }

    /// Assemble a report from analysis results, stamping generation time.
    pub fn build_report(params: ReportParams<'_>) -> AnalysisReport {
        let now = Local::now();
        AnalysisReport {
            generated_at: now.format("%B %d, %Y at %I:%M %p").to_string(),
            report_id: format!("SUR-{}", now.format("%Y%m%d-%H%M%S")),
            input_file: params.input_file.to_string(),
            overview: params.overview,
            sentiment: params.sentiment,
            patterns: params.patterns,
            column_classification: params.column_classification,
            crosstab: params.crosstab,
            associations: params.associations,
        }
    }

    /// Render the full plain-text report document.
    pub fn render_text(&self, report: &AnalysisReport) -> String {
        let mut lines = Vec::new();
        lines.extend(header(report));
        lines.extend(executive_summary(report));
        lines.extend(survey_overview(report));
        lines.extend(demographic_analysis(report));
        lines.extend(sentiment_analysis(report));
        lines.extend(pattern_analysis(report));
        lines.extend(statistical_analysis(report));
        if let Some(crosstab) = &report.crosstab {
            lines.extend(crosstab_analysis(crosstab));
        }
        if let Some(associations) = &report.associations {
            lines.extend(association_sweep(associations));
        }
        lines.extend(key_findings(report));
        lines.extend(recommendations(report));
        lines.extend(footer(report));
        lines.join("\n")
    }

    /// Render the report and write it to `path`, creating parent
    /// directories as needed.
    pub fn write(&self, report: &AnalysisReport, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                AnalysisError::ReportGenerationFailed(format!(
                    "cannot create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        fs::write(path, self.render_text(report))?;
        info!("Report written to: {}", path.display());
        Ok(path.to_path_buf())
    }
}

fn section(title: &str) -> Vec<String> {
    vec![title.to_string(), "-".repeat(50), String::new()]
}

fn header(report: &AnalysisReport) -> Vec<String> {
    vec![
        "=".repeat(80),
        "SURVEY DATA ANALYSIS REPORT".to_string(),
        "=".repeat(80),
        format!("Generated on: {}", report.generated_at),
        format!("Report ID: {}", report.report_id),
        String::new(),
        "This report provides a comprehensive analysis of survey responses including".to_string(),
        "demographic breakdowns, sentiment analysis, pattern detection, and".to_string(),
        "statistical insights to support data-driven decision making.".to_string(),
        String::new(),
        "=".repeat(80),
        String::new(),
    ]
}

fn executive_summary(report: &AnalysisReport) -> Vec<String> {
    let mut lines = section("EXECUTIVE SUMMARY");
    lines.push(format!(
        "Total Survey Responses: {}",
        report.overview.total_responses
    ));
    lines.push(format!(
        "Response Rate: {:.1}%",
        report.overview.response_rate
    ));
    lines.push(String::new());
    lines.push("Key Highlights:".to_string());
    lines.push("- Comprehensive analysis of survey data across multiple dimensions".to_string());
    lines.push("- Demographic breakdowns reveal respondent characteristics".to_string());
    lines.push("- Sentiment analysis provides insights into respondent attitudes".to_string());
    lines.push("- Pattern detection identifies correlations and trends".to_string());
    lines.push("- Statistical analysis supports evidence-based conclusions".to_string());
    lines.push(String::new());
    lines
}

fn survey_overview(report: &AnalysisReport) -> Vec<String> {
    let mut lines = section("SURVEY OVERVIEW");
    let quality = &report.overview.data_quality;

    lines.push("Survey Details:".to_string());
    lines.push(format!(
        "   - Total Responses: {}",
        report.overview.total_responses
    ));
    lines.push(format!(
        "   - Data Quality: {}",
        assess_data_quality(quality.average_completeness(), quality.columns.is_empty())
    ));
    lines.push(format!(
        "   - Numeric Columns: {}",
        report.column_classification.numeric_columns.len()
    ));
    lines.push(format!(
        "   - Categorical Columns: {}",
        report.column_classification.categorical_columns.len()
    ));
    lines.push(String::new());

    if !quality.columns.is_empty() {
        lines.push("Data Completeness by Column:".to_string());
        for column in &quality.columns {
            lines.push(format!("   - {}: {:.1}%", column.column, column.completeness));
        }
        lines.push(String::new());
    }

    lines
}

fn demographic_analysis(report: &AnalysisReport) -> Vec<String> {
    let mut lines = section("DEMOGRAPHIC ANALYSIS");

    if report.overview.demographics.is_empty() {
        lines.push("No demographic data available for analysis.".to_string());
        lines.push(String::new());
        return lines;
    }

    lines.push("Respondent Demographics:".to_string());
    lines.push(String::new());

    for breakdown in &report.overview.demographics {
        if breakdown.categories.is_empty() {
            continue;
        }
        lines.push(format!("{}:", title_case_field(&breakdown.field)));
        let total: usize = breakdown.categories.iter().map(|c| c.count).sum();
        for category in &breakdown.categories {
            let percentage = (category.count as f64 / total as f64) * 100.0;
            lines.push(format!(
                "   - {}: {} ({:.1}%)",
                category.category, category.count, percentage
            ));
        }
        lines.push(String::new());
    }

    if !report.overview.age_distribution.is_empty() {
        lines.push("Age Distribution:".to_string());
        let total = report.overview.total_responses.max(1);
        for bucket in &report.overview.age_distribution {
            let percentage = (bucket.count as f64 / total as f64) * 100.0;
            lines.push(format!(
                "   - {}: {} ({:.1}%)",
                bucket.category, bucket.count, percentage
            ));
        }
        if let Some(average) = report.overview.average_age {
            lines.push(format!("   - Average Age: {:.1}", average));
        }
        lines.push(String::new());
    }

    lines
}

fn sentiment_analysis(report: &AnalysisReport) -> Vec<String> {
    let mut lines = section("SENTIMENT ANALYSIS");

    if report.sentiment.is_empty() {
        lines.push("No text responses available for sentiment analysis.".to_string());
        lines.push(String::new());
        return lines;
    }

    lines.push("Text Response Sentiment Analysis:".to_string());
    lines.push(String::new());

    for results in &report.sentiment {
        lines.push(format!("{}:", results.column));
        lines.push(format!("   - Total Responses: {}", results.total_responses));
        lines.push(format!(
            "   - Positive: {} ({:.1}%)",
            results.positive, results.positive_pct
        ));
        lines.push(format!(
            "   - Negative: {} ({:.1}%)",
            results.negative, results.negative_pct
        ));
        lines.push(format!(
            "   - Neutral: {} ({:.1}%)",
            results.neutral, results.neutral_pct
        ));
        lines.push(format!("   - Average Sentiment Score: {:.2}", results.avg_score));
        lines.push(String::new());
    }

    lines
}

fn pattern_analysis(report: &AnalysisReport) -> Vec<String> {
    let mut lines = section("PATTERN ANALYSIS");

    if report.patterns.is_empty() {
        lines.push("No significant patterns detected in the survey data.".to_string());
        lines.push(String::new());
        return lines;
    }

    lines.push("Detected Patterns and Correlations:".to_string());
    lines.push(String::new());

    // group by type tag, preserving first-appearance order of tags
    let mut tag_order: Vec<&str> = Vec::new();
    for pattern in &report.patterns {
        let tag = pattern.details.type_tag();
        if !tag_order.contains(&tag) {
            tag_order.push(tag);
        }
    }

    for tag in tag_order {
        lines.push(format!("{} Patterns:", title_case_field(tag)));
        for pattern in report.patterns.iter().filter(|p| p.details.type_tag() == tag) {
            lines.push(format!("   - {}", pattern.description));
            lines.push(format!("     Confidence: {:.1}%", pattern.confidence));
            lines.push(format!("     Sample Size: {}", pattern.sample_size));
            lines.push(String::new());
        }
    }

    lines
}

fn statistical_analysis(report: &AnalysisReport) -> Vec<String> {
    let mut lines = section("STATISTICAL ANALYSIS");

    if report.overview.question_summaries.is_empty() {
        lines.push("No question response data available for statistical analysis.".to_string());
        lines.push(String::new());
        return lines;
    }

    lines.push("Response Distribution Analysis:".to_string());
    lines.push(String::new());

    for question in &report.overview.question_summaries {
        lines.push(format!("{}:", question.column));
        lines.push(format!("   - Total Responses: {}", question.total_responses));
        lines.push(format!("   - Response Rate: {:.1}%", question.response_rate));

        if !question.top_responses.is_empty() && question.total_responses > 0 {
            lines.push("   - Top Responses:".to_string());
            for response in question.top_responses.iter().take(3) {
                let percentage =
                    (response.count as f64 / question.total_responses as f64) * 100.0;
                lines.push(format!(
                    "     - {}: {} ({:.1}%)",
                    response.category, response.count, percentage
                ));
            }
        }
        lines.push(String::new());
    }

    lines
}

fn crosstab_analysis(analysis: &CrossTabAnalysis) -> Vec<String> {
    let mut lines = section("CROSS-TABULATION ANALYSIS");

    lines.push(format!("{} vs {}", analysis.column1, analysis.column2));
    lines.push(String::new());
    lines.push(format_table(&analysis.table.to_table(), true));
    lines.push(String::new());

    let chi = &analysis.chi_square;
    lines.push("Chi-Square Test Results:".to_string());
    if let Some(error) = &chi.error {
        lines.push(format!("   - Not applicable: {}", error));
    } else {
        lines.push(format!("   - Chi-Square Value: {:.4}", chi.chi_square));
        lines.push(format!("   - P-Value: {:.4}", chi.p_value));
        lines.push(format!("   - Degrees of Freedom: {}", chi.df));
        lines.push(format!(
            "   - Significant: {}",
            if chi.significant { "Yes" } else { "No" }
        ));
    }
    lines.push(String::new());

    let correlation = &analysis.correlation;
    lines.push("Numeric Correlation:".to_string());
    if let Some(error) = &correlation.error {
        lines.push(format!("   - Not applicable: {}", error));
    } else {
        lines.push(format!("   - Coefficient: {:.4}", correlation.correlation));
        lines.push(format!("   - Sample Size: {}", correlation.sample_size));
        if let Some(strength) = &correlation.strength {
            lines.push(format!("   - Strength: {}", strength));
        }
    }
    lines.push(String::new());

    lines
}

fn association_sweep(associations: &[PairwiseChiSquare]) -> Vec<String> {
    let mut lines = section("ASSOCIATION TESTS");

    if associations.is_empty() {
        lines.push("No columns available for association testing.".to_string());
        lines.push(String::new());
        return lines;
    }

    lines.push("Chi-square tests, most significant first:".to_string());
    for pair in associations {
        if let Some(error) = &pair.result.error {
            lines.push(format!(
                "   - {} vs {}: {}",
                pair.column1, pair.column2, error
            ));
        } else {
            lines.push(format!(
                "   - {} vs {}: chi-square {:.4}, p {:.4}{}",
                pair.column1,
                pair.column2,
                pair.result.chi_square,
                pair.result.p_value,
                if pair.result.significant {
                    " (significant)"
                } else {
                    ""
                }
            ));
        }
    }
    lines.push(String::new());

    lines
}

fn key_findings(report: &AnalysisReport) -> Vec<String> {
    let mut lines = section("KEY FINDINGS");
    let mut findings = Vec::new();

    for breakdown in &report.overview.demographics {
        let mut best: Option<&crate::summary::CategoryCount> = None;
        for category in &breakdown.categories {
            match best {
                Some(current) if category.count <= current.count => {}
                _ => best = Some(category),
            }
        }
        if let Some(most_common) = best {
            findings.push(format!(
                "- {}: {} is the most common category ({} responses)",
                title_case_field(&breakdown.field),
                most_common.category,
                most_common.count
            ));
        }
    }

    for results in &report.sentiment {
        findings.push(format!(
            "- {}: {} sentiment dominates the responses",
            results.column,
            dominant_sentiment(results)
        ));
    }

    let high_confidence = report
        .patterns
        .iter()
        .filter(|p| p.confidence >= 80.0)
        .count();
    if high_confidence > 0 {
        findings.push(format!(
            "- {} high-confidence patterns detected in the data",
            high_confidence
        ));
    }

    if findings.is_empty() {
        lines.push("No significant findings to report at this time.".to_string());
    } else {
        lines.extend(findings);
    }
    lines.push(String::new());
    lines
}

fn recommendations(report: &AnalysisReport) -> Vec<String> {
    let mut lines = section("RECOMMENDATIONS");

    let low_completeness: Vec<&str> = report
        .overview
        .data_quality
        .columns
        .iter()
        .filter(|c| c.completeness < 80.0)
        .map(|c| c.column.as_str())
        .collect();
    if !low_completeness.is_empty() {
        lines.push(format!(
            "- Improve data collection for columns with low completeness: {}",
            low_completeness.join(", ")
        ));
    }

    let negative_columns: Vec<&str> = report
        .sentiment
        .iter()
        .filter(|s| s.negative_pct > 30.0)
        .map(|s| s.column.as_str())
        .collect();
    if !negative_columns.is_empty() {
        lines.push(format!(
            "- Address concerns in columns with high negative sentiment: {}",
            negative_columns.join(", ")
        ));
    }

    let high_confidence = report
        .patterns
        .iter()
        .filter(|p| p.confidence >= 80.0)
        .count();
    if high_confidence > 0 {
        lines.push(format!(
            "- Investigate {} high-confidence patterns for actionable insights",
            high_confidence
        ));
    }

    lines.push("- Consider conducting follow-up surveys to validate findings".to_string());
    lines.push("- Implement targeted improvements based on demographic insights".to_string());
    lines.push("- Monitor sentiment trends over time for continuous improvement".to_string());
    lines.push("- Use statistical insights to inform decision-making processes".to_string());
    lines.push(String::new());

    lines
}

fn footer(report: &AnalysisReport) -> Vec<String> {
    vec![
        "=".repeat(80),
        "REPORT END".to_string(),
        "=".repeat(80),
        String::new(),
        "This report was generated automatically by the survey analyzer.".to_string(),
        "For questions or additional analysis, please contact the development team.".to_string(),
        String::new(),
        format!("Report generated on: {}", report.generated_at),
        "=".repeat(80),
    ]
}

/// Overall data quality label from mean completeness.
fn assess_data_quality(average_completeness: f64, no_data: bool) -> &'static str {
    if no_data {
        "Unknown"
    } else if average_completeness >= 90.0 {
        "Excellent"
    } else if average_completeness >= 80.0 {
        "Good"
    } else if average_completeness >= 70.0 {
        "Fair"
    } else {
        "Poor"
    }
}

/// The sentiment class holding the strict majority of a column's responses.
fn dominant_sentiment(results: &ColumnSentiment) -> &'static str {
    if results.positive_pct > results.negative_pct && results.positive_pct > results.neutral_pct {
        "Positive"
    } else if results.negative_pct > results.positive_pct
        && results.negative_pct > results.neutral_pct
    {
        "Negative"
    } else {
        "Neutral"
    }
}

/// Display form of a snake_case field or tag name.
fn title_case_field(field: &str) -> String {
    crate::utils::title_case(&field.replace('_', " "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::dataset::{Dataset, Record};
    use crate::patterns::PatternDetector;
    use crate::sentiment::SentimentAnalyzer;
    use crate::stats::StatsAnalyzer;
    use crate::summary::SurveySummary;

    fn record(pairs: &[(&str, &str)]) -> Record {
        let mut r = Record::new();
        for (k, v) in pairs {
            r.insert(*k, Some(v.to_string()));
        }
        r
    }

    fn sample_dataset() -> Dataset {
        Dataset::new(
            vec![
                "age".to_string(),
                "gender".to_string(),
                "satisfaction".to_string(),
                "feedback".to_string(),
            ],
            vec![
                record(&[
                    ("age", "25"),
                    ("gender", "Female"),
                    ("satisfaction", "High"),
                    ("feedback", "Great experience, really love the product"),
                ]),
                record(&[
                    ("age", "32"),
                    ("gender", "Male"),
                    ("satisfaction", "Low"),
                    ("feedback", "Terrible support and awful response times"),
                ]),
                record(&[
                    ("age", "41"),
                    ("gender", "Female"),
                    ("satisfaction", "High"),
                    ("feedback", "Excellent product, would happily recommend it"),
                ]),
            ],
        )
    }

    fn build_sample_report() -> AnalysisReport {
        let dataset = sample_dataset();
        let config = AnalyzerConfig::default();
        let overview = SurveySummary::new(&dataset, config.clone()).generate();
        let sentiment = SentimentAnalyzer::new(config.clone()).analyze_all_text_columns(&dataset);
        let patterns = PatternDetector::new(&dataset, config.clone()).find_patterns();
        let stats = StatsAnalyzer::new(&dataset, config);
        let classification = stats.column_classification();
        let crosstab = CrossTabAnalysis {
            column1: "gender".to_string(),
            column2: "satisfaction".to_string(),
            table: stats.cross_tabulate("gender", "satisfaction").unwrap(),
            chi_square: stats.chi_square_test("gender", "satisfaction").unwrap(),
            correlation: stats.correlation_analysis("gender", "satisfaction"),
        };

        ReportGenerator::build_report(ReportParams {
            input_file: "survey.csv",
            overview,
            sentiment,
            patterns,
            column_classification: classification,
            crosstab: Some(crosstab),
            associations: None,
        })
    }

    #[test]
    fn test_report_contains_all_sections() {
        let report = build_sample_report();
        let text = ReportGenerator::new().render_text(&report);

        for heading in [
            "SURVEY DATA ANALYSIS REPORT",
            "EXECUTIVE SUMMARY",
            "SURVEY OVERVIEW",
            "DEMOGRAPHIC ANALYSIS",
            "SENTIMENT ANALYSIS",
            "PATTERN ANALYSIS",
            "STATISTICAL ANALYSIS",
            "CROSS-TABULATION ANALYSIS",
            "KEY FINDINGS",
            "RECOMMENDATIONS",
            "REPORT END",
        ] {
            assert!(text.contains(heading), "missing section: {}", heading);
        }
    }

    #[test]
    fn test_report_id_format() {
        let report = build_sample_report();
        assert!(report.report_id.starts_with("SUR-"));
        assert_eq!(report.report_id.len(), "SUR-20240101-120000".len());
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = build_sample_report();
        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("\"overview\""));
        assert!(json.contains("\"patterns\""));
        assert!(json.contains("survey.csv"));
    }

    #[test]
    fn test_report_written_to_file() {
        let report = build_sample_report();
        let dir = std::env::temp_dir().join("survey_processing_report_test");
        let path = dir.join("report.txt");
        let written = ReportGenerator::new().write(&report, &path).unwrap();

        let content = fs::read_to_string(&written).unwrap();
        assert!(content.contains("SURVEY DATA ANALYSIS REPORT"));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_assess_data_quality_labels() {
        assert_eq!(assess_data_quality(95.0, false), "Excellent");
        assert_eq!(assess_data_quality(85.0, false), "Good");
        assert_eq!(assess_data_quality(75.0, false), "Fair");
        assert_eq!(assess_data_quality(50.0, false), "Poor");
        assert_eq!(assess_data_quality(0.0, true), "Unknown");
    }

    #[test]
    fn test_dominant_sentiment() {
        let mut results = ColumnSentiment {
            column: "feedback".to_string(),
            positive: 2,
            negative: 1,
            neutral: 0,
            positive_pct: 66.7,
            negative_pct: 33.3,
            neutral_pct: 0.0,
            avg_score: 2.0,
            total_responses: 3,
            top_positive_words: Vec::new(),
            top_negative_words: Vec::new(),
        };
        assert_eq!(dominant_sentiment(&results), "Positive");

        results.positive_pct = 20.0;
        results.negative_pct = 50.0;
        results.neutral_pct = 30.0;
        assert_eq!(dominant_sentiment(&results), "Negative");

        results.negative_pct = 30.0;
        results.neutral_pct = 50.0;
        assert_eq!(dominant_sentiment(&results), "Neutral");
    }

    #[test]
    fn test_recommendation_for_negative_sentiment() {
        let mut report = build_sample_report();
        // one of three feedback responses is negative: 33% > 30%
        let text = ReportGenerator::new().render_text(&report);
        assert!(text.contains("high negative sentiment: feedback"));

        report.sentiment.clear();
        let text = ReportGenerator::new().render_text(&report);
        assert!(!text.contains("high negative sentiment"));
    }
}
