//! Cross-tabulation, chi-square testing and correlation analysis.
//!
//! The chi-square p-value here is NOT a chi-square CDF. It is a simplified
//! piecewise-linear approximation reproduced exactly for behavioral
//! compatibility with the system this engine replaces; swapping in a proper
//! distribution would change `significant` flags on existing datasets.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::config::AnalyzerConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::utils::parse_numeric;

/// Marker message carried by statistically inapplicable results.
const INSUFFICIENT_DATA: &str = "Insufficient data for chi-square test";

/// Chi-square needs at least this many total observations.
const MIN_OBSERVATIONS: u64 = 5;

/// A contingency table between the distinct values of two columns.
///
/// `header` is `["", v2_1, v2_2, ...]` and each row carries the column-1
/// value label plus one co-occurrence count per column-2 value. Value labels
/// are sorted lexicographically on both axes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossTab {
    pub column1: String,
    pub column2: String,
    pub header: Vec<String>,
    pub rows: Vec<CrossTabRow>,
}

/// One labeled row of a cross-tabulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossTabRow {
    pub label: String,
    pub counts: Vec<u64>,
}

impl CrossTab {
    /// The observed count matrix, header row/column stripped.
    pub fn observed(&self) -> Vec<Vec<u64>> {
        self.rows.iter().map(|r| r.counts.clone()).collect()
    }

    /// Sum of all interior cells.
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| r.counts.iter().sum::<u64>()).sum()
    }

    /// Render as display cells, header first.
    pub fn to_table(&self) -> Vec<Vec<String>> {
        let mut table = vec![self.header.clone()];
        for row in &self.rows {
            let mut cells = vec![row.label.clone()];
            cells.extend(row.counts.iter().map(|c| c.to_string()));
            table.push(cells);
        }
        table
    }
}

/// Chi-square independence test result.
///
/// When the test is inapplicable the fields hold deterministic defaults
/// (`chi_square=0, p_value=1, df=0, significant=false`) and `error` is set;
/// inapplicability is a result, not a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChiSquareResult {
    pub chi_square: f64,
    pub p_value: f64,
    pub df: usize,
    pub significant: bool,
    pub observed: Vec<Vec<u64>>,
    pub expected: Vec<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChiSquareResult {
    fn insufficient_data() -> Self {
        Self {
            chi_square: 0.0,
            p_value: 1.0,
            df: 0,
            significant: false,
            observed: Vec::new(),
            expected: Vec::new(),
            error: Some(INSUFFICIENT_DATA.to_string()),
        }
    }
}

/// Pearson correlation result for a numeric column pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub correlation: f64,
    pub sample_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A chi-square test tagged with the column pair it tested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairwiseChiSquare {
    pub column1: String,
    pub column2: String,
    #[serde(flatten)]
    pub result: ChiSquareResult,
}

/// Column classification by value type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnClassification {
    pub total_responses: usize,
    pub total_columns: usize,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
}

/// Statistical analyzer over one dataset.
pub struct StatsAnalyzer<'a> {
    dataset: &'a Dataset,
    config: AnalyzerConfig,
}

impl<'a> StatsAnalyzer<'a> {
    /// Create an analyzer for a dataset.
    pub fn new(dataset: &'a Dataset, config: AnalyzerConfig) -> Self {
        Self { dataset, config }
    }

    /// Cross-tabulate two columns.
    ///
    /// Fails with `ColumnNotFound` when either column is absent.
    pub fn cross_tabulate(&self, col1: &str, col2: &str) -> Result<CrossTab> {
        self.dataset.require_column(col1)?;
        self.dataset.require_column(col2)?;

        let values1 = self.distinct_values(col1);
        let values2 = self.distinct_values(col2);

        let index1: HashMap<&str, usize> = values1
            .iter()
            .enumerate()
            .map(|(i, v)| (v.as_str(), i))
            .collect();
        let index2: HashMap<&str, usize> = values2
            .iter()
            .enumerate()
            .map(|(i, v)| (v.as_str(), i))
            .collect();

        let mut counts = vec![vec![0u64; values2.len()]; values1.len()];
        for record in self.dataset.records() {
            if let (Some(v1), Some(v2)) = (record.get(col1), record.get(col2))
                && let (Some(&i), Some(&j)) = (index1.get(v1.trim()), index2.get(v2.trim()))
            {
                counts[i][j] += 1;
            }
        }

        let mut header = vec![String::new()];
        header.extend(values2.iter().cloned());

        let rows = values1
            .into_iter()
            .zip(counts)
            .map(|(label, counts)| CrossTabRow { label, counts })
            .collect();

        Ok(CrossTab {
            column1: col1.to_string(),
            column2: col2.to_string(),
            header,
            rows,
        })
    }

    /// Chi-square test of independence between two categorical columns.
    pub fn chi_square_test(&self, col1: &str, col2: &str) -> Result<ChiSquareResult> {
        let crosstab = self.cross_tabulate(col1, col2)?;

        // fewer than 2 categories on either axis: test undefined
        if crosstab.rows.len() < 2 || crosstab.header.len() < 3 {
            debug!("Chi-square between {} and {}: too few categories", col1, col2);
            return Ok(ChiSquareResult::insufficient_data());
        }

        let observed = crosstab.observed();
        let total: u64 = crosstab.total();
        if total < MIN_OBSERVATIONS {
            debug!("Chi-square between {} and {}: only {} observations", col1, col2, total);
            return Ok(ChiSquareResult::insufficient_data());
        }

        let expected = expected_frequencies(&observed);

        let mut chi_square = 0.0;
        for (obs_row, exp_row) in observed.iter().zip(&expected) {
            for (&obs, &exp) in obs_row.iter().zip(exp_row) {
                if exp > 0.0 {
                    chi_square += (obs as f64 - exp).powi(2) / exp;
                }
            }
        }

        let df = (observed.len() - 1) * (observed[0].len() - 1);
        let p_value = chi_square_p_value(chi_square, df);
        let significant = p_value < self.config.significance_level;

        Ok(ChiSquareResult {
            chi_square,
            p_value,
            df,
            significant,
            observed,
            expected,
            error: None,
        })
    }

    /// Chi-square tests between a target column and every other column,
    /// sorted ascending by p-value.
    pub fn chi_square_all(&self, target: &str) -> Result<Vec<PairwiseChiSquare>> {
        self.dataset.require_column(target)?;

        let mut results = Vec::new();
        for column in self.dataset.columns() {
            if column == target {
                continue;
            }
            let result = self.chi_square_test(target, column)?;
            results.push(PairwiseChiSquare {
                column1: target.to_string(),
                column2: column.clone(),
                result,
            });
        }

        results.sort_by(|a, b| {
            a.result
                .p_value
                .partial_cmp(&b.result.p_value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(results)
    }

    /// Pearson correlation between two columns over records where both
    /// values parse as numbers.
    pub fn correlation_analysis(&self, col1: &str, col2: &str) -> CorrelationResult {
        let mut xs = Vec::new();
        let mut ys = Vec::new();

        for record in self.dataset.records() {
            let x = record.get(col1).and_then(parse_numeric);
            let y = record.get(col2).and_then(parse_numeric);
            if let (Some(x), Some(y)) = (x, y) {
                xs.push(x);
                ys.push(y);
            }
        }

        if xs.len() < 2 {
            return CorrelationResult {
                correlation: 0.0,
                sample_size: 0,
                strength: None,
                error: Some("Insufficient numeric data for correlation analysis".to_string()),
            };
        }

        let correlation = pearson(&xs, &ys);
        CorrelationResult {
            correlation,
            sample_size: xs.len(),
            strength: Some(interpret_correlation(correlation).to_string()),
            error: None,
        }
    }

    /// Classify every column as numeric or categorical.
    ///
    /// A column is numeric when more than half of its non-empty values parse
    /// as floating point numbers.
    pub fn column_classification(&self) -> ColumnClassification {
        let mut numeric_columns = Vec::new();
        let mut categorical_columns = Vec::new();

        for column in self.dataset.columns() {
            let mut total = 0usize;
            let mut numeric = 0usize;
            for value in self.dataset.column_values(column) {
                total += 1;
                if parse_numeric(value).is_some() {
                    numeric += 1;
                }
            }

            if total > 0 && (numeric as f64 / total as f64) > 0.5 {
                numeric_columns.push(column.clone());
            } else {
                categorical_columns.push(column.clone());
            }
        }

        ColumnClassification {
            total_responses: self.dataset.len(),
            total_columns: self.dataset.columns().len(),
            numeric_columns,
            categorical_columns,
        }
    }

    /// Sorted distinct non-empty trimmed values of one column.
    fn distinct_values(&self, column: &str) -> Vec<String> {
        let set: BTreeSet<String> = self
            .dataset
            .column_values(column)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        set.into_iter().collect()
    }
}

/// Expected cell frequencies under independence:
/// `row_total * col_total / grand_total`.
fn expected_frequencies(observed: &[Vec<u64>]) -> Vec<Vec<f64>> {
    if observed.is_empty() || observed[0].is_empty() {
        return Vec::new();
    }

    let rows = observed.len();
    let cols = observed[0].len();

    let row_totals: Vec<u64> = observed.iter().map(|r| r.iter().sum()).collect();
    let col_totals: Vec<u64> = (0..cols)
        .map(|j| observed.iter().map(|r| r[j]).sum())
        .collect();
    let total: u64 = row_totals.iter().sum();

    (0..rows)
        .map(|i| {
            (0..cols)
                .map(|j| {
                    if total > 0 {
                        (row_totals[i] * col_totals[j]) as f64 / total as f64
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect()
}

/// Simplified p-value approximation, reproduced verbatim for compatibility.
///
/// Piecewise linear in the statistic: close to 1 for small statistics,
/// falling toward 0 for large ones. Not derived from the chi-square CDF.
fn chi_square_p_value(chi_square: f64, df: usize) -> f64 {
    if df == 0 {
        return 1.0;
    }

    let df = df as f64;
    if chi_square < df {
        1.0 - chi_square / (df * 2.0)
    } else {
        (1.0 - chi_square / (df * 10.0)).max(0.0)
    }
}

/// Pearson correlation coefficient, population form.
///
/// Returns 0.0 when either column has zero variance.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return 0.0;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let numerator: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();
    let denominator_x: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();
    let denominator_y: f64 = y.iter().map(|yi| (yi - mean_y).powi(2)).sum();

    if denominator_x == 0.0 || denominator_y == 0.0 {
        return 0.0;
    }

    numerator / (denominator_x * denominator_y).sqrt()
}

/// Qualitative label for a correlation coefficient.
fn interpret_correlation(correlation: f64) -> &'static str {
    let abs = correlation.abs();
    if abs >= 0.8 {
        "Very Strong"
    } else if abs >= 0.6 {
        "Strong"
    } else if abs >= 0.4 {
        "Moderate"
    } else if abs >= 0.2 {
        "Weak"
    } else {
        "Very Weak"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;

    fn record(pairs: &[(&str, &str)]) -> Record {
        let mut r = Record::new();
        for (k, v) in pairs {
            let value = if v.is_empty() {
                None
            } else {
                Some(v.to_string())
            };
            r.insert(*k, value);
        }
        r
    }

    fn dataset(columns: &[&str], rows: &[&[(&str, &str)]]) -> Dataset {
        Dataset::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter().map(|r| record(r)).collect(),
        )
    }

    fn numeric_dataset(xs: &[&str], ys: &[&str]) -> Dataset {
        let rows: Vec<Vec<(&str, &str)>> = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| vec![("x", x), ("y", y)])
            .collect();
        let row_refs: Vec<&[(&str, &str)]> = rows.iter().map(|r| r.as_slice()).collect();
        dataset(&["x", "y"], &row_refs)
    }

    fn analyzer(dataset: &Dataset) -> StatsAnalyzer<'_> {
        StatsAnalyzer::new(dataset, AnalyzerConfig::default())
    }

    // ==================== cross_tabulate tests ====================

    #[test]
    fn test_crosstab_shape_and_counts() {
        let data = dataset(
            &["gender", "satisfaction"],
            &[
                &[("gender", "Male"), ("satisfaction", "High")],
                &[("gender", "Female"), ("satisfaction", "Low")],
                &[("gender", "Female"), ("satisfaction", "High")],
                &[("gender", "Male"), ("satisfaction", "")],
            ],
        );
        let crosstab = analyzer(&data).cross_tabulate("gender", "satisfaction").unwrap();

        // lexicographic ordering on both axes
        assert_eq!(crosstab.header, vec!["", "High", "Low"]);
        assert_eq!(crosstab.rows[0].label, "Female");
        assert_eq!(crosstab.rows[1].label, "Male");

        // every data row has 1 + |values2| cells
        for row in crosstab.to_table().iter().skip(1) {
            assert_eq!(row.len(), 1 + 2);
        }

        // interior sum equals records with both values present
        assert_eq!(crosstab.total(), 3);
        assert_eq!(crosstab.rows[0].counts, vec![1, 1]); // Female
        assert_eq!(crosstab.rows[1].counts, vec![1, 0]); // Male
    }

    #[test]
    fn test_crosstab_unknown_column() {
        let data = dataset(&["a"], &[&[("a", "x")]]);
        let err = analyzer(&data).cross_tabulate("a", "b").unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    // ==================== chi_square tests ====================

    #[test]
    fn test_chi_square_too_few_categories() {
        let data = dataset(
            &["a", "b"],
            &[
                &[("a", "only"), ("b", "x")],
                &[("a", "only"), ("b", "y")],
                &[("a", "only"), ("b", "x")],
                &[("a", "only"), ("b", "y")],
                &[("a", "only"), ("b", "x")],
            ],
        );
        let result = analyzer(&data).chi_square_test("a", "b").unwrap();
        assert_eq!(result.chi_square, 0.0);
        assert_eq!(result.p_value, 1.0);
        assert_eq!(result.df, 0);
        assert!(!result.significant);
        assert!(result.error.is_some());
    }

    #[test]
    fn test_chi_square_too_few_observations() {
        let data = dataset(
            &["a", "b"],
            &[
                &[("a", "x"), ("b", "p")],
                &[("a", "y"), ("b", "q")],
                &[("a", "x"), ("b", "q")],
                &[("a", "y"), ("b", "p")],
            ],
        );
        let result = analyzer(&data).chi_square_test("a", "b").unwrap();
        assert_eq!(result.df, 0);
        assert_eq!(result.p_value, 1.0);
        assert!(result.error.is_some());
    }

    #[test]
    fn test_chi_square_perfect_association() {
        // 3 Male->High, 3 Female->Low
        let mut rows: Vec<Vec<(&str, &str)>> = Vec::new();
        for _ in 0..3 {
            rows.push(vec![("gender", "Male"), ("satisfaction", "High")]);
            rows.push(vec![("gender", "Female"), ("satisfaction", "Low")]);
        }
        let row_refs: Vec<&[(&str, &str)]> = rows.iter().map(|r| r.as_slice()).collect();
        let data = dataset(&["gender", "satisfaction"], &row_refs);

        let result = analyzer(&data).chi_square_test("gender", "satisfaction").unwrap();
        assert!(result.error.is_none());
        assert!((result.chi_square - 6.0).abs() < 1e-9);
        assert_eq!(result.df, 1);
        // approximation formula: max(0, 1 - 6/10) = 0.4
        assert!((result.p_value - 0.4).abs() < 1e-9);
        assert_eq!(result.observed, vec![vec![0, 3], vec![3, 0]]);
        for row in &result.expected {
            for &e in row {
                assert!((e - 1.5).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_chi_square_p_value_formula() {
        assert_eq!(chi_square_p_value(5.0, 0), 1.0);
        // statistic below df: 1 - chi/(df*2)
        assert!((chi_square_p_value(1.0, 4) - (1.0 - 1.0 / 8.0)).abs() < 1e-9);
        // statistic at or above df: max(0, 1 - chi/(df*10))
        assert!((chi_square_p_value(6.0, 1) - 0.4).abs() < 1e-9);
        assert_eq!(chi_square_p_value(100.0, 1), 0.0);
    }

    #[test]
    fn test_chi_square_all_sorted_by_p_value() {
        let data = dataset(
            &["target", "related", "constant"],
            &[
                &[("target", "a"), ("related", "x"), ("constant", "k")],
                &[("target", "a"), ("related", "x"), ("constant", "k")],
                &[("target", "a"), ("related", "x"), ("constant", "k")],
                &[("target", "b"), ("related", "y"), ("constant", "k")],
                &[("target", "b"), ("related", "y"), ("constant", "k")],
                &[("target", "b"), ("related", "y"), ("constant", "k")],
            ],
        );
        let results = analyzer(&data).chi_square_all("target").unwrap();
        assert_eq!(results.len(), 2);
        // the associated column sorts before the degenerate one
        assert_eq!(results[0].column2, "related");
        assert!(results[0].result.p_value <= results[1].result.p_value);
        assert!(results[1].result.error.is_some());
    }

    // ==================== correlation tests ====================

    #[test]
    fn test_correlation_perfect_positive() {
        let data = numeric_dataset(&["1", "2", "3", "4", "5"], &["2", "4", "6", "8", "10"]);
        let result = analyzer(&data).correlation_analysis("x", "y");
        assert!((result.correlation - 1.0).abs() < 1e-5);
        assert_eq!(result.sample_size, 5);
        assert_eq!(result.strength.as_deref(), Some("Very Strong"));
    }

    #[test]
    fn test_correlation_perfect_negative() {
        let data = numeric_dataset(&["1", "2", "3", "4", "5"], &["10", "8", "6", "4", "2"]);
        let result = analyzer(&data).correlation_analysis("x", "y");
        assert!((result.correlation + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_correlation_zero_variance_guard() {
        let data = numeric_dataset(&["1", "2", "3", "4", "5"], &["1", "1", "1", "1", "1"]);
        let result = analyzer(&data).correlation_analysis("x", "y");
        assert_eq!(result.correlation, 0.0);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_correlation_skips_non_numeric_records() {
        let data = numeric_dataset(&["1", "two", "3"], &["2", "4", "6"]);
        let result = analyzer(&data).correlation_analysis("x", "y");
        assert_eq!(result.sample_size, 2);
    }

    #[test]
    fn test_correlation_insufficient_pairs() {
        let data = numeric_dataset(&["1", "abc"], &["2", "3"]);
        let result = analyzer(&data).correlation_analysis("x", "y");
        assert_eq!(result.correlation, 0.0);
        assert_eq!(result.sample_size, 0);
        assert!(result.error.is_some());
    }

    #[test]
    fn test_interpret_correlation_labels() {
        assert_eq!(interpret_correlation(0.85), "Very Strong");
        assert_eq!(interpret_correlation(-0.7), "Strong");
        assert_eq!(interpret_correlation(0.5), "Moderate");
        assert_eq!(interpret_correlation(-0.3), "Weak");
        assert_eq!(interpret_correlation(0.1), "Very Weak");
    }

    // ==================== classification tests ====================

    #[test]
    fn test_column_classification() {
        let data = dataset(
            &["age", "feedback"],
            &[
                &[("age", "25"), ("feedback", "fine")],
                &[("age", "30"), ("feedback", "good")],
                &[("age", "x"), ("feedback", "4")],
            ],
        );
        let classification = analyzer(&data).column_classification();
        assert_eq!(classification.numeric_columns, vec!["age"]);
        assert_eq!(classification.categorical_columns, vec!["feedback"]);
        assert_eq!(classification.total_columns, 2);
    }
}
