//! Heuristic pattern detection over survey responses.
//!
//! Four independent passes run over the dataset and their findings are
//! concatenated, then stably sorted by confidence so equal-confidence
//! patterns keep detection order:
//!
//! 1. demographic segment agreement (age ranges, region, education) and
//!    gender divergence,
//! 2. pairwise response relatedness ("correlation") between answer columns,
//! 3. frequent exact response combinations,
//! 4. rare-value outliers per answer column.
//!
//! The demographic grouping fields come from [`AnalyzerConfig`] and are
//! never treated as answer columns themselves.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::config::AnalyzerConfig;
use crate::dataset::{Dataset, Record};
use crate::utils::{most_common, ordered_counts, title_case};

/// Fixed age buckets used for demographic segmentation. Ages below 18 are
/// not bucketed.
const AGE_BUCKETS: [(&str, u32, u32); 6] = [
    ("18-25", 18, 25),
    ("26-35", 26, 35),
    ("36-45", 36, 45),
    ("46-55", 46, 55),
    ("56-65", 56, 65),
    ("65+", 66, u32::MAX),
];

/// Confidence weight and cap per segment pass.
const AGE_CONFIDENCE: (f64, f64) = (20.0, 90.0);
const REGION_CONFIDENCE: (f64, f64) = (25.0, 85.0);
const EDUCATION_CONFIDENCE: (f64, f64) = (20.0, 80.0);
const GENDER_CONFIDENCE: f64 = 75.0;
const OUTLIER_CONFIDENCE: f64 = 70.0;
const CORRELATION_CONFIDENCE_CAP: f64 = 90.0;
const COMBINATION_CONFIDENCE_CAP: f64 = 85.0;

/// Words whose presence marks a response as positive for the relatedness
/// check. Matched by substring containment, not word boundaries.
const RELATED_POSITIVE_WORDS: [&str; 7] = [
    "good",
    "great",
    "excellent",
    "satisfied",
    "happy",
    "like",
    "love",
];

/// Negative counterpart of [`RELATED_POSITIVE_WORDS`].
const RELATED_NEGATIVE_WORDS: [&str; 7] = [
    "bad",
    "poor",
    "terrible",
    "dissatisfied",
    "unhappy",
    "dislike",
    "hate",
];

/// How many response combinations the combination pass considers.
const TOP_COMBINATIONS: usize = 3;

/// A detected pattern with its confidence (0-100) and supporting sample size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    pub description: String,
    pub confidence: f64,
    pub sample_size: usize,
    #[serde(flatten)]
    pub details: PatternDetails,
}

/// Type-specific payload of a pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PatternDetails {
    #[serde(rename = "age_pattern")]
    Age {
        response: String,
        affected_groups: Vec<String>,
    },
    #[serde(rename = "gender_pattern")]
    Gender { details: Vec<GroupResponse> },
    #[serde(rename = "regional_pattern")]
    Regional {
        response: String,
        affected_regions: Vec<String>,
    },
    #[serde(rename = "education_pattern")]
    Education {
        response: String,
        affected_education_levels: Vec<String>,
    },
    #[serde(rename = "correlation_pattern")]
    Correlation {
        correlation_strength: f64,
        columns: Vec<String>,
    },
    #[serde(rename = "combination_pattern")]
    Combination {
        percentage: f64,
        combination: Vec<String>,
    },
    #[serde(rename = "outlier_pattern")]
    Outlier {
        column: String,
        outliers: Vec<OutlierValue>,
    },
}

impl PatternDetails {
    /// The stable type tag used in serialized output and report grouping.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Age { .. } => "age_pattern",
            Self::Gender { .. } => "gender_pattern",
            Self::Regional { .. } => "regional_pattern",
            Self::Education { .. } => "education_pattern",
            Self::Correlation { .. } => "correlation_pattern",
            Self::Combination { .. } => "combination_pattern",
            Self::Outlier { .. } => "outlier_pattern",
        }
    }
}

/// The most common response of one demographic group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResponse {
    pub group: String,
    pub response: String,
    pub count: usize,
    pub percentage: f64,
}

/// A rare response value with its frequency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierValue {
    pub value: String,
    pub count: usize,
    pub percentage: f64,
}

/// Heuristic pattern detector over one dataset.
pub struct PatternDetector<'a> {
    dataset: &'a Dataset,
    config: AnalyzerConfig,
}

impl<'a> PatternDetector<'a> {
    /// Create a detector for a dataset.
    pub fn new(dataset: &'a Dataset, config: AnalyzerConfig) -> Self {
        Self { dataset, config }
    }

    /// Run every detection pass and rank the findings by confidence,
    /// descending. Ties keep detection order (stable sort).
    pub fn find_patterns(&self) -> Vec<Pattern> {
        if self.dataset.is_empty() {
            return Vec::new();
        }

        let mut patterns = Vec::new();
        patterns.extend(self.demographic_patterns());
        patterns.extend(self.correlation_patterns());
        patterns.extend(self.combination_patterns());
        patterns.extend(self.outlier_patterns());

        patterns.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        debug!("Detected {} patterns", patterns.len());
        patterns
    }

    /// Columns holding survey answers, i.e. everything outside the
    /// demographic grouping set.
    fn response_columns(&self) -> Vec<&String> {
        self.dataset
            .columns()
            .iter()
            .filter(|c| !self.config.is_demographic(c))
            .collect()
    }

    // ========================================================================
    // Pass 1: demographic segments
    // ========================================================================

    fn demographic_patterns(&self) -> Vec<Pattern> {
        let mut patterns = Vec::new();

        if self.dataset.has_column("age") {
            let groups = self.age_groups();
            let (weight, cap) = AGE_CONFIDENCE;
            patterns.extend(self.segment_patterns_for_groups(
                &groups,
                weight,
                cap,
                "Age groups",
                |response, groups| PatternDetails::Age {
                    response,
                    affected_groups: groups,
                },
            ));
        }

        if self.dataset.has_column("gender") {
            patterns.extend(self.gender_patterns());
        }

        if self.dataset.has_column("region") {
            let groups = self.value_groups("region");
            let (weight, cap) = REGION_CONFIDENCE;
            patterns.extend(self.segment_patterns_for_groups(
                &groups,
                weight,
                cap,
                "Regions",
                |response, groups| PatternDetails::Regional {
                    response,
                    affected_regions: groups,
                },
            ));
        }

        if self.dataset.has_column("education") {
            let groups = self.value_groups("education");
            let (weight, cap) = EDUCATION_CONFIDENCE;
            patterns.extend(self.segment_patterns_for_groups(
                &groups,
                weight,
                cap,
                "Education levels",
                |response, groups| PatternDetails::Education {
                    response,
                    affected_education_levels: groups,
                },
            ));
        }

        patterns
    }

    /// Partition records into the fixed age buckets.
    fn age_groups(&self) -> Vec<(String, Vec<&Record>)> {
        let mut groups: Vec<(String, Vec<&Record>)> = AGE_BUCKETS
            .iter()
            .map(|(label, _, _)| (label.to_string(), Vec::new()))
            .collect();

        for record in self.dataset.records() {
            let Some(age) = record.get("age") else {
                continue;
            };
            if !crate::utils::is_digit_string(age) {
                continue;
            }
            let Ok(age) = age.parse::<u32>() else {
                continue;
            };
            if let Some(idx) = AGE_BUCKETS
                .iter()
                .position(|(_, lo, hi)| age >= *lo && age <= *hi)
            {
                groups[idx].1.push(record);
            }
        }

        groups
    }

    /// Partition records by the title-cased value of a demographic column,
    /// buckets ordered by first appearance.
    fn value_groups(&self, column: &str) -> Vec<(String, Vec<&Record>)> {
        let mut order: Vec<String> = Vec::new();
        let mut by_key: HashMap<String, Vec<&Record>> = HashMap::new();

        for record in self.dataset.records() {
            if let Some(value) = record.get(column) {
                let key = title_case(value.trim());
                if key.is_empty() {
                    continue;
                }
                if !by_key.contains_key(&key) {
                    order.push(key.clone());
                }
                by_key.entry(key).or_default().push(record);
            }
        }

        order
            .into_iter()
            .map(|key| {
                let records = by_key.remove(&key).unwrap_or_default();
                (key, records)
            })
            .collect()
    }

    /// Segment-agreement patterns for every answer column against one set of
    /// demographic buckets.
    ///
    /// Buckets sharing the same most-common response (at least two of them)
    /// produce a pattern whose confidence is `weight * bucket_count`, capped.
    fn segment_patterns_for_groups(
        &self,
        groups: &[(String, Vec<&Record>)],
        weight: f64,
        cap: f64,
        group_noun: &str,
        details: impl Fn(String, Vec<String>) -> PatternDetails,
    ) -> Vec<Pattern> {
        let mut patterns = Vec::new();

        for column in self.response_columns() {
            // most common response per bucket
            let mut bucket_responses: Vec<(&str, String)> = Vec::new();
            for (label, records) in groups {
                let values: Vec<&str> = records.iter().filter_map(|r| r.get(column)).collect();
                if values.is_empty() {
                    continue;
                }
                let counts = ordered_counts(values);
                if let Some((response, _)) = most_common(&counts) {
                    bucket_responses.push((label.as_str(), response));
                }
            }

            if bucket_responses.len() < 2 {
                continue;
            }

            // group buckets by shared response, first-appearance order
            let mut response_order: Vec<&str> = Vec::new();
            let mut buckets_by_response: HashMap<&str, Vec<&str>> = HashMap::new();
            for (label, response) in &bucket_responses {
                let entry = buckets_by_response.entry(response.as_str()).or_default();
                if entry.is_empty() {
                    response_order.push(response.as_str());
                }
                entry.push(*label);
            }

            for response in response_order {
                let labels = &buckets_by_response[response];
                if labels.len() < 2 {
                    continue;
                }

                let sample_size: usize = groups
                    .iter()
                    .filter(|(label, _)| labels.contains(&label.as_str()))
                    .map(|(_, records)| records.len())
                    .sum();
                let label_list: Vec<String> = labels.iter().map(|l| l.to_string()).collect();

                patterns.push(Pattern {
                    description: format!(
                        "{} {} most commonly responded '{}' to {}",
                        group_noun,
                        label_list.join(", "),
                        response,
                        column
                    ),
                    confidence: (weight * labels.len() as f64).min(cap),
                    sample_size,
                    details: details(response.to_string(), label_list),
                });
            }
        }

        patterns
    }

    /// Gender divergence: report answer columns where at least two gender
    /// groups disagree on their most common response.
    fn gender_patterns(&self) -> Vec<Pattern> {
        let groups = self.value_groups("gender");
        let mut patterns = Vec::new();

        for column in self.response_columns() {
            let mut responses: Vec<GroupResponse> = Vec::new();
            for (gender, records) in &groups {
                let values: Vec<&str> = records.iter().filter_map(|r| r.get(column)).collect();
                if values.is_empty() {
                    continue;
                }
                let counts = ordered_counts(values.iter().copied());
                if let Some((response, count)) = most_common(&counts) {
                    responses.push(GroupResponse {
                        group: gender.clone(),
                        response,
                        count,
                        percentage: (count as f64 / values.len() as f64) * 100.0,
                    });
                }
            }

            if responses.len() < 2 {
                continue;
            }
            let distinct: std::collections::HashSet<&str> =
                responses.iter().map(|r| r.response.as_str()).collect();
            if distinct.len() < 2 {
                continue;
            }

            let sample_size: usize = groups
                .iter()
                .filter(|(gender, _)| responses.iter().any(|r| &r.group == gender))
                .map(|(_, records)| records.len())
                .sum();

            patterns.push(Pattern {
                description: format!("Gender differences detected in {} responses", column),
                confidence: GENDER_CONFIDENCE,
                sample_size,
                details: PatternDetails::Gender { details: responses },
            });
        }

        patterns
    }

    // ========================================================================
    // Pass 2: response relatedness
    // ========================================================================

    fn correlation_patterns(&self) -> Vec<Pattern> {
        let columns = self.response_columns();
        let mut patterns = Vec::new();

        for (i, col1) in columns.iter().enumerate() {
            for col2 in columns.iter().skip(i + 1) {
                if let Some(pattern) = self.correlation_between(col1, col2) {
                    patterns.push(pattern);
                }
            }
        }

        patterns
    }

    fn correlation_between(&self, col1: &str, col2: &str) -> Option<Pattern> {
        let distinct1: std::collections::HashSet<&str> =
            self.dataset.column_values(col1).map(str::trim).collect();
        let distinct2: std::collections::HashSet<&str> =
            self.dataset.column_values(col2).map(str::trim).collect();
        if distinct1.len() < 2 || distinct2.len() < 2 {
            return None;
        }

        let mut total = 0usize;
        let mut related = 0usize;
        for record in self.dataset.records() {
            if let (Some(v1), Some(v2)) = (record.get(col1), record.get(col2)) {
                total += 1;
                if responses_related(v1.trim(), v2.trim()) {
                    related += 1;
                }
            }
        }

        if total == 0 {
            return None;
        }

        let ratio = related as f64 / total as f64;
        if ratio <= self.config.correlation_threshold {
            return None;
        }

        Some(Pattern {
            description: format!("Strong correlation detected between {} and {}", col1, col2),
            confidence: (ratio * 100.0).min(CORRELATION_CONFIDENCE_CAP),
            sample_size: total,
            details: PatternDetails::Correlation {
                correlation_strength: ratio,
                columns: vec![col1.to_string(), col2.to_string()],
            },
        })
    }

    // ========================================================================
    // Pass 3: frequent combinations
    // ========================================================================

    fn combination_patterns(&self) -> Vec<Pattern> {
        // one sorted `column:value` token list per record
        let mut combinations: Vec<Vec<String>> = Vec::new();
        for record in self.dataset.records() {
            let mut tokens: Vec<String> = self
                .dataset
                .columns()
                .iter()
                .filter_map(|col| record.get(col).map(|v| format!("{}:{}", col, v.trim())))
                .collect();
            if tokens.is_empty() {
                continue;
            }
            tokens.sort();
            combinations.push(tokens);
        }

        if combinations.is_empty() {
            return Vec::new();
        }

        // count exact combinations, remembering first appearance for stable
        // ranking of equal counts
        let mut counts: HashMap<&[String], (usize, usize)> = HashMap::new();
        for (idx, combo) in combinations.iter().enumerate() {
            let entry = counts.entry(combo.as_slice()).or_insert((0, idx));
            entry.0 += 1;
        }

        let mut ranked: Vec<(&[String], usize, usize)> = counts
            .into_iter()
            .map(|(combo, (count, first_idx))| (combo, count, first_idx))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked.truncate(TOP_COMBINATIONS);

        let total = combinations.len();
        let mut patterns = Vec::new();
        for (combo, count, _) in ranked {
            if count <= 1 {
                continue;
            }
            let percentage = (count as f64 / total as f64) * 100.0;
            if percentage <= self.config.combination_min_share {
                continue;
            }
            patterns.push(Pattern {
                description: format!("Common response combination: {}", combo.join(", ")),
                confidence: (percentage * 2.0).min(COMBINATION_CONFIDENCE_CAP),
                sample_size: count,
                details: PatternDetails::Combination {
                    percentage,
                    combination: combo.to_vec(),
                },
            });
        }

        patterns
    }

    // ========================================================================
    // Pass 4: rare-value outliers
    // ========================================================================

    fn outlier_patterns(&self) -> Vec<Pattern> {
        let mut patterns = Vec::new();

        for column in self.response_columns() {
            let values: Vec<&str> = self.dataset.column_values(column).collect();
            if values.is_empty() {
                continue;
            }

            let total = values.len();
            let threshold = total as f64 * self.config.outlier_share_threshold;

            let outliers: Vec<OutlierValue> = ordered_counts(values)
                .into_iter()
                .filter(|(_, count)| *count > 0 && *count as f64 <= threshold)
                .map(|(value, count)| OutlierValue {
                    value,
                    count,
                    percentage: (count as f64 / total as f64) * 100.0,
                })
                .collect();

            if outliers.is_empty() {
                continue;
            }

            patterns.push(Pattern {
                description: format!("Outlier responses detected in {}", column),
                confidence: OUTLIER_CONFIDENCE,
                sample_size: total,
                details: PatternDetails::Outlier {
                    column: column.clone(),
                    outliers,
                },
            });
        }

        patterns
    }
}

/// Whether two responses count as related: both contain a positive marker
/// word, both contain a negative marker word, or they are equal ignoring
/// case.
fn responses_related(response1: &str, response2: &str) -> bool {
    let r1 = response1.to_lowercase();
    let r2 = response2.to_lowercase();

    let r1_positive = RELATED_POSITIVE_WORDS.iter().any(|w| r1.contains(w));
    let r2_positive = RELATED_POSITIVE_WORDS.iter().any(|w| r2.contains(w));
    if r1_positive && r2_positive {
        return true;
    }

    let r1_negative = RELATED_NEGATIVE_WORDS.iter().any(|w| r1.contains(w));
    let r2_negative = RELATED_NEGATIVE_WORDS.iter().any(|w| r2.contains(w));
    if r1_negative && r2_negative {
        return true;
    }

    r1 == r2
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

    fn dataset(columns: &[&str], rows: Vec<Vec<(&str, &str)>>) -> Dataset {
        Dataset::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter().map(|r| record(r)).collect(),
        )
    }

    fn detector(data: &Dataset) -> PatternDetector<'_> {
        PatternDetector::new(data, AnalyzerConfig::default())
    }

    // ==================== ordering ====================

    #[test]
    fn test_patterns_sorted_by_confidence_descending() {
        // gender divergence (75) + outliers (70) in one dataset
        let mut rows = Vec::new();
        for _ in 0..10 {
            rows.push(vec![("gender", "Male"), ("pick", "A")]);
            rows.push(vec![("gender", "Female"), ("pick", "B")]);
        }
        rows.push(vec![("gender", "Male"), ("pick", "C")]); // rare value
        let data = dataset(&["gender", "pick"], rows);

        let patterns = detector(&data).find_patterns();
        assert!(!patterns.is_empty());
        for pair in patterns.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn test_empty_dataset_yields_no_patterns() {
        let data = dataset(&["a"], Vec::new());
        assert!(detector(&data).find_patterns().is_empty());
    }

    // ==================== segment agreement ====================

    #[test]
    fn test_age_groups_share_response() {
        let mut rows = Vec::new();
        // two buckets answer "Yes", one answers "No"
        for age in ["20", "22", "30", "33"] {
            rows.push(vec![("age", age), ("recommend", "Yes")]);
        }
        rows.push(vec![("age", "50"), ("recommend", "No")]);
        rows.push(vec![("age", "52"), ("recommend", "No")]);
        let data = dataset(&["age", "recommend"], rows);

        let patterns = detector(&data).find_patterns();
        let age_pattern = patterns
            .iter()
            .find(|p| p.details.type_tag() == "age_pattern")
            .expect("age pattern expected");

        assert!(age_pattern.description.contains("18-25, 26-35"));
        assert!(age_pattern.description.contains("'Yes'"));
        // weight 20 * 2 buckets
        assert_eq!(age_pattern.confidence, 40.0);
        assert_eq!(age_pattern.sample_size, 4);
        match &age_pattern.details {
            PatternDetails::Age {
                response,
                affected_groups,
            } => {
                assert_eq!(response, "Yes");
                assert_eq!(affected_groups, &["18-25", "26-35"]);
            }
            other => panic!("unexpected details: {:?}", other),
        }
    }

    #[test]
    fn test_age_confidence_capped() {
        // five buckets sharing one response: 5 * 20 = 100, capped at 90
        let mut rows = Vec::new();
        for age in ["20", "30", "40", "50", "60"] {
            rows.push(vec![("age", age), ("recommend", "Yes")]);
            rows.push(vec![("age", age), ("recommend", "Yes")]);
        }
        let data = dataset(&["age", "recommend"], rows);
        let patterns = detector(&data).find_patterns();
        let age_pattern = patterns
            .iter()
            .find(|p| p.details.type_tag() == "age_pattern")
            .unwrap();
        assert_eq!(age_pattern.confidence, 90.0);
    }

    #[test]
    fn test_non_numeric_ages_skipped() {
        let rows = vec![
            vec![("age", "young"), ("recommend", "Yes")],
            vec![("age", "25"), ("recommend", "Yes")],
        ];
        let data = dataset(&["age", "recommend"], rows);
        // only one populated bucket: no agreement possible
        assert!(
            detector(&data)
                .find_patterns()
                .iter()
                .all(|p| p.details.type_tag() != "age_pattern")
        );
    }

    #[test]
    fn test_regional_pattern_title_cases_buckets() {
        let mut rows = Vec::new();
        for region in ["north", "NORTH", "south", "SOUTH"] {
            rows.push(vec![("region", region), ("recommend", "Yes")]);
        }
        let data = dataset(&["region", "recommend"], rows);
        let patterns = detector(&data).find_patterns();
        let regional = patterns
            .iter()
            .find(|p| p.details.type_tag() == "regional_pattern")
            .expect("regional pattern expected");
        // two buckets (North, South), weight 25 each
        assert_eq!(regional.confidence, 50.0);
        match &regional.details {
            PatternDetails::Regional {
                affected_regions, ..
            } => assert_eq!(affected_regions, &["North", "South"]),
            other => panic!("unexpected details: {:?}", other),
        }
    }

    // ==================== gender divergence ====================

    #[test]
    fn test_gender_divergence_emits_fixed_confidence() {
        let rows = vec![
            vec![("gender", "Male"), ("pick", "A")],
            vec![("gender", "Male"), ("pick", "A")],
            vec![("gender", "Female"), ("pick", "B")],
            vec![("gender", "Female"), ("pick", "B")],
        ];
        let data = dataset(&["gender", "pick"], rows);
        let patterns = detector(&data).find_patterns();
        let gender = patterns
            .iter()
            .find(|p| p.details.type_tag() == "gender_pattern")
            .expect("gender pattern expected");
        assert_eq!(gender.confidence, 75.0);
        assert_eq!(gender.sample_size, 4);
        match &gender.details {
            PatternDetails::Gender { details } => {
                assert_eq!(details.len(), 2);
                assert!(details.iter().any(|d| d.group == "Male" && d.response == "A"));
            }
            other => panic!("unexpected details: {:?}", other),
        }
    }

    #[test]
    fn test_gender_agreement_emits_nothing() {
        let rows = vec![
            vec![("gender", "Male"), ("pick", "A")],
            vec![("gender", "Female"), ("pick", "A")],
        ];
        let data = dataset(&["gender", "pick"], rows);
        assert!(
            detector(&data)
                .find_patterns()
                .iter()
                .all(|p| p.details.type_tag() != "gender_pattern")
        );
    }

    // ==================== relatedness ====================

    #[test]
    fn test_responses_related_rules() {
        assert!(responses_related("very good", "great value")); // both positive
        assert!(responses_related("bad support", "terrible docs")); // both negative
        assert!(responses_related("Maybe", "maybe")); // case-insensitive equality
        assert!(!responses_related("good", "bad"));
        assert!(!responses_related("blue", "square"));
    }

    #[test]
    fn test_correlation_pattern_threshold() {
        let mut rows = Vec::new();
        for _ in 0..7 {
            rows.push(vec![("q1", "good service"), ("q2", "great docs")]);
        }
        rows.push(vec![("q1", "slow"), ("q2", "fine")]);
        rows.push(vec![("q1", "meh"), ("q2", "great docs")]);
        rows.push(vec![("q1", "good service"), ("q2", "fine")]);
        let data = dataset(&["q1", "q2"], rows);

        let patterns = detector(&data).find_patterns();
        let correlation = patterns
            .iter()
            .find(|p| p.details.type_tag() == "correlation_pattern")
            .expect("correlation pattern expected");
        // 7 of 10 pairs related
        assert_eq!(correlation.sample_size, 10);
        assert_eq!(correlation.confidence, 70.0);
        match &correlation.details {
            PatternDetails::Correlation {
                correlation_strength,
                columns,
            } => {
                assert!((correlation_strength - 0.7).abs() < 1e-9);
                assert_eq!(columns, &["q1", "q2"]);
            }
            other => panic!("unexpected details: {:?}", other),
        }
    }

    #[test]
    fn test_correlation_needs_two_distinct_values() {
        let rows = vec![
            vec![("q1", "good"), ("q2", "good")],
            vec![("q1", "good"), ("q2", "good")],
        ];
        let data = dataset(&["q1", "q2"], rows);
        assert!(
            detector(&data)
                .find_patterns()
                .iter()
                .all(|p| p.details.type_tag() != "correlation_pattern")
        );
    }

    // ==================== combinations ====================

    #[test]
    fn test_combination_pattern() {
        let mut rows = Vec::new();
        for _ in 0..3 {
            rows.push(vec![("q1", "Yes"), ("q2", "High")]);
        }
        rows.push(vec![("q1", "No"), ("q2", "Low")]);
        let data = dataset(&["q1", "q2"], rows);

        let patterns = detector(&data).find_patterns();
        let combination = patterns
            .iter()
            .find(|p| p.details.type_tag() == "combination_pattern")
            .expect("combination pattern expected");

        // 3 of 4 records: 75%, confidence capped at 85
        assert_eq!(combination.sample_size, 3);
        assert_eq!(combination.confidence, 85.0);
        match &combination.details {
            PatternDetails::Combination {
                percentage,
                combination,
            } => {
                assert!((percentage - 75.0).abs() < 1e-9);
                // tokens sorted lexicographically
                assert_eq!(combination, &["q1:Yes", "q2:High"]);
            }
            other => panic!("unexpected details: {:?}", other),
        }
    }

    #[test]
    fn test_combination_requires_repetition_and_share() {
        // every record unique: no combination may be reported
        let rows = vec![
            vec![("q1", "a")],
            vec![("q1", "b")],
            vec![("q1", "c")],
        ];
        let data = dataset(&["q1"], rows);
        assert!(
            detector(&data)
                .find_patterns()
                .iter()
                .all(|p| p.details.type_tag() != "combination_pattern")
        );
    }

    // ==================== outliers ====================

    #[test]
    fn test_outlier_flags_rare_value_only() {
        // 20 "A" and 1 "B": B holds ~4.8% <= 5%, A does not
        let mut rows = Vec::new();
        for _ in 0..20 {
            rows.push(vec![("pick", "A")]);
        }
        rows.push(vec![("pick", "B")]);
        let data = dataset(&["pick"], rows);

        let patterns = detector(&data).find_patterns();
        let outlier = patterns
            .iter()
            .find(|p| p.details.type_tag() == "outlier_pattern")
            .expect("outlier pattern expected");

        assert_eq!(outlier.confidence, 70.0);
        assert_eq!(outlier.sample_size, 21);
        match &outlier.details {
            PatternDetails::Outlier { column, outliers } => {
                assert_eq!(column, "pick");
                assert_eq!(outliers.len(), 1);
                assert_eq!(outliers[0].value, "B");
                assert_eq!(outliers[0].count, 1);
                assert!((outliers[0].percentage - 100.0 / 21.0).abs() < 1e-9);
            }
            other => panic!("unexpected details: {:?}", other),
        }
    }

    #[test]
    fn test_no_outliers_above_threshold() {
        // 10 A, 1 B out of 11: B holds ~9.1% > 5%, nothing reported
        let mut rows = Vec::new();
        for _ in 0..10 {
            rows.push(vec![("pick", "A")]);
        }
        rows.push(vec![("pick", "B")]);
        let data = dataset(&["pick"], rows);
        assert!(
            detector(&data)
                .find_patterns()
                .iter()
                .all(|p| p.details.type_tag() != "outlier_pattern")
        );
    }

    #[test]
    fn test_demographics_excluded_from_response_passes() {
        // a rare gender value must not produce an outlier pattern
        let mut rows = Vec::new();
        for _ in 0..20 {
            rows.push(vec![("gender", "Male"), ("pick", "A")]);
            rows.push(vec![("gender", "Male"), ("pick", "A")]);
        }
        rows.push(vec![("gender", "Other"), ("pick", "A")]);
        let data = dataset(&["gender", "pick"], rows);

        for pattern in detector(&data).find_patterns() {
            if let PatternDetails::Outlier { column, .. } = &pattern.details {
                assert_ne!(column, "gender");
            }
        }
    }
}
