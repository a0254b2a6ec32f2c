//! Keyword-based sentiment scoring of free-text survey responses.
//!
//! A text is normalized, tokenized, and walked left to right. Sentiment
//! keywords add or subtract their weight; a keyword preceded (within three
//! tokens) by a negation word flips sign and is recorded under the opposite
//! match list; intensifiers amplify the final score. Classification uses the
//! fixed (-1.0, 1.0] neutral band, so a lone weight-1 word stays neutral.

pub mod vocabulary;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::AnalyzerConfig;
use crate::dataset::Dataset;
use crate::utils::{ordered_counts, safe_divide, top_n};
use vocabulary::{INTENSIFIER_WORDS, NEGATION_WORDS, NEGATIVE_KEYWORDS, POSITIVE_KEYWORDS};

/// How far back a negation word reaches, in tokens.
const NEGATION_WINDOW: usize = 3;

/// Score amplification added per intensifier seen.
const INTENSIFIER_STEP: f64 = 0.2;

/// Scores above this are positive, below its negation negative.
const SENTIMENT_THRESHOLD: f64 = 1.0;

/// How many top matched words a column summary keeps.
const TOP_WORDS: usize = 5;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static PUNCTUATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s']").expect("valid regex"));

/// Sentiment classification of one text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Neutral => write!(f, "neutral"),
        }
    }
}

/// Result of scoring one text response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentResult {
    pub sentiment: Sentiment,
    pub score: f64,
    pub positive_words: Vec<String>,
    pub negative_words: Vec<String>,
    /// Fraction of tokens that matched a sentiment keyword, capped at 1.0.
    pub confidence: f64,
    pub total_words: usize,
    pub sentiment_words: usize,
}

impl SentimentResult {
    /// The neutral result returned for empty input.
    fn neutral() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            score: 0.0,
            positive_words: Vec::new(),
            negative_words: Vec::new(),
            confidence: 0.0,
            total_words: 0,
            sentiment_words: 0,
        }
    }
}

/// Aggregated sentiment over every non-empty value of one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSentiment {
    pub column: String,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub positive_pct: f64,
    pub negative_pct: f64,
    pub neutral_pct: f64,
    pub avg_score: f64,
    pub total_responses: usize,
    /// Most frequent matched positive words, with counts.
    pub top_positive_words: Vec<(String, usize)>,
    /// Most frequent matched negative words, with counts.
    pub top_negative_words: Vec<(String, usize)>,
}

impl ColumnSentiment {
    fn empty(column: &str) -> Self {
        Self {
            column: column.to_string(),
            positive: 0,
            negative: 0,
            neutral: 0,
            positive_pct: 0.0,
            negative_pct: 0.0,
            neutral_pct: 0.0,
            avg_score: 0.0,
            total_responses: 0,
            top_positive_words: Vec::new(),
            top_negative_words: Vec::new(),
        }
    }
}

/// Keyword-based sentiment analyzer.
#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer {
    config: AnalyzerConfig,
}

impl SentimentAnalyzer {
    /// Create an analyzer with the given configuration.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Score a single text response.
    ///
    /// Deterministic and pure: the same input always produces the same
    /// result.
    pub fn analyze_text(&self, text: &str) -> SentimentResult {
        if text.trim().is_empty() {
            return SentimentResult::neutral();
        }

        let cleaned = clean_text(text);
        let words: Vec<&str> = cleaned.split_whitespace().collect();

        let mut score = 0.0;
        let mut positive_words = Vec::new();
        let mut negative_words = Vec::new();
        let mut intensifier_count = 0usize;

        for (i, &word) in words.iter().enumerate() {
            if INTENSIFIER_WORDS.contains_key(word) {
                intensifier_count += 1;
                continue;
            }

            let negated = is_negated(&words, i);

            if let Some(&weight) = POSITIVE_KEYWORDS.get(word) {
                if negated {
                    score -= weight as f64;
                    negative_words.push(word.to_string());
                } else {
                    score += weight as f64;
                    positive_words.push(word.to_string());
                }
            } else if let Some(&weight) = NEGATIVE_KEYWORDS.get(word) {
                if negated {
                    score += weight as f64;
                    positive_words.push(word.to_string());
                } else {
                    score -= weight as f64;
                    negative_words.push(word.to_string());
                }
            }
        }

        if intensifier_count > 0 {
            score *= 1.0 + intensifier_count as f64 * INTENSIFIER_STEP;
        }

        let total_words = words.len();
        let sentiment_words = positive_words.len() + negative_words.len();
        let confidence = (sentiment_words as f64 / total_words.max(1) as f64).min(1.0);

        SentimentResult {
            sentiment: categorize(score),
            score,
            positive_words,
            negative_words,
            confidence,
            total_words,
            sentiment_words,
        }
    }

    /// Aggregate sentiment over all non-empty values in one column.
    ///
    /// A column that is absent or holds no values yields the all-zero
    /// summary rather than an error, so sweeps over heterogeneous datasets
    /// never abort.
    pub fn analyze_column(&self, dataset: &Dataset, column: &str) -> ColumnSentiment {
        if !dataset.has_column(column) {
            return ColumnSentiment::empty(column);
        }

        let results: Vec<SentimentResult> = dataset
            .column_values(column)
            .map(|text| self.analyze_text(text))
            .collect();

        if results.is_empty() {
            return ColumnSentiment::empty(column);
        }

        let total = results.len();
        let positive = results
            .iter()
            .filter(|r| r.sentiment == Sentiment::Positive)
            .count();
        let negative = results
            .iter()
            .filter(|r| r.sentiment == Sentiment::Negative)
            .count();
        let neutral = total - positive - negative;

        let avg_score = results.iter().map(|r| r.score).sum::<f64>() / total as f64;

        let all_positive: Vec<&str> = results
            .iter()
            .flat_map(|r| r.positive_words.iter().map(String::as_str))
            .collect();
        let all_negative: Vec<&str> = results
            .iter()
            .flat_map(|r| r.negative_words.iter().map(String::as_str))
            .collect();

        ColumnSentiment {
            column: column.to_string(),
            positive,
            negative,
            neutral,
            positive_pct: safe_divide(positive as f64, total as f64, 0.0) * 100.0,
            negative_pct: safe_divide(negative as f64, total as f64, 0.0) * 100.0,
            neutral_pct: safe_divide(neutral as f64, total as f64, 0.0) * 100.0,
            avg_score,
            total_responses: total,
            top_positive_words: top_n(&ordered_counts(all_positive), TOP_WORDS),
            top_negative_words: top_n(&ordered_counts(all_negative), TOP_WORDS),
        }
    }

    /// Find the free-text columns of a dataset.
    ///
    /// A column qualifies when, among the first `text_sample_rows` records,
    /// more than `text_column_ratio` of its non-empty values are longer than
    /// `text_min_length` characters. Heuristic thresholds, tunable through
    /// [`AnalyzerConfig`].
    pub fn text_columns(&self, dataset: &Dataset) -> Vec<String> {
        let sample = &dataset.records()[..dataset.len().min(self.config.text_sample_rows)];

        dataset
            .columns()
            .iter()
            .filter(|column| {
                let mut total_count = 0usize;
                let mut text_count = 0usize;
                for record in sample {
                    if let Some(value) = record.get(column) {
                        total_count += 1;
                        if value.chars().count() > self.config.text_min_length {
                            text_count += 1;
                        }
                    }
                }
                total_count > 0
                    && (text_count as f64 / total_count as f64) > self.config.text_column_ratio
            })
            .cloned()
            .collect()
    }

    /// Run the sentiment sweep over every detected text column.
    pub fn analyze_all_text_columns(&self, dataset: &Dataset) -> Vec<ColumnSentiment> {
        self.text_columns(dataset)
            .iter()
            .map(|column| self.analyze_column(dataset, column))
            .collect()
    }
}

/// Normalize text for matching: lowercase, collapse whitespace, strip
/// punctuation while keeping apostrophes for contractions.
fn clean_text(text: &str) -> String {
    let lower = text.to_lowercase();
    let collapsed = WHITESPACE_RE.replace_all(&lower, " ");
    let stripped = PUNCTUATION_RE.replace_all(&collapsed, " ");
    stripped.trim().to_string()
}

/// Whether any of the up to [`NEGATION_WINDOW`] preceding tokens negates the
/// token at `index`.
fn is_negated(words: &[&str], index: usize) -> bool {
    let start = index.saturating_sub(NEGATION_WINDOW);
    words[start..index].iter().any(|w| NEGATION_WORDS.contains(w))
}

/// Map a score onto a sentiment class. The neutral band is inclusive of
/// exactly +/-1.0.
fn categorize(score: f64) -> Sentiment {
    if score > SENTIMENT_THRESHOLD {
        Sentiment::Positive
    } else if score < -SENTIMENT_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}
