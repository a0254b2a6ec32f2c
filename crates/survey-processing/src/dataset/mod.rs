//! The in-memory survey dataset model.
//!
//! A [`Dataset`] is an ordered sequence of [`Record`]s sharing one column
//! set. Values are optional trimmed strings: the loader normalizes empty
//! cells and missing-value markers to `None` before the dataset is built.
//! Once constructed a dataset is never mutated; every analyzer only reads it.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{AnalysisError, Result};

/// One survey response: a mapping from column name to optional value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    values: HashMap<String, Option<String>>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value for a column.
    pub fn insert(&mut self, column: impl Into<String>, value: Option<String>) {
        self.values.insert(column.into(), value);
    }

    /// Get the value for a column, if present and non-empty.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).and_then(|v| v.as_deref())
    }

    /// Number of columns carried by this record.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record carries no columns at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the record has at least one non-empty value.
    pub fn has_any_value(&self) -> bool {
        self.values.values().any(|v| v.is_some())
    }
}

/// The full ordered collection of survey records for one analysis session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset from an explicit column order and records.
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All records in load order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Whether the dataset has a column of the given name.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Fail with [`AnalysisError::ColumnNotFound`] if the column is absent.
    pub fn require_column(&self, column: &str) -> Result<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(AnalysisError::ColumnNotFound(column.to_string()))
        }
    }

    /// Iterate the non-empty values of one column in record order.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.records.iter().filter_map(move |r| r.get(column))
    }

    /// Count non-empty values in one column.
    pub fn non_empty_count(&self, column: &str) -> usize {
        self.column_values(column).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, Option<&str>)]) -> Record {
        let mut r = Record::new();
        for (k, v) in pairs {
            r.insert(*k, v.map(|s| s.to_string()));
        }
        r
    }

    fn sample_dataset() -> Dataset {
        Dataset::new(
            vec!["gender".to_string(), "satisfaction".to_string()],
            vec![
                record(&[("gender", Some("Female")), ("satisfaction", Some("High"))]),
                record(&[("gender", Some("Male")), ("satisfaction", None)]),
                record(&[("gender", None), ("satisfaction", Some("Low"))]),
            ],
        )
    }

    #[test]
    fn test_record_get_flattens_missing() {
        let r = record(&[("a", Some("x")), ("b", None)]);
        assert_eq!(r.get("a"), Some("x"));
        assert_eq!(r.get("b"), None);
        assert_eq!(r.get("missing_column"), None);
    }

    #[test]
    fn test_record_has_any_value() {
        assert!(record(&[("a", Some("x")), ("b", None)]).has_any_value());
        assert!(!record(&[("a", None), ("b", None)]).has_any_value());
    }

    #[test]
    fn test_column_values_skips_missing() {
        let dataset = sample_dataset();
        let values: Vec<&str> = dataset.column_values("satisfaction").collect();
        assert_eq!(values, vec!["High", "Low"]);
        assert_eq!(dataset.non_empty_count("gender"), 2);
    }

    #[test]
    fn test_require_column() {
        let dataset = sample_dataset();
        assert!(dataset.require_column("gender").is_ok());
        let err = dataset.require_column("income").unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_columns_preserve_order() {
        let dataset = sample_dataset();
        assert_eq!(dataset.columns(), &["gender", "satisfaction"]);
    }
}
