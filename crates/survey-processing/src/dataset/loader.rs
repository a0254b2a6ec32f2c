//! CSV loading and validation for survey datasets.
//!
//! Reads the file through polars with a fallback ladder (quoted, unquoted,
//! pre-cleaned in-memory), with schema inference disabled so every cell
//! arrives as a string. Cells are then normalized into the record model:
//! column keys lowercased with underscores, empty cells and missing-value
//! markers mapped to absent values, and rows failing basic sanity checks
//! (age range, gender vocabulary) dropped with a warning.

use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::MAX_FILE_SIZE;
use crate::dataset::{Dataset, Record};
use crate::error::{AnalysisError, Result};
use crate::utils::{normalize_key, normalize_value};

/// Gender values accepted by row validation, lowercase.
const VALID_GENDERS: [&str; 6] = ["male", "female", "m", "f", "other", "prefer not to say"];

/// Loads and validates survey data from CSV files.
pub struct DatasetLoader {
    max_file_size: u64,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetLoader {
    /// Create a loader with the default file-size limit.
    pub fn new() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
        }
    }

    /// Load and validate a survey CSV file.
    pub fn load(&self, path: &Path) -> Result<Dataset> {
        self.validate_file(path)?;

        info!("Loading survey data from: {}", path.display());
        let df = read_csv_with_fallbacks(path)?;
        debug!("CSV parsed: {} rows x {} columns", df.height(), df.width());

        let dataset = self.clean_and_validate(&df)?;
        info!(
            "Loaded {} survey responses with {} columns",
            dataset.len(),
            dataset.columns().len()
        );
        Ok(dataset)
    }

    fn validate_file(&self, path: &Path) -> Result<()> {
        let invalid = |reason: &str| AnalysisError::InvalidFile {
            path: path.display().to_string(),
            reason: reason.to_string(),
        };

        if !path.exists() {
            return Err(invalid("file not found"));
        }
        if !path.is_file() {
            return Err(invalid("path is not a file"));
        }

        let size = fs::metadata(path)?.len();
        if size == 0 {
            return Err(invalid("file is empty"));
        }
        if size > self.max_file_size {
            return Err(invalid(&format!(
                "file too large: {:.1}MB (max: {}MB)",
                size as f64 / (1024.0 * 1024.0),
                self.max_file_size / (1024 * 1024)
            )));
        }

        Ok(())
    }

    /// Normalize keys and values, validate rows, and assemble the dataset.
    fn clean_and_validate(&self, df: &DataFrame) -> Result<Dataset> {
        let raw_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();

        // normalized column order, first occurrence wins on collisions
        let mut columns: Vec<String> = Vec::new();
        for name in &raw_names {
            let key = normalize_key(name);
            if !key.is_empty() && !columns.contains(&key) {
                columns.push(key);
            }
        }

        // column-major string views; schema inference is disabled so every
        // column is a string column
        let mut column_data: Vec<(String, Vec<Option<&str>>)> = Vec::with_capacity(raw_names.len());
        for (name, column) in raw_names.iter().zip(df.get_columns()) {
            let key = normalize_key(name);
            if key.is_empty() {
                continue;
            }
            let series = column.as_materialized_series();
            let chunked = series.str()?;
            column_data.push((key, chunked.into_iter().collect()));
        }

        let total_rows = df.height();
        let mut records = Vec::with_capacity(total_rows);
        let mut invalid_rows = 0usize;

        for row_idx in 0..total_rows {
            let mut record = Record::new();
            for (key, values) in &column_data {
                let value = values[row_idx].and_then(normalize_value);
                record.insert(key.clone(), value);
            }

            if validate_record(&record) {
                records.push(record);
            } else {
                invalid_rows += 1;
                debug!("Dropping invalid row {}", row_idx + 1);
            }
        }

        info!(
            "Validation results: {} total rows, {} valid, {} invalid",
            total_rows,
            records.len(),
            invalid_rows
        );
        if invalid_rows > 0 {
            warn!("{} rows had validation issues and were dropped", invalid_rows);
        }

        if records.is_empty() {
            return Err(AnalysisError::EmptyDataset(
                "every row failed validation".to_string(),
            ));
        }

        Ok(Dataset::new(columns, records))
    }
}

/// Validate a single cleaned record.
///
/// A record needs at least two columns; an `age` value must be an integer in
/// [0, 120] and a `gender` value must come from the accepted vocabulary.
fn validate_record(record: &Record) -> bool {
    if record.len() < 2 {
        return false;
    }

    if let Some(age) = record.get("age") {
        match age.parse::<i64>() {
            Ok(age) if (0..=120).contains(&age) => {}
            _ => return false,
        }
    }

    if let Some(gender) = record.get("gender") {
        let lower = gender.to_lowercase();
        if !VALID_GENDERS.iter().any(|&g| g == lower) {
            return false;
        }
    }

    true
}

/// Read a CSV into an all-string DataFrame, trying progressively more
/// forgiving strategies.
fn read_csv_with_fallbacks(path: &Path) -> Result<DataFrame> {
    // Strategy 1: standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard CSV loading failed: {}", e);
        }
    }

    // Strategy 2: without quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("CSV loading without quotes failed: {}", e);
        }
    }

    // Strategy 3: pre-clean the content and parse from memory
    let content = fs::read_to_string(path)?;
    let cleaned = clean_csv_content(&content);
    let cursor = Cursor::new(cleaned);

    CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .into_reader_with_file_handle(cursor)
        .finish()
        .map_err(Into::into)
}

/// Strip malformed quoting and blank lines from raw CSV content.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Sample Data
// =============================================================================

/// The demo survey shipped with the tool, used by `--export-sample` and by
/// tests as a known fixture.
pub fn sample_rows() -> (Vec<&'static str>, Vec<[&'static str; 7]>) {
    let header = vec![
        "age",
        "gender",
        "region",
        "education",
        "satisfaction",
        "feedback",
        "recommend",
    ];
    let rows = vec![
        [
            "25",
            "Female",
            "North",
            "Bachelor",
            "Very Satisfied",
            "Great experience with the product!",
            "Yes",
        ],
        [
            "32",
            "Male",
            "South",
            "Master",
            "Satisfied",
            "Good but could be better.",
            "Yes",
        ],
        [
            "45",
            "Female",
            "East",
            "High School",
            "Neutral",
            "It was okay, nothing special.",
            "Maybe",
        ],
        [
            "28",
            "Male",
            "West",
            "Bachelor",
            "Dissatisfied",
            "Poor quality and bad service.",
            "No",
        ],
        [
            "35",
            "Female",
            "North",
            "PhD",
            "Very Satisfied",
            "Excellent product and amazing support!",
            "Yes",
        ],
    ];
    (header, rows)
}

/// Write the demo survey CSV to `path`.
pub fn export_sample_data(path: &Path) -> Result<()> {
    let (header, rows) = sample_rows();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(header.iter().map(|c| csv_escape(c)).collect::<Vec<_>>().join(","));
    for row in rows {
        lines.push(row.iter().map(|c| csv_escape(c)).collect::<Vec<_>>().join(","));
    }

    fs::write(path, lines.join("\n") + "\n")?;
    info!("Sample data exported to {}", path.display());
    Ok(())
}

/// Quote a CSV field when it contains separators or quotes.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
