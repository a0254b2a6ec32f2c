//! Shared utilities for survey data handling.
//!
//! Common helpers used across the loader and analyzers: missing-value
//! markers, numeric parsing with survey-data semantics, casing, and plain
//! text table formatting for terminal output.

// =============================================================================
// Missing Value Handling
// =============================================================================

/// Markers that survey respondents (or exporting tools) use for "no answer".
pub const MISSING_MARKERS: [&str; 4] = ["na", "n/a", "null", "none"];

/// Check if a string is a missing-value marker.
pub fn is_missing_marker(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    MISSING_MARKERS.iter().any(|&marker| lower == marker)
}

/// Normalize a raw CSV cell into an optional trimmed value.
///
/// Empty strings and missing-value markers become `None`; everything else is
/// trimmed.
pub fn normalize_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || is_missing_marker(trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Normalize a column name: trim, lowercase, spaces to underscores.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

// =============================================================================
// Numeric Parsing
// =============================================================================

/// Try to parse a survey value as a floating point number.
pub fn parse_numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Check if a string is a plain non-negative integer (digits only).
///
/// Used for age handling: signed or decimal values are rejected the same way
/// the row validator rejects out-of-range ages.
pub fn is_digit_string(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Divide safely, returning `default` when the denominator is zero.
pub fn safe_divide(numerator: f64, denominator: f64, default: f64) -> f64 {
    if denominator == 0.0 {
        default
    } else {
        numerator / denominator
    }
}

// =============================================================================
// String Formatting
// =============================================================================

/// Title-case a value the way demographic buckets are keyed: the first letter
/// of each whitespace-separated word uppercased, the rest lowercased.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate text to a maximum length, appending an ellipsis.
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Format a value as a percentage of a total, one decimal place.
pub fn format_percentage(value: f64, total: f64) -> String {
    if total == 0.0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", (value / total) * 100.0)
}

/// Render rows of cells as an aligned text table with `|` separators.
///
/// Used for cross-tabulation display; the first row is treated as the header
/// when `has_header` is set.
pub fn format_table(rows: &[Vec<String>], has_header: bool) -> String {
    if rows.is_empty() {
        return "No data to display".to_string();
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut col_widths = vec![0usize; width];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            col_widths[i] = col_widths[i].max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (idx, row) in rows.iter().enumerate() {
        let line = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = col_widths[i]))
            .collect::<Vec<_>>()
            .join(" | ");
        let line_len = line.chars().count();
        lines.push(line);
        if has_header && idx == 0 {
            lines.push("-".repeat(line_len));
        }
    }

    lines.join("\n")
}

// =============================================================================
// Counting
// =============================================================================

/// Count occurrences of values, preserving first-occurrence order.
///
/// Returns `(value, count)` pairs ordered by when each value was first seen,
/// so downstream "most common" selections are deterministic and ties resolve
/// to the earliest value in record order.
pub fn ordered_counts<'a, I>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut order: Vec<String> = Vec::new();
    let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    for value in values {
        let entry = counts.entry(value.to_string()).or_insert(0);
        if *entry == 0 {
            order.push(value.to_string());
        }
        *entry += 1;
    }
    order
        .into_iter()
        .map(|v| {
            let c = counts[&v];
            (v, c)
        })
        .collect()
}

/// Pick the most frequent value from ordered counts.
///
/// Ties resolve to the value seen first.
pub fn most_common(counts: &[(String, usize)]) -> Option<(String, usize)> {
    let mut best: Option<&(String, usize)> = None;
    for entry in counts {
        match best {
            Some(current) if entry.1 <= current.1 => {}
            _ => best = Some(entry),
        }
    }
    best.cloned()
}

/// Take the top `n` entries by count from ordered counts.
///
/// Equal counts keep first-occurrence order.
pub fn top_n(counts: &[(String, usize)], n: usize) -> Vec<(String, usize)> {
    let mut sorted: Vec<(String, usize)> = counts.to_vec();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted.truncate(n);
    sorted
}

// =============================================================================
// Tests
// =============================================================================
