//! Sampled tabular data and source metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about the source a sample was drawn from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 fingerprint of the file contents. A changed fingerprint
    /// means the dataset was replaced and any existing index is stale.
    pub fingerprint: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows in the drawn sample (excluding header).
    pub sampled_rows: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the sample was drawn.
    pub sampled_at: DateTime<Utc>,
}

impl SourceMetadata {
    pub fn new(
        path: PathBuf,
        fingerprint: String,
        size_bytes: u64,
        format: String,
        sampled_rows: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            fingerprint,
            size_bytes,
            format,
            sampled_rows,
            column_count,
            sampled_at: Utc::now(),
        }
    }
}

/// A bounded sample of tabular data. All inference and statistics for one
/// build derive from exactly one of these (one draw per build).
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as raw strings (row-major order).
    pub rows: Vec<Vec<String>>,
    /// The delimiter used.
    pub delimiter: u8,
}

impl DataTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, delimiter: u8) -> Self {
        Self {
            headers,
            rows,
            delimiter,
        }
    }

    /// An empty table with no columns. Zero-row datasets still build.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), b',')
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of sampled rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Check if a value represents a missing/null value.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("nil")
            || trimmed == "."
            || trimmed == "-"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_null_value() {
        assert!(DataTable::is_null_value(""));
        assert!(DataTable::is_null_value("  "));
        assert!(DataTable::is_null_value("NA"));
        assert!(DataTable::is_null_value("n/a"));
        assert!(DataTable::is_null_value("NULL"));
        assert!(DataTable::is_null_value("."));
        assert!(DataTable::is_null_value("-"));
        assert!(!DataTable::is_null_value("value"));
        assert!(!DataTable::is_null_value("0"));
    }

    #[test]
    fn test_column_values_pads_short_rows() {
        let table = DataTable::new(
            vec!["a".into(), "b".into()],
            vec![vec!["1".into()], vec!["2".into(), "3".into()]],
            b',',
        );
        let col: Vec<&str> = table.column_values(1).collect();
        assert_eq!(col, vec!["", "3"]);
    }

    #[test]
    fn test_empty_table() {
        let table = DataTable::empty();
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.row_count(), 0);
    }
}
