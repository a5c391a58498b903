//! CSV/TSV parser with delimiter detection.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use super::source::{DataTable, SourceMetadata};
use crate::error::{RefractError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum data rows to read. This is the sample bound: rows beyond it
    /// are never materialized.
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Parses tabular data files into bounded samples.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the sampled table and source metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| RefractError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let metadata = file.metadata().map_err(|e| RefractError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let size_bytes = metadata.len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| RefractError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let fingerprint = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents),
        };

        let data_table = self.parse_bytes(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        let source_metadata = SourceMetadata::new(
            path.to_path_buf(),
            fingerprint,
            size_bytes,
            format,
            data_table.row_count(),
            data_table.column_count(),
        );

        Ok((data_table, source_metadata))
    }

    /// Parse bytes directly. An empty input yields an empty table rather
    /// than an error: zero-row datasets still produce a (zero-column) index.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = if self.config.has_header {
            match reader.headers() {
                Ok(h) if !h.is_empty() => h.iter().map(|s| s.to_string()).collect(),
                Ok(_) => return Ok(DataTable::empty()),
                Err(e) => return Err(e.into()),
            }
        } else {
            match reader.records().next() {
                Some(Ok(record)) => (0..record.len())
                    .map(|i| format!("column_{}", i + 1))
                    .collect(),
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(DataTable::empty()),
            }
        };

        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Ok(DataTable::empty());
        }

        let expected_cols = headers.len();

        // Re-create the reader: header access consumed the first record.
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;
            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();

            while row.len() < expected_cols {
                row.push(String::new());
            }
            row.truncate(expected_cols);

            rows.push(row);
        }

        Ok(DataTable::new(headers, rows, delimiter))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> u8 {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return b',';
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts
                .iter()
                .map(|&c| (c as f64 - mean).powi(2))
                .sum::<f64>()
                / counts.len() as f64
        } else {
            0.0
        };

        // Consistent counts dominate; tab gets a slight bonus since it
        // rarely appears inside field values.
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    best_delimiter
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data), b'\t');
    }

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let data = b"name,age,city\nAlice,30,NYC\nBob,25,LA";
        let table = parser.parse_bytes(data, b',').unwrap();

        assert_eq!(table.headers, vec!["name", "age", "city"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 0), Some("Alice"));
        assert_eq!(table.get(1, 1), Some("25"));
    }

    #[test]
    fn test_parse_empty_input_yields_empty_table() {
        let parser = Parser::new();
        let table = parser.parse_bytes(b"", b',').unwrap();
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_parse_header_only() {
        let parser = Parser::new();
        let table = parser.parse_bytes(b"a,b,c\n", b',').unwrap();
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_max_rows_bounds_sample() {
        let parser = Parser::with_config(ParserConfig {
            max_rows: Some(2),
            ..ParserConfig::default()
        });
        let data = b"x\n1\n2\n3\n4\n";
        let table = parser.parse_bytes(data, b',').unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_ragged_rows_padded_and_truncated() {
        let parser = Parser::new();
        let data = b"a,b\n1\n2,3,4\n";
        let table = parser.parse_bytes(data, b',').unwrap();
        assert_eq!(table.get(0, 1), Some(""));
        assert_eq!(table.rows[1].len(), 2);
    }
}
