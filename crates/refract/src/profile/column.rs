//! Per-column profile and statistics.

use serde::{Deserialize, Serialize};

use super::types::{ColumnType, DateGranularity, SemanticTag};

/// One histogram bin over a numeric column. Bins are emitted in ascending
/// order and cover [lower, upper); the last bin is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Statistics for numeric columns. All values derive from the same sample
/// draw as the rest of the profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
    /// Equal-width bins, only when distributions were requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<Vec<HistogramBin>>,
    /// Number of parseable non-null values these statistics were computed from.
    pub sample_size: usize,
}

/// Statistics for date columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateStats {
    /// Earliest date in the sample (ISO-8601).
    pub min: String,
    /// Latest date in the sample (ISO-8601).
    pub max: String,
    pub granularity: DateGranularity,
    pub distinct_count: usize,
}

/// Statistics for string columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringStats {
    pub avg_length: f64,
    pub max_length: usize,
    /// Fixed-format token pattern matched by >= 90% of sampled values,
    /// when pattern detection was requested and one was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_pattern: Option<String>,
    pub sample_size: usize,
}

/// A frequent value with its occurrence count within the sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopValue {
    pub value: String,
    pub count: usize,
}

/// A scored role tag attached to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTag {
    pub tag: SemanticTag,
    /// Which rule family produced it ("type", "name" or "cardinality").
    pub source: String,
    /// Score in [0, 1].
    pub score: f64,
}

/// Profile of a single column, computed from one bounded sample draw.
/// Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Zero-based position in the table.
    pub position: usize,
    pub inferred_type: ColumnType,
    /// Fraction of sampled values that are null/empty, in [0, 1].
    pub null_rate: f64,
    /// Unique non-null values observed within the sample.
    pub distinct_count: usize,
    /// Total sampled values (including nulls).
    pub sampled_values: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string: Option<StringStats>,
    /// Most frequent sampled values, frequency descending, first-seen ties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_values: Vec<TopValue>,
    /// Role tags assigned by the semantic tagger, alphabetically sorted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<ColumnTag>,
}

impl ColumnProfile {
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
            inferred_type: ColumnType::String,
            null_rate: 0.0,
            distinct_count: 0,
            sampled_values: 0,
            numeric: None,
            date: None,
            string: None,
            top_values: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Ratio of distinct non-null values to sampled values, in [0, 1].
    pub fn distinct_ratio(&self) -> f64 {
        if self.sampled_values == 0 {
            0.0
        } else {
            self.distinct_count as f64 / self.sampled_values as f64
        }
    }

    /// Fraction of sampled values that are non-null.
    pub fn coverage(&self) -> f64 {
        1.0 - self.null_rate
    }

    pub fn has_tag(&self, tag: SemanticTag) -> bool {
        self.tags.iter().any(|t| t.tag == tag)
    }

    /// Whether this column plausibly identifies rows on its own.
    pub fn is_likely_identifier(&self) -> bool {
        self.has_tag(SemanticTag::Identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_ratio() {
        let mut p = ColumnProfile::new("id", 0);
        p.sampled_values = 1000;
        p.distinct_count = 980;
        assert!((p.distinct_ratio() - 0.98).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distinct_ratio_empty_sample() {
        let p = ColumnProfile::new("empty", 0);
        assert_eq!(p.distinct_ratio(), 0.0);
    }

    #[test]
    fn test_coverage() {
        let mut p = ColumnProfile::new("x", 0);
        p.null_rate = 0.25;
        assert!((p.coverage() - 0.75).abs() < f64::EPSILON);
    }
}
