//! Column type inference over a bounded sample.

use std::collections::HashSet;

use crate::input::DataTable;
use crate::profile::ColumnType;

use super::value::{parse_boolean, parse_date, parse_number};

/// Fraction of non-null sampled values that must parse for a parse-based
/// classification (Number, Date, Boolean) to win.
pub const CLASSIFY_THRESHOLD: f64 = 0.90;

/// Outcome of classifying one column's sample.
#[derive(Debug, Clone)]
pub struct TypeDecision {
    pub inferred_type: ColumnType,
    /// Sampled values including nulls.
    pub sampled_values: usize,
    pub null_count: usize,
    /// Distinct non-null values within the sample.
    pub distinct_count: usize,
}

impl TypeDecision {
    pub fn null_rate(&self) -> f64 {
        if self.sampled_values == 0 {
            0.0
        } else {
            self.null_count as f64 / self.sampled_values as f64
        }
    }
}

/// Classifies column types from sampled raw values.
///
/// Classification runs in fixed priority order (Number, then Date, then
/// Boolean, then the Category/String cardinality split) so identical
/// samples always produce identical types.
pub struct TypeSampler {
    threshold: f64,
}

impl TypeSampler {
    pub fn new() -> Self {
        Self {
            threshold: CLASSIFY_THRESHOLD,
        }
    }

    /// Classify a column by index from the sampled table.
    pub fn classify_column(&self, table: &DataTable, col_index: usize) -> TypeDecision {
        let values: Vec<&str> = table.column_values(col_index).collect();
        self.classify_values(&values)
    }

    /// Classify raw sampled values directly.
    pub fn classify_values(&self, values: &[&str]) -> TypeDecision {
        let sampled_values = values.len();

        let non_null: Vec<&str> = values
            .iter()
            .copied()
            .filter(|v| !DataTable::is_null_value(v))
            .collect();
        let null_count = sampled_values - non_null.len();

        let mut distinct: HashSet<&str> = HashSet::new();
        for v in &non_null {
            distinct.insert(v.trim());
        }
        let distinct_count = distinct.len();

        // An all-null column carries no evidence; it defaults to String
        // with null rate 1.0.
        if non_null.is_empty() {
            return TypeDecision {
                inferred_type: ColumnType::String,
                sampled_values,
                null_count,
                distinct_count: 0,
            };
        }

        let inferred_type = self.classify_non_null(&non_null, distinct_count);

        TypeDecision {
            inferred_type,
            sampled_values,
            null_count,
            distinct_count,
        }
    }

    fn classify_non_null(&self, non_null: &[&str], distinct_count: usize) -> ColumnType {
        let total = non_null.len();
        let needed = (total as f64 * self.threshold).ceil() as usize;

        let numeric = non_null
            .iter()
            .filter(|v| parse_number(v).is_some())
            .count();
        if numeric >= needed {
            return ColumnType::Number;
        }

        let dates = non_null.iter().filter(|v| parse_date(v).is_some()).count();
        if dates >= needed {
            return ColumnType::Date;
        }

        let booleans = non_null
            .iter()
            .filter(|v| parse_boolean(v).is_some())
            .count();
        if booleans >= needed {
            return ColumnType::Boolean;
        }

        let category_cutoff = self.category_cutoff(total);
        if distinct_count <= category_cutoff {
            ColumnType::Category
        } else {
            ColumnType::String
        }
    }

    /// Distinct-count cutoff below which a textual column is Category.
    pub fn category_cutoff(&self, sample_size: usize) -> usize {
        20usize.max(sample_size / 20)
    }
}

impl Default for TypeSampler {
    fn default() -> Self {
        Self::new()
    }
}
