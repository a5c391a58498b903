//! Core type definitions for the dataset profile model.

use serde::{Deserialize, Serialize};

/// Inferred semantic type for a column.
///
/// Classification priority is fixed: Number before Date before Boolean
/// before Category/String. The order is part of the contract; it keeps
/// inference deterministic across rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Numeric values (integer or decimal, any supported separator style).
    Number,
    /// Calendar dates, any of the supported formats.
    Date,
    /// Boolean-like token values.
    Boolean,
    /// Low-cardinality discrete values.
    Category,
    /// Everything else, including all-null columns.
    String,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Number)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, ColumnType::Date)
    }

    /// Types treated as categorical by the association engine.
    pub fn is_categorical(&self) -> bool {
        matches!(self, ColumnType::Category | ColumnType::Boolean)
    }
}

impl Default for ColumnType {
    fn default() -> Self {
        ColumnType::String
    }
}

/// Heuristic role tag assigned to a column by the semantic tagger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SemanticTag {
    Identifier,
    Timestamp,
    Amount,
    Rate,
    Category,
    FreeText,
    Measure,
}

impl SemanticTag {
    /// Stable name used in dataset-level tag aggregation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticTag::Identifier => "identifier",
            SemanticTag::Timestamp => "timestamp",
            SemanticTag::Amount => "amount",
            SemanticTag::Rate => "rate",
            SemanticTag::Category => "category",
            SemanticTag::FreeText => "freeText",
            SemanticTag::Measure => "measure",
        }
    }
}

/// Detected calendar granularity of a date column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateGranularity {
    Day,
    Month,
    Year,
}

/// Method used to compute an association edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationMethod {
    /// Linear correlation between two numeric columns.
    Pearson,
    /// Rank correlation, reported when it reveals a monotone signal the
    /// Pearson coefficient missed.
    Spearman,
    /// Association between two categorical columns, normalized to [0, 1].
    CramersV,
    /// Variance explained for a numeric/categorical pair, in [0, 1].
    EtaSquared,
    /// Normalized mutual information fallback for mixed pairs, in [0, 1].
    MutualInformation,
}

impl AssociationMethod {
    /// Whether the coefficient carries a sign.
    pub fn is_signed(&self) -> bool {
        matches!(self, AssociationMethod::Pearson | AssociationMethod::Spearman)
    }
}

/// Strength label for an association edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Low,
    Medium,
    High,
}

impl Strength {
    /// Label from the absolute coefficient on a method-appropriate [0, 1]
    /// scale: < 0.2 Low, < 0.5 Medium, else High.
    pub fn from_coefficient(coefficient: f64) -> Self {
        let c = coefficient.abs();
        if c < 0.2 {
            Strength::Low
        } else if c < 0.5 {
            Strength::Medium
        } else {
            Strength::High
        }
    }
}

/// Direction label for an association edge. Unsigned methods report `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Positive,
    Negative,
    None,
}

/// Confidence label derived jointly from sample size and strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Small samples cap confidence regardless of strength: a strong signal
    /// on a sample under 1000 rows reports Medium, never High.
    pub fn from_sample(sample_size: usize, strength: Strength) -> Self {
        let by_sample = if sample_size < 100 {
            Confidence::Low
        } else if sample_size < 1000 {
            Confidence::Medium
        } else {
            Confidence::High
        };

        if strength == Strength::High && sample_size < 1000 {
            by_sample.min(Confidence::Medium)
        } else {
            by_sample
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strength_thresholds() {
        assert_eq!(Strength::from_coefficient(0.0), Strength::Low);
        assert_eq!(Strength::from_coefficient(-0.19), Strength::Low);
        assert_eq!(Strength::from_coefficient(0.2), Strength::Medium);
        assert_eq!(Strength::from_coefficient(-0.49), Strength::Medium);
        assert_eq!(Strength::from_coefficient(0.5), Strength::High);
        assert_eq!(Strength::from_coefficient(-1.0), Strength::High);
    }

    #[test]
    fn test_confidence_small_sample_high_strength_is_not_high() {
        let c = Confidence::from_sample(500, Strength::High);
        assert_eq!(c, Confidence::Medium);
    }

    #[test]
    fn test_confidence_large_sample() {
        assert_eq!(
            Confidence::from_sample(5000, Strength::High),
            Confidence::High
        );
        assert_eq!(Confidence::from_sample(50, Strength::Low), Confidence::Low);
    }

    #[test]
    fn test_signed_methods() {
        assert!(AssociationMethod::Pearson.is_signed());
        assert!(AssociationMethod::Spearman.is_signed());
        assert!(!AssociationMethod::CramersV.is_signed());
        assert!(!AssociationMethod::EtaSquared.is_signed());
        assert!(!AssociationMethod::MutualInformation.is_signed());
    }
}
