//! The composite dataset index and its cross-column components.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::column::ColumnProfile;
use super::options::IndexBuildOptions;
use super::types::{AssociationMethod, Confidence, Direction, Strength};

/// A column set whose sampled values are unique enough to plausibly
/// identify a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyCandidate {
    /// Ordered column names; more than one entry means a composite key.
    pub columns: Vec<String>,
    /// Distinct tuples over sampled rows, in [0, 1]. Always >= the
    /// acceptance threshold for emitted candidates.
    pub uniqueness: f64,
    pub composite: bool,
}

impl KeyCandidate {
    pub fn single(column: impl Into<String>, uniqueness: f64) -> Self {
        Self {
            columns: vec![column.into()],
            uniqueness,
            composite: false,
        }
    }

    pub fn composite(columns: Vec<String>, uniqueness: f64) -> Self {
        Self {
            columns,
            uniqueness,
            composite: true,
        }
    }
}

/// A scored, typed relationship between two columns. Symmetric in value:
/// the edge for (a, b) carries the same coefficient as (b, a) would.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationEdge {
    pub column_a: String,
    pub column_b: String,
    pub method: AssociationMethod,
    pub coefficient: f64,
    pub strength: Strength,
    pub direction: Direction,
    pub confidence: Confidence,
}

/// A dataset-level heuristic tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetTag {
    pub name: String,
    /// Which rule family produced it ("tag-frequency" or "domain-hint").
    pub source: String,
    /// Score in [0, 1].
    pub score: f64,
}

/// A note recorded when a non-essential stage degraded. The build still
/// reaches `Ready`; the affected section is emitted empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildNote {
    pub stage: String,
    pub message: String,
}

/// The limits a build actually ran with, recorded on the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitsUsed {
    pub sample_rows: usize,
    pub max_columns_for_correlation: usize,
    pub top_k_edges_per_column: usize,
    /// Effective (clamped) histogram bin count.
    pub histogram_bins: usize,
}

impl LimitsUsed {
    pub fn from_options(options: &IndexBuildOptions) -> Self {
        Self {
            sample_rows: options.sample_rows,
            max_columns_for_correlation: options.max_columns_for_correlation,
            top_k_edges_per_column: options.top_k_edges_per_column,
            histogram_bins: options.clamped_histogram_bins(),
        }
    }
}

/// The structured statistical/semantic index for one dataset. Rebuilt
/// wholesale; read-only to all consumers once `Ready`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetIndex {
    pub dataset_id: String,
    pub built_at: DateTime<Utc>,
    /// Total rows in the source, from the full-scan count. The profiles
    /// themselves derive from the bounded sample only.
    pub total_rows: u64,
    pub limits: LimitsUsed,
    /// Profiles in original column order.
    pub columns: Vec<ColumnProfile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_candidates: Vec<KeyCandidate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub correlation_edges: Vec<CorrelationEdge>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dataset_tags: Vec<DatasetTag>,
    /// Degradation notes from non-essential stages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<BuildNote>,
}

impl DatasetIndex {
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Edges touching the named column.
    pub fn edges_for(&self, name: &str) -> impl Iterator<Item = &CorrelationEdge> {
        self.correlation_edges
            .iter()
            .filter(move |e| e.column_a == name || e.column_b == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with_edges(edges: Vec<CorrelationEdge>) -> DatasetIndex {
        DatasetIndex {
            dataset_id: "t".into(),
            built_at: Utc::now(),
            total_rows: 0,
            limits: LimitsUsed::from_options(&IndexBuildOptions::default()),
            columns: Vec::new(),
            key_candidates: Vec::new(),
            correlation_edges: edges,
            dataset_tags: Vec::new(),
            notes: Vec::new(),
        }
    }

    #[test]
    fn test_edges_for_matches_both_endpoints() {
        let edge = CorrelationEdge {
            column_a: "a".into(),
            column_b: "b".into(),
            method: AssociationMethod::Pearson,
            coefficient: 0.9,
            strength: Strength::High,
            direction: Direction::Positive,
            confidence: Confidence::High,
        };
        let index = index_with_edges(vec![edge]);
        assert_eq!(index.edges_for("a").count(), 1);
        assert_eq!(index.edges_for("b").count(), 1);
        assert_eq!(index.edges_for("c").count(), 0);
    }

    #[test]
    fn test_limits_record_clamped_bins() {
        let opts = IndexBuildOptions {
            histogram_bins: 500,
            ..Default::default()
        };
        let limits = LimitsUsed::from_options(&opts);
        assert_eq!(limits.histogram_bins, 50);
    }
}
