//! Build options with explicit range validation.

use serde::{Deserialize, Serialize};

use crate::error::{RefractError, Result};

/// Histogram bin bounds. Unlike the other limits, the bin count is clamped
/// into this range rather than rejected; this is the documented exception.
pub const MIN_HISTOGRAM_BINS: usize = 5;
pub const MAX_HISTOGRAM_BINS: usize = 50;

/// Options controlling an index build. All limits are validated before any
/// I/O happens; out-of-range values are a validation error, not silently
/// clamped (histogram bins excepted, see [`IndexBuildOptions::histogram_bins`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct IndexBuildOptions {
    /// Upper bound on columns considered by the association engine. [2, 50].
    pub max_columns_for_correlation: usize,
    /// Association edges retained per column. [1, 20].
    pub top_k_edges_per_column: usize,
    /// Sample size drawn from the source. [1000, 100000].
    pub sample_rows: usize,
    /// Whether to run fixed-format pattern detection on string columns.
    pub include_string_patterns: bool,
    /// Whether to emit histograms for numeric columns.
    pub include_distributions: bool,
    /// Requested histogram bin count; clamped into [5, 50] at use.
    pub histogram_bins: usize,
}

impl Default for IndexBuildOptions {
    fn default() -> Self {
        Self {
            max_columns_for_correlation: 20,
            top_k_edges_per_column: 5,
            sample_rows: 10_000,
            include_string_patterns: true,
            include_distributions: true,
            histogram_bins: 20,
        }
    }
}

impl IndexBuildOptions {
    /// Validate every documented range. Called synchronously by the
    /// orchestrator before any source access.
    pub fn validate(&self) -> Result<()> {
        if !(2..=50).contains(&self.max_columns_for_correlation) {
            return Err(RefractError::Validation(format!(
                "max_columns_for_correlation must be in [2, 50], got {}",
                self.max_columns_for_correlation
            )));
        }
        if !(1..=20).contains(&self.top_k_edges_per_column) {
            return Err(RefractError::Validation(format!(
                "top_k_edges_per_column must be in [1, 20], got {}",
                self.top_k_edges_per_column
            )));
        }
        if !(1000..=100_000).contains(&self.sample_rows) {
            return Err(RefractError::Validation(format!(
                "sample_rows must be in [1000, 100000], got {}",
                self.sample_rows
            )));
        }
        Ok(())
    }

    /// The effective histogram bin count after clamping.
    pub fn clamped_histogram_bins(&self) -> usize {
        self.histogram_bins
            .clamp(MIN_HISTOGRAM_BINS, MAX_HISTOGRAM_BINS)
    }
}
