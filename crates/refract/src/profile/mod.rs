//! Dataset profile data model: column profiles, statistics, the composite
//! index and build options.

mod column;
mod index;
mod options;
mod types;

pub use column::{
    ColumnProfile, ColumnTag, DateStats, HistogramBin, NumericStats, StringStats, TopValue,
};
pub use index::{
    BuildNote, CorrelationEdge, DatasetIndex, DatasetTag, KeyCandidate, LimitsUsed,
};
pub use options::{IndexBuildOptions, MAX_HISTOGRAM_BINS, MIN_HISTOGRAM_BINS};
pub use types::{
    AssociationMethod, ColumnType, Confidence, DateGranularity, Direction, SemanticTag, Strength,
};
