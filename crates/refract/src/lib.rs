//! Refract: dataset profiling, indexing and chart recommendation for
//! tabular data.
//!
//! Refract draws one bounded sample from a tabular source and refracts it
//! into a structured index: inferred column types, per-column statistics,
//! candidate keys, cross-column associations and semantic role tags. The
//! index then drives a weighted chart recommendation scorer.
//!
//! # Core Principles
//!
//! - **Sampled, not exact**: every statistic derives from one bounded
//!   sample draw per build, with explicit accuracy/performance trade-offs
//! - **Deterministic**: identical input and options produce an identical
//!   index; tie-breaking is specified everywhere results are ranked
//! - **Degrades, not fails**: non-essential stages that error or time out
//!   leave their section empty with a recorded note; the build still
//!   completes
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use refract::{CsvQueryEngine, FileResolver, IndexBuildOptions, MemoryIndexStore, Refract};
//!
//! # async fn run() -> refract::Result<()> {
//! let resolver = Arc::new(FileResolver::new("sales", "data/sales.csv"));
//! let engine = Refract::new(
//!     Arc::new(CsvQueryEngine::new(resolver)),
//!     Arc::new(MemoryIndexStore::new()),
//! );
//!
//! let index = engine.build_index("sales", IndexBuildOptions::default()).await?;
//! for rec in engine.recommendations(&index) {
//!     println!("{:.2}  {}", rec.score, rec.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod assoc;
pub mod engine;
pub mod error;
pub mod infer;
pub mod input;
pub mod keys;
pub mod profile;
pub mod query;
pub mod recommend;
pub mod stats;
pub mod tags;

pub use engine::{
    dataset_id_for, CancelToken, IndexStatus, IndexStore, JsonIndexStore, MemoryIndexStore,
    Refract, RefractConfig, StatusRecord,
};
pub use error::{RefractError, Result};
pub use infer::{TypeDecision, TypeSampler};
pub use input::{DataTable, Parser, ParserConfig, SourceMetadata};
pub use profile::{
    ColumnProfile, ColumnTag, ColumnType, CorrelationEdge, DatasetIndex, DatasetTag,
    IndexBuildOptions, KeyCandidate, SemanticTag,
};
pub use query::{CsvQueryEngine, DirectoryResolver, FileResolver, QueryEngine, SourceResolver};
pub use recommend::{generate_recommendations, ChartRecommendation, ChartType};
