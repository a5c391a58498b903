//! The index build orchestrator.
//!
//! Sequences sampling, per-column statistics, and the cross-column stages
//! under bounded options; assembles and persists the result; tracks build
//! status. Stage calls go through explicit wrappers that add tracing,
//! timing and timeouts: essential stages abort the build, degradable
//! stages absorb their failure into a build note.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::assoc::{AssociationConfig, AssociationEngine};
use crate::error::{RefractError, Result};
use crate::infer::TypeSampler;
use crate::input::DataTable;
use crate::keys::KeyDetector;
use crate::profile::{
    BuildNote, ColumnProfile, CorrelationEdge, DatasetIndex, DatasetTag, IndexBuildOptions,
    KeyCandidate, LimitsUsed,
};
use crate::query::QueryEngine;
use crate::recommend::{generate_recommendations, ChartRecommendation};
use crate::stats::StatsComputer;
use crate::tags::SemanticTagger;

use super::cancel::CancelToken;
use super::status::{IndexStatus, StatusRecord, StatusRegistry};
use super::store::IndexStore;

/// Orchestrator configuration.
#[derive(Debug, Clone)]
pub struct RefractConfig {
    /// Timeout for each call into the tabular query engine.
    pub query_timeout: Duration,
    /// Timeout for each cross-column stage.
    pub stage_timeout: Duration,
}

impl Default for RefractConfig {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_secs(30),
            stage_timeout: Duration::from_secs(60),
        }
    }
}

/// The main profiling engine: builds, stores and serves dataset indexes.
pub struct Refract {
    query: Arc<dyn QueryEngine>,
    store: Arc<dyn IndexStore>,
    registry: StatusRegistry,
    config: RefractConfig,
}

impl Refract {
    pub fn new(query: Arc<dyn QueryEngine>, store: Arc<dyn IndexStore>) -> Self {
        Self::with_config(query, store, RefractConfig::default())
    }

    pub fn with_config(
        query: Arc<dyn QueryEngine>,
        store: Arc<dyn IndexStore>,
        config: RefractConfig,
    ) -> Self {
        Self {
            query,
            store,
            registry: StatusRegistry::new(),
            config,
        }
    }

    /// Build (or rebuild) the index for a dataset.
    ///
    /// Options are validated synchronously before any I/O; validation
    /// failures have no side effects. Concurrent build requests for the
    /// same dataset id serialize on a per-dataset lock, and a caller that
    /// waited out another build of the same dataset reuses its result
    /// instead of re-scanning.
    pub async fn build_index(
        &self,
        dataset_id: &str,
        options: IndexBuildOptions,
    ) -> Result<DatasetIndex> {
        self.build_index_cancellable(dataset_id, options, CancelToken::new())
            .await
    }

    pub async fn build_index_cancellable(
        &self,
        dataset_id: &str,
        options: IndexBuildOptions,
        cancel: CancelToken,
    ) -> Result<DatasetIndex> {
        options.validate()?;

        let requested_at = Utc::now();
        let lock = self.registry.build_lock(dataset_id);
        let _guard = lock.lock().await;

        // Single-flight reuse: if an index landed while this caller waited
        // for the lock, the expensive scan already happened.
        if self.registry.status(dataset_id) == IndexStatus::Ready {
            if let Some(existing) = self.store.load(dataset_id)? {
                if existing.built_at >= requested_at {
                    debug!(dataset_id, "reusing index from in-flight build");
                    return Ok(existing);
                }
            }
        }

        self.registry.transition(dataset_id, IndexStatus::Building);

        match self.run_build(dataset_id, &options, &cancel).await {
            Ok(index) => {
                self.registry.transition(dataset_id, IndexStatus::Ready);
                Ok(index)
            }
            Err(e) => {
                self.registry.transition_with_message(
                    dataset_id,
                    IndexStatus::Error,
                    Some(e.to_string()),
                );
                Err(e)
            }
        }
    }

    /// Load the stored index, if any. Lock-free with respect to builds of
    /// other datasets and never blocks on an in-flight rebuild.
    pub fn get_index(&self, dataset_id: &str) -> Result<Option<DatasetIndex>> {
        self.store.load(dataset_id)
    }

    pub fn index_status(&self, dataset_id: &str) -> IndexStatus {
        self.registry.status(dataset_id)
    }

    pub fn status_record(&self, dataset_id: &str) -> StatusRecord {
        self.registry.record(dataset_id)
    }

    /// Invalidate a dataset's index (e.g. the source was replaced). The
    /// stored index is dropped and a `Ready` status becomes `Stale`.
    pub fn invalidate(&self, dataset_id: &str) -> Result<()> {
        self.store.invalidate(dataset_id)?;
        self.registry.transition(dataset_id, IndexStatus::Stale);
        Ok(())
    }

    /// Ranked chart recommendations for an index. Pure function of the
    /// profile; provided here for convenience.
    pub fn recommendations(&self, index: &DatasetIndex) -> Vec<ChartRecommendation> {
        generate_recommendations(index)
    }

    async fn run_build(
        &self,
        dataset_id: &str,
        options: &IndexBuildOptions,
        cancel: &CancelToken,
    ) -> Result<DatasetIndex> {
        let build_start = Instant::now();
        info!(dataset_id, sample_rows = options.sample_rows, "build started");

        // Sampling stage: the only full scan plus the single sample draw.
        // Failures here are fatal.
        let total_rows = self
            .query_call("count_rows", self.query.count_rows(dataset_id))
            .await?;
        self.check_cancel(dataset_id, cancel)?;

        let (table, _meta) = self
            .query_call(
                "fetch_sample",
                self.query.fetch_sample(dataset_id, options.sample_rows),
            )
            .await?;
        self.check_cancel(dataset_id, cancel)?;

        let table = Arc::new(table);
        let limits = LimitsUsed::from_options(options);

        // A zero-row dataset builds successfully with an empty index.
        if table.row_count() == 0 {
            info!(dataset_id, "empty dataset; emitting empty index");
            let index = DatasetIndex {
                dataset_id: dataset_id.to_string(),
                built_at: Utc::now(),
                total_rows,
                limits,
                columns: Vec::new(),
                key_candidates: Vec::new(),
                correlation_edges: Vec::new(),
                dataset_tags: Vec::new(),
                notes: Vec::new(),
            };
            self.persist(dataset_id, &index)?;
            return Ok(index);
        }

        // Per-column statistics fan out and re-join: a synchronization
        // barrier before any cross-column stage may start.
        let profiles = Arc::new(
            self.profile_columns(dataset_id, table.clone(), options, cancel)
                .await?,
        );
        self.check_cancel(dataset_id, cancel)?;

        // Cross-column stages: independent of each other, degradable.
        let mut notes: Vec<BuildNote> = Vec::new();
        let assoc_config = AssociationConfig {
            max_columns: options.max_columns_for_correlation,
            top_k_per_column: options.top_k_edges_per_column,
        };

        let keys_task = {
            let table = table.clone();
            let profiles = profiles.clone();
            self.degradable_stage("key_detection", move || -> Vec<KeyCandidate> {
                KeyDetector::new().detect(&table, &profiles)
            })
        };
        let assoc_task = {
            let table = table.clone();
            let profiles = profiles.clone();
            self.degradable_stage("association", move || -> Vec<CorrelationEdge> {
                AssociationEngine::new(assoc_config).compute(&table, &profiles)
            })
        };
        let tags_task = {
            let profiles = profiles.clone();
            self.degradable_stage("dataset_tagging", move || -> Vec<DatasetTag> {
                SemanticTagger::new().tag_dataset(&profiles)
            })
        };

        let ((key_candidates, keys_note), (correlation_edges, assoc_note), (dataset_tags, tags_note)) =
            tokio::join!(keys_task, assoc_task, tags_task);

        notes.extend([keys_note, assoc_note, tags_note].into_iter().flatten());
        self.check_cancel(dataset_id, cancel)?;

        let index = DatasetIndex {
            dataset_id: dataset_id.to_string(),
            built_at: Utc::now(),
            total_rows,
            limits,
            columns: Arc::try_unwrap(profiles).unwrap_or_else(|arc| (*arc).clone()),
            key_candidates,
            correlation_edges,
            dataset_tags,
            notes,
        };

        self.persist(dataset_id, &index)?;
        info!(
            dataset_id,
            columns = index.columns.len(),
            edges = index.correlation_edges.len(),
            elapsed_ms = build_start.elapsed().as_millis() as u64,
            "build complete"
        );
        Ok(index)
    }

    /// Per-column profiling on a join set. Any failed column is fatal:
    /// an index with silently missing columns is worse than no index.
    async fn profile_columns(
        &self,
        dataset_id: &str,
        table: Arc<DataTable>,
        options: &IndexBuildOptions,
        cancel: &CancelToken,
    ) -> Result<Vec<ColumnProfile>> {
        let column_count = table.column_count();
        let mut set: JoinSet<(usize, ColumnProfile)> = JoinSet::new();

        for col in 0..column_count {
            if cancel.is_cancelled() {
                set.abort_all();
                return Err(RefractError::Cancelled {
                    dataset_id: dataset_id.to_string(),
                });
            }
            let table = table.clone();
            let options = options.clone();
            set.spawn_blocking(move || {
                let decision = TypeSampler::new().classify_column(&table, col);
                let computer = StatsComputer::new(options);
                let mut profile = computer.profile_column(&table, col, &decision);
                profile.tags = SemanticTagger::new().tag_column(&profile);
                (col, profile)
            });
        }

        let mut slots: Vec<Option<ColumnProfile>> = vec![None; column_count];
        while let Some(joined) = set.join_next().await {
            let (col, profile) = joined.map_err(|e| RefractError::Fatal {
                dataset_id: dataset_id.to_string(),
                message: format!("column profiling failed: {e}"),
            })?;
            slots[col] = Some(profile);
        }

        let profiles: Vec<ColumnProfile> = slots.into_iter().flatten().collect();
        if profiles.len() != column_count {
            return Err(RefractError::Fatal {
                dataset_id: dataset_id.to_string(),
                message: "not every column produced a profile".to_string(),
            });
        }
        Ok(profiles)
    }

    /// Wrapper for essential async calls: timeout + timing.
    async fn query_call<T>(
        &self,
        operation: &'static str,
        fut: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        let started = Instant::now();
        let result = tokio::time::timeout(self.config.query_timeout, fut)
            .await
            .map_err(|_| RefractError::Timeout {
                operation: operation.to_string(),
                millis: self.config.query_timeout.as_millis() as u64,
            })?;
        debug!(
            operation,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "query call finished"
        );
        result
    }

    /// Wrapper for degradable cross-column stages: tracing, timing and a
    /// timeout. A failed or timed-out stage yields its empty default plus
    /// a build note; the build proceeds.
    async fn degradable_stage<T>(
        &self,
        stage: &'static str,
        work: impl FnOnce() -> T + Send + 'static,
    ) -> (T, Option<BuildNote>)
    where
        T: Default + Send + 'static,
    {
        let started = Instant::now();
        let handle = tokio::task::spawn_blocking(work);

        match tokio::time::timeout(self.config.stage_timeout, handle).await {
            Ok(Ok(value)) => {
                debug!(
                    stage,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "stage complete"
                );
                (value, None)
            }
            Ok(Err(join_err)) => {
                warn!(stage, error = %join_err, "stage failed; section degraded");
                (
                    T::default(),
                    Some(BuildNote {
                        stage: stage.to_string(),
                        message: format!("stage failed: {join_err}"),
                    }),
                )
            }
            Err(_) => {
                warn!(stage, "stage timed out; section degraded");
                (
                    T::default(),
                    Some(BuildNote {
                        stage: stage.to_string(),
                        message: format!(
                            "stage timed out after {}ms",
                            self.config.stage_timeout.as_millis()
                        ),
                    }),
                )
            }
        }
    }

    fn check_cancel(&self, dataset_id: &str, cancel: &CancelToken) -> Result<()> {
        if cancel.is_cancelled() {
            Err(RefractError::Cancelled {
                dataset_id: dataset_id.to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn persist(&self, dataset_id: &str, index: &DatasetIndex) -> Result<()> {
        self.store.save(index).map_err(|e| {
            warn!(dataset_id, error = %e, "failed to persist index");
            e
        })
    }
}
