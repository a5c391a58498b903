//! Per-dataset build status: an explicit keyed record with a defined state
//! machine and a single-flight build guard per key.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Build status of a dataset's index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexStatus {
    /// No build has ever been requested.
    NotBuilt,
    /// A build is in flight.
    Building,
    /// The index is complete and read-only.
    Ready,
    /// The dataset was replaced or invalidated; the index no longer
    /// reflects it.
    Stale,
    /// The last build failed fatally. Retryable on the next request.
    Error,
}

impl IndexStatus {
    /// Legal transitions of the state machine.
    pub fn can_transition(self, to: IndexStatus) -> bool {
        use IndexStatus::*;
        matches!(
            (self, to),
            (NotBuilt, Building)
                | (Building, Ready)
                | (Building, Error)
                | (Ready, Building)
                | (Ready, Stale)
                | (Stale, Building)
                | (Error, Building)
        )
    }
}

#[derive(Debug, Clone)]
struct DatasetEntry {
    status: IndexStatus,
    updated_at: DateTime<Utc>,
    /// Human-readable reason for `Error` status.
    message: Option<String>,
    /// Serializes builds for this dataset id.
    build_lock: Arc<tokio::sync::Mutex<()>>,
}

impl DatasetEntry {
    fn new() -> Self {
        Self {
            status: IndexStatus::NotBuilt,
            updated_at: Utc::now(),
            message: None,
            build_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }
}

/// A point-in-time view of one dataset's status record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: IndexStatus,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Keyed status registry. The map lock is held only for entry lookup and
/// quick writes; builds themselves serialize on the per-dataset mutex, so
/// datasets never contend with each other.
pub struct StatusRegistry {
    entries: RwLock<HashMap<String, DatasetEntry>>,
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn status(&self, dataset_id: &str) -> IndexStatus {
        self.entries
            .read()
            .get(dataset_id)
            .map(|e| e.status)
            .unwrap_or(IndexStatus::NotBuilt)
    }

    pub fn record(&self, dataset_id: &str) -> StatusRecord {
        let entries = self.entries.read();
        match entries.get(dataset_id) {
            Some(e) => StatusRecord {
                status: e.status,
                updated_at: e.updated_at,
                message: e.message.clone(),
            },
            None => StatusRecord {
                status: IndexStatus::NotBuilt,
                updated_at: Utc::now(),
                message: None,
            },
        }
    }

    /// Transition a dataset's status. Illegal transitions are refused and
    /// logged; last legal write wins.
    pub fn transition(&self, dataset_id: &str, to: IndexStatus) -> bool {
        self.transition_with_message(dataset_id, to, None)
    }

    pub fn transition_with_message(
        &self,
        dataset_id: &str,
        to: IndexStatus,
        message: Option<String>,
    ) -> bool {
        let mut entries = self.entries.write();
        let entry = entries
            .entry(dataset_id.to_string())
            .or_insert_with(DatasetEntry::new);

        if !entry.status.can_transition(to) {
            warn!(
                dataset_id,
                from = ?entry.status,
                to = ?to,
                "refused illegal status transition"
            );
            return false;
        }

        entry.status = to;
        entry.updated_at = Utc::now();
        entry.message = message;
        true
    }

    /// The single-flight lock for a dataset id.
    pub fn build_lock(&self, dataset_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut entries = self.entries.write();
        entries
            .entry(dataset_id.to_string())
            .or_insert_with(DatasetEntry::new)
            .build_lock
            .clone()
    }
}

impl Default for StatusRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_dataset_is_not_built() {
        let registry = StatusRegistry::new();
        assert_eq!(registry.status("ghost"), IndexStatus::NotBuilt);
    }

    #[test]
    fn test_legal_build_cycle() {
        let registry = StatusRegistry::new();
        assert!(registry.transition("d", IndexStatus::Building));
        assert!(registry.transition("d", IndexStatus::Ready));
        assert!(registry.transition("d", IndexStatus::Stale));
        assert!(registry.transition("d", IndexStatus::Building));
        assert!(registry.transition("d", IndexStatus::Ready));
    }

    #[test]
    fn test_illegal_transitions_refused() {
        let registry = StatusRegistry::new();
        // NotBuilt -> Ready skips Building.
        assert!(!registry.transition("d", IndexStatus::Ready));
        assert_eq!(registry.status("d"), IndexStatus::NotBuilt);

        registry.transition("d", IndexStatus::Building);
        // Building -> Stale is not a thing; builds end Ready or Error.
        assert!(!registry.transition("d", IndexStatus::Stale));
    }

    #[test]
    fn test_error_is_retryable() {
        let registry = StatusRegistry::new();
        registry.transition("d", IndexStatus::Building);
        registry.transition_with_message("d", IndexStatus::Error, Some("boom".into()));
        assert_eq!(registry.status("d"), IndexStatus::Error);
        assert_eq!(registry.record("d").message.as_deref(), Some("boom"));
        assert!(registry.transition("d", IndexStatus::Building));
    }

    #[test]
    fn test_build_lock_is_shared_per_dataset() {
        let registry = StatusRegistry::new();
        let a = registry.build_lock("d");
        let b = registry.build_lock("d");
        assert!(Arc::ptr_eq(&a, &b));
        let other = registry.build_lock("e");
        assert!(!Arc::ptr_eq(&a, &other));
    }
}
