//! Index persistence: the external store seam plus the bundled JSON and
//! in-memory implementations.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::error::{RefractError, Result};
use crate::profile::DatasetIndex;

/// Persists and loads a [`DatasetIndex`] by dataset id. Implementations
/// replace the stored index wholesale on save; there is no partial update.
pub trait IndexStore: Send + Sync {
    fn save(&self, index: &DatasetIndex) -> Result<()>;
    fn load(&self, dataset_id: &str) -> Result<Option<DatasetIndex>>;
    /// Remove the stored index. Idempotent.
    fn invalidate(&self, dataset_id: &str) -> Result<()>;
}

/// JSON-file store: one pretty-printed `<id>.index.json` per dataset.
pub struct JsonIndexStore {
    root: PathBuf,
}

impl JsonIndexStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn index_path(&self, dataset_id: &str) -> PathBuf {
        self.root.join(format!("{dataset_id}.index.json"))
    }
}

impl IndexStore for JsonIndexStore {
    fn save(&self, index: &DatasetIndex) -> Result<()> {
        let path = self.index_path(&index.dataset_id);

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    RefractError::Store(format!(
                        "failed to create directory '{}': {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        // Write to a sibling temp file and rename so a crash mid-write
        // never leaves a truncated index behind.
        let tmp = path.with_extension("json.tmp");
        let file = File::create(&tmp).map_err(|e| {
            RefractError::Store(format!("failed to create '{}': {e}", tmp.display()))
        })?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, index)
            .map_err(|e| RefractError::Store(format!("failed to serialize index: {e}")))?;

        fs::rename(&tmp, &path).map_err(|e| {
            RefractError::Store(format!("failed to replace '{}': {e}", path.display()))
        })?;

        Ok(())
    }

    fn load(&self, dataset_id: &str) -> Result<Option<DatasetIndex>> {
        let path = self.index_path(dataset_id);
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path).map_err(|e| {
            RefractError::Store(format!("failed to open '{}': {e}", path.display()))
        })?;
        let reader = BufReader::new(file);
        let index: DatasetIndex = serde_json::from_reader(reader).map_err(|e| {
            RefractError::Store(format!("failed to parse '{}': {e}", path.display()))
        })?;

        Ok(Some(index))
    }

    fn invalidate(&self, dataset_id: &str) -> Result<()> {
        let path = self.index_path(dataset_id);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                RefractError::Store(format!("failed to remove '{}': {e}", path.display()))
            })?;
        }
        Ok(())
    }
}

/// In-memory store for tests and embedded use.
#[derive(Default)]
pub struct MemoryIndexStore {
    indexes: RwLock<HashMap<String, DatasetIndex>>,
}

impl MemoryIndexStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IndexStore for MemoryIndexStore {
    fn save(&self, index: &DatasetIndex) -> Result<()> {
        self.indexes
            .write()
            .insert(index.dataset_id.clone(), index.clone());
        Ok(())
    }

    fn load(&self, dataset_id: &str) -> Result<Option<DatasetIndex>> {
        Ok(self.indexes.read().get(dataset_id).cloned())
    }

    fn invalidate(&self, dataset_id: &str) -> Result<()> {
        self.indexes.write().remove(dataset_id);
        Ok(())
    }
}

/// Derive a dataset id from a source path's file stem.
pub fn dataset_id_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{IndexBuildOptions, LimitsUsed};
    use chrono::Utc;
    use tempfile::TempDir;

    fn sample_index(id: &str) -> DatasetIndex {
        DatasetIndex {
            dataset_id: id.to_string(),
            built_at: Utc::now(),
            total_rows: 42,
            limits: LimitsUsed::from_options(&IndexBuildOptions::default()),
            columns: Vec::new(),
            key_candidates: Vec::new(),
            correlation_edges: Vec::new(),
            dataset_tags: Vec::new(),
            notes: Vec::new(),
        }
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = JsonIndexStore::new(dir.path());

        let index = sample_index("sales");
        store.save(&index).unwrap();

        let loaded = store.load("sales").unwrap().unwrap();
        assert_eq!(loaded.dataset_id, "sales");
        assert_eq!(loaded.total_rows, 42);
    }

    #[test]
    fn test_json_store_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let store = JsonIndexStore::new(dir.path());
        assert!(store.load("ghost").unwrap().is_none());
    }

    #[test]
    fn test_json_store_invalidate() {
        let dir = TempDir::new().unwrap();
        let store = JsonIndexStore::new(dir.path());
        store.save(&sample_index("s")).unwrap();
        store.invalidate("s").unwrap();
        assert!(store.load("s").unwrap().is_none());
        // Idempotent
        store.invalidate("s").unwrap();
    }

    #[test]
    fn test_memory_store_replaces_wholesale() {
        let store = MemoryIndexStore::new();
        let mut index = sample_index("d");
        store.save(&index).unwrap();
        index.total_rows = 7;
        store.save(&index).unwrap();
        assert_eq!(store.load("d").unwrap().unwrap().total_rows, 7);
    }

    #[test]
    fn test_dataset_id_for_path() {
        assert_eq!(dataset_id_for(Path::new("data/sales.csv")), "sales");
    }
}
