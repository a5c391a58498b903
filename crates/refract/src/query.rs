//! External collaborator seams: the tabular query engine and the
//! file/storage resolver.
//!
//! The core only ever issues bounded, read-only operations through
//! [`QueryEngine`]; the bundled [`CsvQueryEngine`] is the reference
//! implementation used by the CLI and the test suite. Every call is
//! wrapped in a timeout by the orchestrator's stage decorator.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{RefractError, Result};
use crate::input::{DataTable, Parser, ParserConfig, SourceMetadata};

/// Maps a dataset id to a readable source.
pub trait SourceResolver: Send + Sync {
    /// Resolve a dataset id to a path, or `NotFound` if absent.
    fn resolve(&self, dataset_id: &str) -> Result<PathBuf>;
}

/// Resolves dataset ids against a root directory, trying the bare id and
/// common tabular extensions.
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceResolver for DirectoryResolver {
    fn resolve(&self, dataset_id: &str) -> Result<PathBuf> {
        let bare = self.root.join(dataset_id);
        if bare.is_file() {
            return Ok(bare);
        }
        for ext in ["csv", "tsv", "txt"] {
            let candidate = self.root.join(format!("{dataset_id}.{ext}"));
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        Err(RefractError::NotFound {
            dataset_id: dataset_id.to_string(),
        })
    }
}

/// Resolves exactly one dataset id to one file. Used by the CLI, where the
/// dataset is the file the user pointed at.
pub struct FileResolver {
    dataset_id: String,
    path: PathBuf,
}

impl FileResolver {
    pub fn new(dataset_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            path: path.into(),
        }
    }
}

impl SourceResolver for FileResolver {
    fn resolve(&self, dataset_id: &str) -> Result<PathBuf> {
        if dataset_id == self.dataset_id && self.path.is_file() {
            Ok(self.path.clone())
        } else {
            Err(RefractError::NotFound {
                dataset_id: dataset_id.to_string(),
            })
        }
    }
}

/// Read-only, bounded access to a dataset's rows.
///
/// `fetch_sample` draws the deterministic bounded prefix every build stage
/// shares; `count_rows` is the only full-scan operation and never
/// materializes column data.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn fetch_sample(
        &self,
        dataset_id: &str,
        limit: usize,
    ) -> Result<(DataTable, SourceMetadata)>;

    async fn count_rows(&self, dataset_id: &str) -> Result<u64>;
}

/// File-backed query engine over CSV/TSV sources.
pub struct CsvQueryEngine {
    resolver: Arc<dyn SourceResolver>,
}

impl CsvQueryEngine {
    pub fn new(resolver: Arc<dyn SourceResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl QueryEngine for CsvQueryEngine {
    async fn fetch_sample(
        &self,
        dataset_id: &str,
        limit: usize,
    ) -> Result<(DataTable, SourceMetadata)> {
        let path = self.resolver.resolve(dataset_id)?;
        debug!(dataset_id, limit, path = %path.display(), "drawing sample");

        // Parsing is blocking file I/O; keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            let parser = Parser::with_config(ParserConfig {
                max_rows: Some(limit),
                ..ParserConfig::default()
            });
            parser.parse_file(&path)
        })
        .await
        .map_err(|e| RefractError::Store(format!("sample task failed: {e}")))?
    }

    async fn count_rows(&self, dataset_id: &str) -> Result<u64> {
        let path = self.resolver.resolve(dataset_id)?;

        tokio::task::spawn_blocking(move || count_data_rows(&path))
            .await
            .map_err(|e| RefractError::Store(format!("count task failed: {e}")))?
    }
}

/// Count data rows (excluding the header) without materializing fields.
fn count_data_rows(path: &Path) -> Result<u64> {
    let file = File::open(path).map_err(|e| RefractError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut reader = BufReader::new(file);
    let mut buf = [0u8; 64 * 1024];
    let mut newlines: u64 = 0;
    let mut last_byte = b'\n';

    loop {
        let n = reader.read(&mut buf).map_err(|e| RefractError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if n == 0 {
            break;
        }
        newlines += buf[..n].iter().filter(|&&b| b == b'\n').count() as u64;
        last_byte = buf[n - 1];
    }

    let mut lines = newlines;
    if last_byte != b'\n' {
        lines += 1;
    }

    // First line is the header.
    Ok(lines.saturating_sub(1))
}
