//! Command implementations.

pub mod index;
pub mod recommend;
pub mod status;

use std::path::Path;
use std::sync::Arc;

use refract::{
    dataset_id_for, CsvQueryEngine, FileResolver, IndexBuildOptions, JsonIndexStore, Refract,
};

/// Wire up a Refract engine for a single data file: the dataset id is the
/// file stem and the index lives next to the source.
pub fn engine_for_file(file: &Path) -> Result<(Refract, String), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let dataset_id = dataset_id_for(file);
    let parent = file.parent().unwrap_or_else(|| Path::new("."));
    let resolver = Arc::new(FileResolver::new(dataset_id.clone(), file));
    let refract = Refract::new(
        Arc::new(CsvQueryEngine::new(resolver)),
        Arc::new(JsonIndexStore::new(parent)),
    );

    Ok((refract, dataset_id))
}

/// Shared option assembly for commands that build.
pub fn build_options(
    sample_rows: usize,
    top_k_edges: usize,
    no_patterns: bool,
    no_distributions: bool,
) -> IndexBuildOptions {
    IndexBuildOptions {
        sample_rows,
        top_k_edges_per_column: top_k_edges,
        include_string_patterns: !no_patterns,
        include_distributions: !no_distributions,
        ..Default::default()
    }
}
