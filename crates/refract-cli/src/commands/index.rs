//! Index command - build and save the profile index for a data file.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use colored::Colorize;

use super::{build_options, engine_for_file};

#[allow(clippy::too_many_arguments)]
pub async fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    sample_rows: usize,
    top_k_edges: usize,
    no_patterns: bool,
    no_distributions: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (refract, dataset_id) = engine_for_file(&file)?;

    println!(
        "{} {}",
        "Indexing".cyan().bold(),
        file.display().to_string().white()
    );

    let options = build_options(sample_rows, top_k_edges, no_patterns, no_distributions);
    let index = refract.build_index(&dataset_id, options).await?;

    if verbose {
        println!();
        println!("{}", "Columns:".yellow().bold());
        for col in &index.columns {
            let tags: Vec<&str> = col.tags.iter().map(|t| t.tag.as_str()).collect();
            println!(
                "  {:24} {:10} nulls {:>5.1}%  distinct {:>6}  {}",
                col.name,
                format!("{:?}", col.inferred_type),
                col.null_rate * 100.0,
                col.distinct_count,
                tags.join(", ")
            );
        }
        println!();
    }

    println!(
        "Profiled {} columns over {} sampled rows ({} total)",
        index.columns.len().to_string().white().bold(),
        index.limits.sample_rows.to_string().white(),
        index.total_rows.to_string().white()
    );
    println!(
        "Found {} key candidates, {} association edges, {} dataset tags",
        index.key_candidates.len().to_string().white().bold(),
        index.correlation_edges.len().to_string().white().bold(),
        index.dataset_tags.len().to_string().white().bold()
    );

    for note in &index.notes {
        println!(
            "{} {}: {}",
            "degraded".yellow().bold(),
            note.stage,
            note.message
        );
    }

    // The store already persisted <stem>.index.json next to the source;
    // honor an explicit output path with an extra copy.
    let default_path = file
        .parent()
        .unwrap_or_else(|| std::path::Path::new("."))
        .join(format!("{dataset_id}.index.json"));
    let saved_path = match output {
        Some(path) => {
            let writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(writer, &index)?;
            path
        }
        None => default_path,
    };

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        saved_path.display().to_string().white()
    );

    Ok(())
}
