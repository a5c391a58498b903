//! Status command - show the stored index for a data file.

use std::path::PathBuf;

use colored::Colorize;
use serde_json::json;

use super::engine_for_file;

pub fn run(file: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (refract, dataset_id) = engine_for_file(&file)?;

    match refract.get_index(&dataset_id)? {
        Some(index) => {
            if json_output {
                let summary = json!({
                    "dataset_id": index.dataset_id,
                    "status": "ready",
                    "built_at": index.built_at,
                    "total_rows": index.total_rows,
                    "columns": index.columns.len(),
                    "key_candidates": index.key_candidates.len(),
                    "correlation_edges": index.correlation_edges.len(),
                    "notes": index.notes,
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{} {}", "Status:".cyan().bold(), "ready".green());
                println!("Built at:   {}", index.built_at);
                println!("Total rows: {}", index.total_rows);
                println!("Columns:    {}", index.columns.len());
                for note in &index.notes {
                    println!(
                        "{} {}: {}",
                        "degraded".yellow().bold(),
                        note.stage,
                        note.message
                    );
                }
            }
        }
        None => {
            if json_output {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "dataset_id": dataset_id,
                        "status": "not_built",
                    }))?
                );
            } else {
                println!("{} {}", "Status:".cyan().bold(), "not built".yellow());
                println!(
                    "Run {} to build the index",
                    format!("refract index {}", file.display()).cyan().bold()
                );
            }
        }
    }

    Ok(())
}
