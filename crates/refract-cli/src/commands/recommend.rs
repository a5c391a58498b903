//! Recommend command - rank chart candidates for a data file.

use std::path::PathBuf;

use colored::Colorize;
use refract::IndexBuildOptions;

use super::engine_for_file;

pub async fn run(
    file: PathBuf,
    limit: usize,
    json: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (refract, dataset_id) = engine_for_file(&file)?;

    // Reuse a stored index when one exists; build otherwise.
    let index = match refract.get_index(&dataset_id)? {
        Some(index) => index,
        None => {
            refract
                .build_index(&dataset_id, IndexBuildOptions::default())
                .await?
        }
    };

    let recommendations = refract.recommendations(&index);
    let shown = recommendations.iter().take(limit);

    if json {
        let list: Vec<_> = shown.collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if recommendations.is_empty() {
        println!("{}", "No chartable columns found.".yellow());
        return Ok(());
    }

    println!(
        "{} {}",
        "Recommendations for".cyan().bold(),
        file.display().to_string().white()
    );
    println!();

    for (rank, rec) in shown.enumerate() {
        println!(
            "{:>2}. {} {:>5.2}  {}",
            rank + 1,
            format!("[{:?}]", rec.chart_type).magenta(),
            rec.score,
            rec.title.white().bold()
        );
        println!("    {}", rec.rationale);
        if verbose {
            println!("    {}", rec.criteria.join("  ").dimmed());
        }
    }

    Ok(())
}
