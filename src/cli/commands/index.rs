//! Index command - rebuild the index from the document root

use crate::cli::output::{colors, format_duration, print_json};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::RunIndexResponse;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Document root to index (defaults to the configured doc_path)
    pub path: Option<PathBuf>,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Execute the index command
///
/// A build that produces no chunks is reported and turned into an error
/// so the process exits non-zero.
pub async fn execute(
    args: IndexArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc_path = &services.config.indexing.doc_path;

    if !args.quiet && format == OutputFormat::Human {
        eprintln!(
            "Indexing {}...",
            colors::file_path(&doc_path.display().to_string())
        );
    }

    let start = Instant::now();
    let report = services.run_indexing().await;
    let elapsed = start.elapsed().as_secs_f64();
    let generation = report.generation.clone();
    let response = RunIndexResponse::from(report);

    match format {
        OutputFormat::Human => {
            if !args.quiet {
                for line in &response.debug {
                    eprintln!("  {}", colors::dim(line));
                }
            }
            if let Some(count) = response.count {
                println!(
                    "{} {} chunks in {}",
                    colors::success("Indexed"),
                    colors::number(&count.to_string()),
                    colors::number(&format_duration(elapsed))
                );
                if let Some(dir) = generation {
                    println!(
                        "{} {}",
                        colors::label("Generation:"),
                        colors::generation(&dir.display().to_string())
                    );
                }
            }
        }
        OutputFormat::Json => print_json(&response)?,
    }

    match response.count {
        Some(_) => Ok(()),
        None => Err(response.message.into()),
    }
}
