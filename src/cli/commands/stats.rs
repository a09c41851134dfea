//! Stats command - show statistics for the live generation

use crate::cli::output::{colors, format_relative_time, print_header, print_json};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::storage::GenerationMetadata;
use crate::core::types::StatsReport;
use clap::Args;
use std::sync::Arc;

/// Arguments for the stats command
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// List every indexed file
    #[arg(long, short = 'f')]
    pub files: bool,
}

/// Execute the stats command
pub async fn execute(
    args: StatsArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = services.stats();

    if format == OutputFormat::Json {
        print_json(&report)?;
        return match report {
            StatsReport::Summary(_) => Ok(()),
            StatsReport::Error { error } => Err(error.into()),
        };
    }

    let summary = match report {
        StatsReport::Summary(summary) => summary,
        StatsReport::Error { error } => return Err(error.into()),
    };

    print_header("Index statistics");
    println!(
        "{} {}",
        colors::label("Generation:"),
        colors::generation(&summary.persist_dir)
    );
    // Missing for the default generation and for pre-metadata layouts
    if let Ok(metadata) = GenerationMetadata::read(&services.live_generation()) {
        println!(
            "{} {}",
            colors::label("Built:"),
            format_relative_time(&metadata.created_at)
        );
    }
    println!(
        "{} {} ({} files, {} packages)",
        colors::label("Chunks:"),
        colors::number(&summary.total_chunks.to_string()),
        colors::number(&summary.total_files.to_string()),
        colors::number(&summary.unique_packages.to_string())
    );
    println!(
        "{} {} chars",
        colors::label("Average chunk:"),
        colors::number(&summary.average_chunk_size.to_string())
    );
    println!(
        "{} size {}, overlap {}",
        colors::label("Splitter:"),
        summary.chunk_size,
        summary.chunk_overlap
    );
    println!(
        "{} {} (embeddings), {} (answers), k = {}",
        colors::label("Models:"),
        summary.embedding_model,
        summary.llm_model,
        summary.retriever_k
    );

    if args.files {
        println!();
        for file in &summary.files {
            println!("  {}", colors::file_path(file));
        }
    }

    Ok(())
}
