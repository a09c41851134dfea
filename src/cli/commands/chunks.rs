//! Chunks command - print the chunks indexed for a source path

use crate::cli::output::{colors, print_json, print_warning};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::FileChunksResponse;
use clap::Args;
use std::sync::Arc;

/// Arguments for the chunks command
#[derive(Args, Debug)]
pub struct ChunksArgs {
    /// Source path, exact or as a trailing suffix (e.g. web/AccountController.java)
    pub path: String,
}

/// Execute the chunks command
pub async fn execute(
    args: ChunksArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = FileChunksResponse::from(services.chunks_for(&args.path));

    match format {
        OutputFormat::Human => {
            if let Some(message) = &response.message {
                print_warning(message);
                return Ok(());
            }
            for (i, chunk) in response.chunks.iter().enumerate() {
                println!(
                    "{}",
                    colors::dim(&format!("--- chunk {}/{} ---", i + 1, response.count))
                );
                println!("{chunk}");
            }
        }
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(())
}
