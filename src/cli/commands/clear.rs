//! Clear command - delete every generation

use crate::cli::output::{colors, print_json, print_success};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::ClearResponse;
use clap::Args;
use std::io::{self, Write};
use std::sync::Arc;

/// Arguments for the clear command
#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Execute the clear command
pub async fn execute(
    args: ClearArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if !args.yes && format == OutputFormat::Human {
        let generations = services.resolver().list()?;
        if generations.is_empty() {
            println!("Nothing to clear.");
            return Ok(());
        }

        eprint!(
            "Delete {} generation(s) under {}? [y/N] ",
            colors::number(&generations.len().to_string()),
            colors::file_path(&services.resolver().storage_root().display().to_string())
        );
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let outcome = services.clear_all().await;
    let success = outcome.success;
    let response = ClearResponse::from(outcome);

    match format {
        OutputFormat::Human if success => print_success(&response.message),
        OutputFormat::Human => {}
        OutputFormat::Json => print_json(&response)?,
    }

    if success {
        Ok(())
    } else {
        Err(response.message.into())
    }
}
