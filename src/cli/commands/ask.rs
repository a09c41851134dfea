//! Ask command - answer a question from the live generation

use crate::cli::output::print_json;
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::QueryResponse;
use clap::Args;
use std::sync::Arc;

/// Arguments for the ask command
#[derive(Args, Debug)]
pub struct AskArgs {
    /// Question to answer; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub words: Vec<String>,
}

impl AskArgs {
    pub fn question(&self) -> String {
        self.words.join(" ")
    }
}

/// Execute the ask command
pub async fn execute(
    args: AskArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let answer = services.answer(&args.question()).await?;

    match format {
        OutputFormat::Human => println!("{answer}"),
        OutputFormat::Json => print_json(&QueryResponse { answer })?,
    }

    Ok(())
}
