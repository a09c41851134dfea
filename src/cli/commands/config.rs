//! Config command - show current configuration

use crate::cli::output::{colors, print_header, print_json};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the show-config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Include the prompt template
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    pub live_generation: String,
    #[serde(flatten)]
    pub config: crate::core::config::Config,
}

/// Execute the show-config command
pub async fn execute(
    args: ConfigArgs,
    services: &Arc<Services>,
    xdg: &XdgDirs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = ConfigResponse {
        config_file: xdg.config_file().display().to_string(),
        live_generation: services.live_generation().display().to_string(),
        config: services.config.as_ref().clone(),
    };

    if format == OutputFormat::Json {
        print_json(&response)?;
        return Ok(());
    }

    let config = &response.config;
    print_header("Configuration");
    println!("  {} {}", colors::label("config_file:"), response.config_file);
    println!(
        "  {} {}",
        colors::label("live_generation:"),
        colors::generation(&response.live_generation)
    );
    println!("  {}", colors::label("models:"));
    println!("    ollama_url: {}", config.models.ollama_url);
    println!("    embedding_model: {}", config.models.embedding_model);
    println!("    llm_model: {}", config.models.llm_model);
    println!("    temperature: {}", config.models.temperature);
    println!("  {}", colors::label("indexing:"));
    println!("    doc_path: {}", config.indexing.doc_path.display());
    println!("    chunk_size: {}", config.indexing.chunk_size);
    println!("    chunk_overlap: {}", config.indexing.chunk_overlap);
    println!("    extensions: {:?}", config.indexing.extensions);
    println!("    exclude_patterns: {:?}", config.indexing.exclude_patterns);
    println!("  {}", colors::label("storage:"));
    println!("    root: {}", config.storage.root.display());
    println!("    dir_prefix: {}", config.storage.dir_prefix);
    println!("  {}", colors::label("retrieval:"));
    println!("    k: {}", config.retrieval.k);
    if args.all {
        println!("    template: |");
        for line in config.retrieval.template.lines() {
            println!("      {line}");
        }
    }
    println!("  {}", colors::label("server:"));
    println!("    {}:{}", config.server.host, config.server.port);

    Ok(())
}
