//! CLI adapter for Strata
//!
//! Runs the service operations directly against the local storage
//! root, without a server. Parallel to `http/`: both depend on
//! `core/` but not on each other.
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!          +------------+------------+
//!          |                         |
//!          v                         v
//! +------------------+      +------------------+
//! |      http/       |      |      cli/        |
//! | (axum adapter)   |      | (clap adapter)   |
//! +------------------+      +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// Strata - question answering over a local codebase
///
/// Index a source tree into a versioned vector store, then ask questions
/// answered by a local model from the retrieved chunks.
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(version)]
#[command(about = "RAG over a local codebase", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
///
/// Names follow the HTTP routes where one exists.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rebuild the index from the document root
    Index(commands::IndexArgs),

    /// Ask a question about the indexed code
    Ask(commands::AskArgs),

    /// Show statistics for the live generation
    Stats(commands::StatsArgs),

    /// Delete every generation
    Clear(commands::ClearArgs),

    /// Print the chunks indexed for a source path
    Chunks(commands::ChunksArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  strata completions bash > ~/.local/share/bash-completion/completions/strata
    ///   zsh:   strata completions zsh > ~/.zfunc/_strata
    ///   fish:  strata completions fish > ~/.config/fish/completions/strata.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use crate::core::xdg::XdgDirs;
    use std::sync::Arc;

    // Handle completions command early (doesn't need services)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let xdg = XdgDirs::new();
    xdg.ensure_dirs_exist()?;

    let mut config = Config::load_with_xdg(&xdg)?;
    if let Commands::Index(args) = &cli.command {
        if let Some(path) = &args.path {
            config.indexing.doc_path = path.clone();
        }
    }

    let services = Arc::new(Services::new(config)?);

    match cli.command {
        Commands::Index(args) => commands::index::execute(args, &services, cli.format).await,
        Commands::Ask(args) => commands::ask::execute(args, &services, cli.format).await,
        Commands::Stats(args) => commands::stats::execute(args, &services, cli.format).await,
        Commands::Clear(args) => commands::clear::execute(args, &services, cli.format).await,
        Commands::Chunks(args) => commands::chunks::execute(args, &services, cli.format).await,
        Commands::ShowConfig(args) => {
            commands::config::execute(args, &services, &xdg, cli.format).await
        }
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
