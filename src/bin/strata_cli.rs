//! Strata CLI - command-line interface for Strata
//!
//! Runs indexing and question answering directly against the local
//! storage root, without a server.
//!
//! # Examples
//!
//! ```bash
//! # Rebuild the index from a source tree
//! strata index ./data
//!
//! # Ask a question
//! strata ask "What does AccountController do?"
//!
//! # Inspect the live generation
//! strata stats --files
//! strata chunks web/AccountController.java
//! ```

use clap::Parser;
use strata::cli::output::print_error;
use strata::cli::{run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Quiet by default; RUST_LOG=strata=debug for progress detail
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "strata=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
