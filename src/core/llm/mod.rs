//! Model capabilities.
//!
//! The core depends only on the [`Embedder`] and [`Completer`] traits.
//! The Ollama clients are the production implementations; tests plug
//! in deterministic fakes.

pub mod completion;
pub mod embedder;

pub use completion::{Completer, OllamaCompleter};
pub use embedder::{Embedder, OllamaEmbedder};

use crate::core::config::ModelsConfig;
use crate::core::error::Result;
use std::time::Duration;

/// Shared HTTP client for the model endpoints
///
/// A zero `request_timeout_secs` leaves requests without a deadline.
pub(crate) fn http_client(config: &ModelsConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if config.request_timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
    }
    Ok(builder.build()?)
}
