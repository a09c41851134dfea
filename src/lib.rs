//! Strata - question answering over a local codebase
//!
//! Indexes a source tree into a versioned, on-disk vector store and
//! answers questions with a local model, using the chunks most similar
//! to the question as context.
//!
//! # Architecture
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types, xdg
//!   - storage (generation lifecycle, vector store)
//!   - indexer (walking, splitting, building generations)
//!   - llm (embedding and completion clients)
//!   - retrieval (prompt template, retrieval chain)
//!   - stats, lookup
//!   - services (live snapshot, public operations)
//!
//! - **http**: REST API adapter (depends on core)
//! - **cli**: command-line adapter (depends on core)
//!
//! # Generations
//!
//! Every index build writes a fresh directory under the storage root,
//! promotes it with one atomic swap and then deletes the others. A
//! failed build never disturbs the generation that is live.

// Core domain logic (protocol-agnostic)
pub mod core;

// HTTP REST adapter
pub mod http;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{Result, StrataError};
pub use core::services::Services;
pub use core::storage::{GenerationMetadata, GenerationResolver};
pub use core::types::*;
