//! Core domain logic (protocol-agnostic)
//!
//! This module contains all business logic that is independent
//! of transport protocols (HTTP, CLI).
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **storage**: Generation directories and the vector store
//! - **indexer**: File walking, splitting and generation building
//! - **llm**: Embedding and completion capabilities
//! - **retrieval**: Prompt template and retrieval chain
//! - **stats**: Summary metrics over a generation
//! - **lookup**: Three-tier source path lookup
//! - **services**: Unified service container

pub mod config;
pub mod error;
pub mod indexer;
pub mod llm;
pub mod lookup;
pub mod retrieval;
pub mod services;
pub mod stats;
pub mod storage;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{Result, StrataError};
pub use services::Services;
