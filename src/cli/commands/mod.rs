//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod ask;
pub mod chunks;
pub mod clear;
pub mod completions;
pub mod config;
pub mod index;
pub mod stats;

// Re-export argument types for use in mod.rs
pub use ask::AskArgs;
pub use chunks::ChunksArgs;
pub use clear::ClearArgs;
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use index::IndexArgs;
pub use stats::StatsArgs;
