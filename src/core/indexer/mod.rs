//! Document indexing module.
//!
//! Turns a document tree into a new generation:
//!
//! - File system walking with extension and pattern filtering
//! - Recursive, language-aware chunk splitting (UTF-8 safe)
//! - Load-and-split pipeline with per-file failure isolation
//! - Generation builder (embed, persist, record metadata)

pub mod builder;
pub mod pipeline;
pub mod splitter;
pub mod walker;

pub use builder::{BuildOutcome, BuiltGeneration, IndexBuilder};
pub use pipeline::{normalize_source, ChunkingPipeline};
pub use splitter::{Language, RecursiveSplitter};
pub use walker::FileWalker;
