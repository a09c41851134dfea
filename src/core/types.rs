//! Core data types for the Strata service.
//!
//! Chunks and store records, the values returned by the public
//! operations, and the request/response bodies of the HTTP adapter.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A raw file as loaded from the document root
///
/// Only exists for the duration of one indexing run.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Path on disk used to read the file
    pub path: PathBuf,

    /// Normalized forward-slash path recorded on every chunk
    pub source: String,

    pub content: String,
}

/// A single text chunk from a source document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// The actual text content
    pub text: String,

    /// Normalized source path (never contains a backslash)
    pub source: String,

    /// Sequential chunk number within the file
    pub chunk_index: usize,

    /// Byte offset where chunk starts in original file
    pub start_offset: usize,

    /// Byte offset where chunk ends in original file
    pub end_offset: usize,
}

impl Chunk {
    /// Metadata half of the chunk, as returned by store reads
    pub fn metadata(&self) -> ChunkMetadata {
        ChunkMetadata {
            source: self.source.clone(),
            chunk_index: self.chunk_index,
            start_offset: self.start_offset,
            end_offset: self.end_offset,
        }
    }
}

/// Per-chunk metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub chunk_index: usize,
    #[serde(default)]
    pub start_offset: usize,
    #[serde(default)]
    pub end_offset: usize,
}

/// Column-oriented result of a store `get`
///
/// `ids`, `metadatas` and `documents` always have the same length and
/// share ordering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetResult {
    pub ids: Vec<String>,
    pub metadatas: Vec<ChunkMetadata>,
    pub documents: Vec<String>,
}

impl GetResult {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Outcome of loading the document root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Files read successfully
    pub documents_loaded: usize,

    /// Files that failed to load
    pub files_skipped: usize,
}

/// Outcome of an index build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexReport {
    /// Chunks indexed; 0 signals failure or an empty tree
    pub chunk_count: usize,

    /// Ordered human-readable progress messages
    pub log: Vec<String>,

    /// Directory of the promoted generation, if any
    pub generation: Option<PathBuf>,
}

impl IndexReport {
    pub(crate) fn failed(message: String) -> Self {
        Self {
            chunk_count: 0,
            log: vec![message],
            generation: None,
        }
    }
}

/// Summary metrics over the live generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSummary {
    pub total_chunks: usize,
    pub average_chunk_size: usize,
    pub total_files: usize,
    pub unique_packages: usize,
    pub embedding_model: String,
    pub llm_model: String,
    pub persist_dir: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub retriever_k: usize,
    /// Sorted unique source paths
    pub files: Vec<String>,
}

/// Statistics or the reason they could not be computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatsReport {
    Summary(IndexSummary),
    Error { error: String },
}

impl StatsReport {
    /// The summary, if statistics were computed
    pub fn summary(&self) -> Option<&IndexSummary> {
        match self {
            StatsReport::Summary(summary) => Some(summary),
            StatsReport::Error { .. } => None,
        }
    }
}

/// Outcome of clearing every generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearOutcome {
    pub success: bool,
    pub message: String,
    /// Directories removed
    pub removed: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Request to answer a question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

/// Answer to a question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
}

/// Response from an index build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunIndexResponse {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub debug: Vec<String>,
}

impl From<IndexReport> for RunIndexResponse {
    fn from(report: IndexReport) -> Self {
        if report.chunk_count == 0 {
            let message = report
                .log
                .last()
                .cloned()
                .unwrap_or_else(|| "Indexing produced no chunks".to_string());
            Self {
                status: "error".to_string(),
                message,
                count: None,
                debug: report.log,
            }
        } else {
            Self {
                status: "success".to_string(),
                message: "Indexing complete".to_string(),
                count: Some(report.chunk_count),
                debug: report.log,
            }
        }
    }
}

/// Response from clearing all generations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearResponse {
    pub status: String,
    pub message: String,
}

impl From<ClearOutcome> for ClearResponse {
    fn from(outcome: ClearOutcome) -> Self {
        Self {
            status: if outcome.success { "success" } else { "error" }.to_string(),
            message: outcome.message,
        }
    }
}

/// Query string of the file-chunks route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileChunksQuery {
    pub path: String,
}

/// Chunk texts recorded for one source path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileChunksResponse {
    pub chunks: Vec<String>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<Vec<String>> for FileChunksResponse {
    fn from(chunks: Vec<String>) -> Self {
        let count = chunks.len();
        let message = if chunks.is_empty() {
            Some("No chunks found for this path.".to_string())
        } else {
            None
        };
        Self {
            chunks,
            count,
            message,
        }
    }
}
