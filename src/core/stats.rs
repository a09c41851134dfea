//! Summary metrics over a generation.

use std::collections::BTreeSet;

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::storage::VectorStore;
use crate::core::types::{IndexSummary, StatsReport};

/// Source recorded for chunks whose metadata carries none
const UNKNOWN_SOURCE: &str = "unknown";

/// Compute the summary for `store`, or the reason it failed
pub fn compute(store: &dyn VectorStore, config: &Config) -> StatsReport {
    match summarize(store, config) {
        Ok(summary) => StatsReport::Summary(summary),
        Err(e) => {
            tracing::error!("Failed to compute stats for {:?}: {}", store.dir(), e);
            StatsReport::Error {
                error: e.to_string(),
            }
        }
    }
}

fn summarize(store: &dyn VectorStore, config: &Config) -> Result<IndexSummary> {
    let contents = store.get(None)?;

    let total_chunks = contents.documents.len();
    let total_chars: usize = contents.documents.iter().map(|d| d.chars().count()).sum();
    let average_chunk_size = if total_chunks == 0 {
        0
    } else {
        total_chars / total_chunks
    };

    let files: BTreeSet<&str> = contents
        .metadatas
        .iter()
        .map(|m| {
            if m.source.is_empty() {
                UNKNOWN_SOURCE
            } else {
                m.source.as_str()
            }
        })
        .collect();

    let packages: BTreeSet<&str> = files
        .iter()
        .filter_map(|source| package_of(source))
        .collect();

    Ok(IndexSummary {
        total_chunks,
        average_chunk_size,
        total_files: files.len(),
        unique_packages: packages.len(),
        embedding_model: config.models.embedding_model.clone(),
        llm_model: config.models.llm_model.clone(),
        persist_dir: store.dir().display().to_string(),
        chunk_size: config.indexing.chunk_size,
        chunk_overlap: config.indexing.chunk_overlap,
        retriever_k: config.retrieval.k,
        files: files.into_iter().map(str::to_string).collect(),
    })
}

/// Directory part of a source path; `None` without a separator
fn package_of(source: &str) -> Option<&str> {
    source.rsplit_once('/').map(|(dir, _)| dir)
}
