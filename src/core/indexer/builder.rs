//! Index builder.
//!
//! Writes a complete new generation next to the live one: load and
//! split the document tree, embed every chunk, persist the pairs in one
//! bulk write and record `meta.json`. Promotion and garbage collection
//! are left to [`Services`](crate::core::services::Services), which owns
//! the live snapshot.

use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::core::error::{Result, StrataError};
use crate::core::indexer::ChunkingPipeline;
use crate::core::llm::Embedder;
use crate::core::storage::{
    DiskVectorStore, GenerationMetadata, GenerationResolver, VectorStore, SCHEMA_VERSION,
};
use crate::core::types::Chunk;

/// A fully written generation, not yet live
pub struct BuiltGeneration {
    pub id: String,
    pub dir: PathBuf,
    pub store: Arc<DiskVectorStore>,
    pub chunk_count: usize,
}

/// Result of a build that did not fail
pub enum BuildOutcome {
    /// Nothing to index; no directory was created
    Empty,
    Built(BuiltGeneration),
}

/// Builds new generations under one storage root
pub struct IndexBuilder {
    pipeline: ChunkingPipeline,
    resolver: GenerationResolver,
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl IndexBuilder {
    pub fn new(
        pipeline: ChunkingPipeline,
        resolver: GenerationResolver,
        embedder: Arc<dyn Embedder>,
        batch_size: usize,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Self {
        Self {
            pipeline,
            resolver,
            embedder,
            batch_size: batch_size.max(1),
            chunk_size,
            chunk_overlap,
        }
    }

    /// Build a new generation from the tree at `root`
    ///
    /// Progress messages are appended to `log`. On error the partially
    /// written directory is removed (best effort) and the previous
    /// generation is left untouched.
    pub async fn build(&self, root: &Path, log: &mut Vec<String>) -> Result<BuildOutcome> {
        let start = Instant::now();

        let (chunks, report) = self.pipeline.load_and_split(root)?;
        log.push(format!("{} files loaded.", report.documents_loaded));
        if report.files_skipped > 0 {
            log.push(format!("{} files skipped (unreadable).", report.files_skipped));
        }
        log.push(format!("{} chunks created.", chunks.len()));

        if chunks.is_empty() {
            log.push(format!("No chunks produced from {}", root.display()));
            return Ok(BuildOutcome::Empty);
        }

        self.resolver.ensure_root()?;
        let generation = self.resolver.new_generation();
        log.push(format!("Storing in: {}", generation.dir.display()));

        match self.write_generation(&generation.id, &generation.dir, root, &chunks).await {
            Ok(store) => {
                tracing::info!(
                    "Built generation {} ({} chunks) in {}ms",
                    generation.id,
                    chunks.len(),
                    start.elapsed().as_millis()
                );
                Ok(BuildOutcome::Built(BuiltGeneration {
                    id: generation.id,
                    dir: generation.dir,
                    store,
                    chunk_count: chunks.len(),
                }))
            }
            Err(e) => {
                if generation.dir.exists() {
                    if let Err(rm) = fs::remove_dir_all(&generation.dir) {
                        tracing::warn!(
                            "Failed to remove partial generation {:?}: {}",
                            generation.dir,
                            rm
                        );
                    }
                }
                Err(e)
            }
        }
    }

    async fn write_generation(
        &self,
        id: &str,
        dir: &Path,
        root: &Path,
        chunks: &[Chunk],
    ) -> Result<Arc<DiskVectorStore>> {
        let mut vectors = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let embedded = self.embedder.embed_batch(&texts).await?;
            if embedded.len() != batch.len() {
                return Err(StrataError::Embedding(format!(
                    "Expected {} vectors, got {}",
                    batch.len(),
                    embedded.len()
                )));
            }
            vectors.extend(embedded);
            tracing::debug!("Embedded {}/{} chunks", vectors.len(), chunks.len());
        }

        let store = DiskVectorStore::open(dir)?;
        store.put(chunks, &vectors)?;

        GenerationMetadata {
            id: id.to_string(),
            created_at: Utc::now(),
            chunk_count: chunks.len(),
            embedding_model: self.embedder.model_name().to_string(),
            document_root: root.to_path_buf(),
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            schema_version: SCHEMA_VERSION,
        }
        .write(store.dir())?;

        Ok(Arc::new(store))
    }
}
