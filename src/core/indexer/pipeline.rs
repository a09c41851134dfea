//! Chunking pipeline.
//!
//! Coordinates the load-and-split half of an index build:
//! 1. Walk the document root
//! 2. Read file contents (unreadable files are skipped)
//! 3. Split each document with the recursive splitter
//! 4. Normalize every chunk's source to forward slashes

use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::core::config::IndexingConfig;
use crate::core::error::{Result, StrataError};
use crate::core::indexer::splitter::{Language, RecursiveSplitter};
use crate::core::indexer::FileWalker;
use crate::core::types::{Chunk, LoadReport, SourceDocument};

/// Loads a document tree and splits it into chunks
pub struct ChunkingPipeline {
    walker: FileWalker,
    splitter: RecursiveSplitter,
}

impl ChunkingPipeline {
    /// Create a new chunking pipeline
    ///
    /// # Arguments
    ///
    /// * `chunk_size` - Maximum chunk length in characters
    /// * `chunk_overlap` - Characters shared between consecutive chunks
    /// * `extensions` - File extensions to load
    /// * `exclude_patterns` - Glob patterns for paths to skip
    /// * `max_file_size_mb` - Maximum file size in megabytes
    pub fn new(
        chunk_size: usize,
        chunk_overlap: usize,
        extensions: Vec<String>,
        exclude_patterns: Vec<String>,
        max_file_size_mb: usize,
    ) -> Result<Self> {
        let walker = FileWalker::new(extensions, exclude_patterns, max_file_size_mb)?;
        let splitter = RecursiveSplitter::new(chunk_size, chunk_overlap)?;

        Ok(Self { walker, splitter })
    }

    /// Build a pipeline from the `[indexing]` config section
    pub fn from_config(config: &IndexingConfig) -> Result<Self> {
        Self::new(
            config.chunk_size,
            config.chunk_overlap,
            config.extensions.clone(),
            config.exclude_patterns.clone(),
            config.max_file_size_mb,
        )
    }

    /// Load every matching file under `root` and split it into chunks
    ///
    /// Files that cannot be read are logged and counted in
    /// [`LoadReport::files_skipped`]; they never abort the run.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if `root` is not a directory
    pub fn load_and_split(&self, root: &Path) -> Result<(Vec<Chunk>, LoadReport)> {
        let start = Instant::now();

        tracing::info!("Loading documents from {:?}", root);
        let files = self.walker.collect_files(root)?;
        tracing::info!("Found {} candidate files", files.len());

        let mut chunks = Vec::new();
        let mut report = LoadReport::default();

        for path in &files {
            match load_document(path) {
                Ok(document) => {
                    report.documents_loaded += 1;
                    let language = Language::from_path(&document.path);
                    let split = self
                        .splitter
                        .split(&document.content, &document.source, language);
                    tracing::debug!("Split {} into {} chunks", document.source, split.len());
                    chunks.extend(split);
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    report.files_skipped += 1;
                }
            }
        }

        tracing::info!(
            "Loaded {} documents ({} skipped), {} chunks in {}ms",
            report.documents_loaded,
            report.files_skipped,
            chunks.len(),
            start.elapsed().as_millis()
        );

        Ok((chunks, report))
    }
}

/// Source path recorded on chunks: the loader path with forward slashes
pub fn normalize_source(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn load_document(path: &Path) -> Result<SourceDocument> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::InvalidData {
            StrataError::Load(format!("Skipping non-UTF-8 file: {path:?}"))
        } else {
            StrataError::Load(format!("Failed to read {path:?}: {e}"))
        }
    })?;

    Ok(SourceDocument {
        path: path.to_path_buf(),
        source: normalize_source(path),
        content,
    })
}
