//! Source path lookup.
//!
//! Resolves a caller-supplied path to the chunk texts recorded for it,
//! trying each tier only when the previous one found nothing:
//!
//! 1. exact `source` match
//! 2. exact match on the normalized path
//! 3. suffix match against every normalized stored source

use crate::core::error::Result;
use crate::core::storage::{ChunkFilter, VectorStore};

/// Lexically normalize a path
///
/// Backslashes become `/`, empty and `.` segments are dropped and `..`
/// removes the preceding segment. A `..` with nothing to remove is kept
/// in a relative path and dropped at an absolute root. Nothing touches
/// the filesystem.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Chunk texts stored for `path`; empty (and logged) on any failure
pub fn chunks_for(store: &dyn VectorStore, path: &str) -> Vec<String> {
    match lookup(store, path) {
        Ok(chunks) => chunks,
        Err(e) => {
            tracing::error!("Chunk lookup for {:?} failed: {}", path, e);
            Vec::new()
        }
    }
}

fn lookup(store: &dyn VectorStore, path: &str) -> Result<Vec<String>> {
    let exact = exact_match(store, path)?;
    if !exact.is_empty() {
        return Ok(exact);
    }

    let normalized = normalize_path(path);
    if normalized != path {
        let found = exact_match(store, &normalized)?;
        if !found.is_empty() {
            tracing::debug!("Resolved {:?} via normalized path {:?}", path, normalized);
            return Ok(found);
        }
    }

    let all = store.get(None)?;
    let found: Vec<String> = all
        .metadatas
        .iter()
        .zip(all.documents)
        .filter(|(metadata, _)| normalize_path(&metadata.source).ends_with(&normalized))
        .map(|(_, document)| document)
        .collect();

    if !found.is_empty() {
        tracing::debug!("Resolved {:?} via suffix match ({} chunks)", path, found.len());
    }
    Ok(found)
}

fn exact_match(store: &dyn VectorStore, source: &str) -> Result<Vec<String>> {
    let filter = ChunkFilter::SourceEquals(source.to_string());
    Ok(store.get(Some(&filter))?.documents)
}
