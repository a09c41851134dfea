//! File system walker with extension and pattern filtering.
//!
//! Traverses the document root and keeps files whose extension is
//! configured for loading. Errors (permission denied, etc.) are logged
//! without stopping the walk.

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{Result, StrataError};

/// File system walker with extension-based filtering
pub struct FileWalker {
    /// Lowercased extensions to load (e.g., "java", "xml")
    extensions: Vec<String>,

    /// Patterns to exclude (e.g., "**/target/**")
    exclude_patterns: Vec<Pattern>,

    /// Maximum file size in bytes (skip larger files)
    max_file_size_bytes: u64,
}

impl FileWalker {
    /// Create a new file walker
    ///
    /// # Errors
    ///
    /// Returns `Config` if an exclude pattern is not valid glob syntax
    pub fn new(
        extensions: Vec<String>,
        exclude_patterns: Vec<String>,
        max_file_size_mb: usize,
    ) -> Result<Self> {
        let exclude = exclude_patterns
            .into_iter()
            .map(|p| {
                Pattern::new(&p).map_err(|e| {
                    StrataError::Config(format!("Invalid exclude pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            exclude_patterns: exclude,
            max_file_size_bytes: (max_file_size_mb as u64) * 1024 * 1024,
        })
    }

    /// Collect all loadable files under `root`, in traversal order
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if `root` is not a directory
    pub fn collect_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(StrataError::InvalidPath(format!(
                "Document root is not a directory: {}",
                root.display()
            )));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.should_descend(e, root))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Error walking directory: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !self.is_loadable(path) {
                continue;
            }

            match entry.metadata() {
                Ok(metadata) if metadata.len() > self.max_file_size_bytes => {
                    tracing::debug!(
                        "Skipping large file: {:?} ({} bytes)",
                        path,
                        metadata.len()
                    );
                }
                Ok(_) => files.push(path.to_path_buf()),
                Err(e) => tracing::warn!("Failed to stat {:?}: {}", path, e),
            }
        }

        Ok(files)
    }

    /// Skip hidden and excluded directories early
    fn should_descend(&self, entry: &DirEntry, root: &Path) -> bool {
        if entry.path() == root || !entry.file_type().is_dir() {
            return true;
        }

        let hidden = entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false);
        if hidden {
            return false;
        }

        !self.is_excluded(entry.path())
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.exclude_patterns.iter().any(|p| p.matches_path(path))
    }

    fn is_loadable(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions.contains(&ext.to_ascii_lowercase()) && !self.is_excluded(path)
    }
}
