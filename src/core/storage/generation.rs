//! Generation directory management.
//!
//! Every index build writes a brand-new generation directory under the
//! storage root. The live generation is whichever matching directory was
//! modified last; the unparameterized default directory stands in when
//! none exist yet.
//!
//! ```text
//! {storage_root}/
//! ├── vector_db/              # default generation (may not exist)
//! ├── vector_db_1f2e3d4c/     # generation 1f2e3d4c
//! │   ├── meta.json           # GenerationMetadata
//! │   └── chunks.sqlite3      # chunks + vectors (vector store)
//! ```

use crate::core::error::{Result, StrataError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Current layout version written into `meta.json`
pub const SCHEMA_VERSION: u32 = 1;

const METADATA_FILE: &str = "meta.json";

/// Metadata persisted alongside each generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub chunk_count: usize,
    pub embedding_model: String,
    pub document_root: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub schema_version: u32,
}

impl GenerationMetadata {
    /// Read `meta.json` from a generation directory
    pub fn read(dir: &Path) -> Result<Self> {
        let contents = fs::read_to_string(dir.join(METADATA_FILE))?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Write `meta.json` into a generation directory
    pub fn write(&self, dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(METADATA_FILE), json)?;
        Ok(())
    }
}

/// A freshly allocated generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGeneration {
    pub id: String,
    pub dir: PathBuf,
}

/// A directory that could not be removed
#[derive(Debug, Clone)]
pub struct RemovalFailure {
    pub dir: PathBuf,
    pub reason: String,
}

/// Deletes one generation directory tree
pub type DirRemover = Arc<dyn Fn(&Path) -> io::Result<()> + Send + Sync>;

/// Resolves and rotates generation directories under one storage root
#[derive(Clone)]
pub struct GenerationResolver {
    storage_root: PathBuf,
    prefix: String,
    remover: DirRemover,
}

impl fmt::Debug for GenerationResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationResolver")
            .field("storage_root", &self.storage_root)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl GenerationResolver {
    pub fn new(storage_root: PathBuf, prefix: impl Into<String>) -> Self {
        Self {
            storage_root,
            prefix: prefix.into(),
            remover: Arc::new(|dir: &Path| fs::remove_dir_all(dir)),
        }
    }

    /// Replace how generation directories are deleted during GC and clear
    pub fn with_remover(mut self, remover: DirRemover) -> Self {
        self.remover = remover;
        self
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    /// Path of the sentinel default generation
    pub fn default_dir(&self) -> PathBuf {
        self.storage_root.join(&self.prefix)
    }

    /// Path of the generation with the given id
    pub fn dir_for(&self, id: &str) -> PathBuf {
        self.storage_root.join(format!("{}_{}", self.prefix, id))
    }

    /// Allocate a fresh generation id that is not yet on disk
    pub fn new_generation(&self) -> NewGeneration {
        loop {
            let id: String = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();
            let dir = self.dir_for(&id);
            if !dir.exists() {
                return NewGeneration { id, dir };
            }
        }
    }

    /// Check whether a directory name follows the generation naming pattern
    pub fn matches_name(&self, name: &str) -> bool {
        match name.strip_prefix(self.prefix.as_str()) {
            Some("") => true,
            Some(rest) => rest.len() > 1 && rest.starts_with('_'),
            None => false,
        }
    }

    /// All generation directories currently on disk
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        if !self.storage_root.exists() {
            return Ok(Vec::new());
        }

        let mut dirs = Vec::new();
        for entry in fs::read_dir(&self.storage_root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if self.matches_name(name) {
                    dirs.push(entry.path());
                }
            }
        }
        dirs.sort();

        Ok(dirs)
    }

    /// Pick the live generation directory
    ///
    /// Returns the most recently modified generation, or the default
    /// directory (which may not exist) when there is none.
    pub fn resolve(&self) -> PathBuf {
        let dirs = match self.list() {
            Ok(dirs) => dirs,
            Err(e) => {
                tracing::warn!("Failed to scan {:?}: {}", self.storage_root, e);
                return self.default_dir();
            }
        };

        dirs.into_iter()
            .map(|dir| {
                let modified = fs::metadata(&dir)
                    .and_then(|m| m.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                (modified, dir)
            })
            .max_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)))
            .map(|(_, dir)| dir)
            .unwrap_or_else(|| self.default_dir())
    }

    /// Delete every generation directory except `keep`
    pub fn remove_all_except(&self, keep: &Path) -> Result<(Vec<PathBuf>, Vec<RemovalFailure>)> {
        let mut removed = Vec::new();
        let mut failures = Vec::new();

        for dir in self.list()? {
            if dir == keep {
                continue;
            }
            match (self.remover)(&dir) {
                Ok(()) => {
                    tracing::debug!("Removed generation {:?}", dir);
                    removed.push(dir);
                }
                Err(e) => {
                    tracing::warn!("Failed to remove generation {:?}: {}", dir, e);
                    failures.push(RemovalFailure {
                        dir,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok((removed, failures))
    }

    /// Delete every generation directory
    pub fn remove_all(&self) -> Result<(Vec<PathBuf>, Vec<RemovalFailure>)> {
        self.remove_all_except(Path::new(""))
    }

    /// Ensure the storage root exists
    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.storage_root).map_err(|e| {
            StrataError::Storage(format!(
                "Failed to create storage root {:?}: {e}",
                self.storage_root
            ))
        })
    }
}
