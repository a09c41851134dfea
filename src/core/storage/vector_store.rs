//! Directory-addressed vector store.
//!
//! [`VectorStore`] is the capability the rest of the core depends on;
//! [`DiskVectorStore`] implements it with one SQLite database inside a
//! generation directory. Embeddings are stored as little-endian `f32`
//! blobs and ranked by cosine similarity at query time.

use crate::core::error::{Result, StrataError};
use crate::core::types::{Chunk, GetResult};
use rusqlite::{params, Connection, Row};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const DB_FILE: &str = "chunks.sqlite3";

const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS chunks (
    id TEXT PRIMARY KEY,
    source TEXT NOT NULL,
    chunk_index INTEGER NOT NULL,
    start_offset INTEGER NOT NULL,
    end_offset INTEGER NOT NULL,
    document TEXT NOT NULL,
    dimension INTEGER NOT NULL,
    embedding BLOB NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_chunks_source ON chunks(source);
";

/// Metadata filter accepted by [`VectorStore::get`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkFilter {
    /// `source` metadata equals the value literally
    SourceEquals(String),
}

/// Storage capability bound to one generation directory
pub trait VectorStore: Send + Sync {
    /// Directory backing this store
    fn dir(&self) -> &Path;

    /// Persist chunks with their embedding vectors in one bulk write
    fn put(&self, chunks: &[Chunk], vectors: &[Vec<f32>]) -> Result<()>;

    /// Nearest `k` chunks to `vector`, closest first
    fn query(&self, vector: &[f32], k: usize) -> Result<Vec<Chunk>>;

    /// All chunks matching `filter` (every chunk when `None`)
    fn get(&self, filter: Option<&ChunkFilter>) -> Result<GetResult>;

    /// Release the store; returns once nothing is held open on disk
    fn close(&self) -> Result<()>;
}

#[derive(Debug)]
enum Handle {
    /// No database on disk yet; reads see an empty store
    Absent,
    Open(Connection),
    Closed,
}

/// SQLite-backed vector store living inside a generation directory
///
/// Dropping the store closes its connection. The database file can be
/// unlinked while a store still holds it open; reads keep working until
/// the store is dropped.
#[derive(Debug)]
pub struct DiskVectorStore {
    dir: PathBuf,
    handle: Mutex<Handle>,
}

impl DiskVectorStore {
    /// Open the store in `dir`
    ///
    /// A missing directory or database opens an empty store; nothing is
    /// created on disk until the first [`put`](VectorStore::put).
    ///
    /// # Errors
    ///
    /// `StoreRead` if the database exists but cannot be opened.
    pub fn open(dir: &Path) -> Result<Self> {
        let path = dir.join(DB_FILE);
        let handle = if path.exists() {
            Handle::Open(connect(&path).map_err(|e| {
                StrataError::StoreRead(format!("Failed to open vector store {path:?}: {e}"))
            })?)
        } else {
            Handle::Absent
        };

        Ok(Self {
            dir: dir.to_path_buf(),
            handle: Mutex::new(handle),
        })
    }

    /// An empty store bound to `dir` that never reads from disk
    pub fn empty(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            handle: Mutex::new(Handle::Absent),
        }
    }

    /// Number of chunks stored
    pub fn len(&self) -> Result<usize> {
        let guard = self.lock()?;
        let conn = match &*guard {
            Handle::Absent => return Ok(0),
            Handle::Open(conn) => conn,
            Handle::Closed => return Err(self.closed()),
        };

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))
            .map_err(|e| self.read_error(e))?;
        usize::try_from(count)
            .map_err(|_| StrataError::StoreRead(format!("Invalid chunk count {count}")))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Handle>> {
        self.handle
            .lock()
            .map_err(|_| StrataError::StoreRead("Vector store lock poisoned".to_string()))
    }

    fn closed(&self) -> StrataError {
        StrataError::StoreRead(format!("Vector store {:?} is closed", self.dir))
    }

    fn read_error(&self, e: rusqlite::Error) -> StrataError {
        StrataError::StoreRead(format!("Failed to read {:?}: {e}", self.dir))
    }

    fn write_error(&self, e: rusqlite::Error) -> StrataError {
        StrataError::Storage(format!("Failed to write {:?}: {e}", self.dir))
    }
}

impl VectorStore for DiskVectorStore {
    fn dir(&self) -> &Path {
        &self.dir
    }

    fn put(&self, chunks: &[Chunk], vectors: &[Vec<f32>]) -> Result<()> {
        if chunks.len() != vectors.len() {
            return Err(StrataError::Storage(format!(
                "Got {} chunks but {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }

        let mut guard = self.lock()?;
        if matches!(*guard, Handle::Absent) {
            fs::create_dir_all(&self.dir).map_err(|e| {
                StrataError::Storage(format!("Failed to create {:?}: {e}", self.dir))
            })?;
            let conn = connect(&self.dir.join(DB_FILE)).map_err(|e| self.write_error(e))?;
            *guard = Handle::Open(conn);
        }
        let conn = match &mut *guard {
            Handle::Open(conn) => conn,
            _ => return Err(self.closed()),
        };

        let tx = conn.transaction().map_err(|e| self.write_error(e))?;
        {
            let mut insert = tx
                .prepare(
                    "INSERT INTO chunks (
                        id, source, chunk_index, start_offset, end_offset,
                        document, dimension, embedding
                     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                )
                .map_err(|e| self.write_error(e))?;

            for (chunk, vector) in chunks.iter().zip(vectors) {
                insert
                    .execute(params![
                        uuid::Uuid::new_v4().to_string(),
                        chunk.source,
                        to_i64(chunk.chunk_index)?,
                        to_i64(chunk.start_offset)?,
                        to_i64(chunk.end_offset)?,
                        chunk.text,
                        to_i64(vector.len())?,
                        encode_embedding(vector),
                    ])
                    .map_err(|e| self.write_error(e))?;
            }
        }
        tx.commit().map_err(|e| self.write_error(e))?;

        tracing::debug!("Stored {} chunks in {:?}", chunks.len(), self.dir);
        Ok(())
    }

    fn query(&self, vector: &[f32], k: usize) -> Result<Vec<Chunk>> {
        let guard = self.lock()?;
        let conn = match &*guard {
            Handle::Absent => return Ok(Vec::new()),
            Handle::Open(conn) => conn,
            Handle::Closed => return Err(self.closed()),
        };
        if k == 0 || vector.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = conn
            .prepare(
                "SELECT source, chunk_index, start_offset, end_offset, document, embedding
                 FROM chunks
                 WHERE dimension = ?1
                 ORDER BY rowid",
            )
            .map_err(|e| self.read_error(e))?;
        let rows = stmt
            .query_map(params![to_i64(vector.len())?], |row| {
                let chunk = chunk_from_row(row, 0)?;
                let blob: Vec<u8> = row.get(5)?;
                Ok((chunk, blob))
            })
            .map_err(|e| self.read_error(e))?;

        let mut scored = Vec::new();
        for row in rows {
            let (chunk, blob) = row.map_err(|e| self.read_error(e))?;
            let candidate = decode_embedding(&blob)?;
            scored.push((cosine_similarity(vector, &candidate), chunk));
        }
        // Stable sort: ties keep insertion order
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored.into_iter().take(k).map(|(_, chunk)| chunk).collect())
    }

    fn get(&self, filter: Option<&ChunkFilter>) -> Result<GetResult> {
        let guard = self.lock()?;
        let conn = match &*guard {
            Handle::Absent => return Ok(GetResult::default()),
            Handle::Open(conn) => conn,
            Handle::Closed => return Err(self.closed()),
        };

        let map_row = |row: &Row<'_>| -> rusqlite::Result<(String, Chunk)> {
            Ok((row.get(0)?, chunk_from_row(row, 1)?))
        };

        let rows = match filter {
            None => {
                let mut stmt = conn
                    .prepare(
                        "SELECT id, source, chunk_index, start_offset, end_offset, document
                         FROM chunks ORDER BY rowid",
                    )
                    .map_err(|e| self.read_error(e))?;
                let rows = stmt
                    .query_map([], map_row)
                    .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
                    .map_err(|e| self.read_error(e))?;
                rows
            }
            Some(ChunkFilter::SourceEquals(source)) => {
                let mut stmt = conn
                    .prepare(
                        "SELECT id, source, chunk_index, start_offset, end_offset, document
                         FROM chunks WHERE source = ?1 ORDER BY rowid",
                    )
                    .map_err(|e| self.read_error(e))?;
                let rows = stmt
                    .query_map(params![source], map_row)
                    .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
                    .map_err(|e| self.read_error(e))?;
                rows
            }
        };

        let mut result = GetResult::default();
        for (id, chunk) in rows {
            result.ids.push(id);
            result.metadatas.push(chunk.metadata());
            result.documents.push(chunk.text);
        }

        Ok(result)
    }

    fn close(&self) -> Result<()> {
        let mut guard = self.lock()?;
        if let Handle::Open(conn) = std::mem::replace(&mut *guard, Handle::Closed) {
            conn.close().map_err(|(_, e)| {
                StrataError::Storage(format!("Failed to close {:?}: {e}", self.dir))
            })?;
        }
        tracing::debug!("Closed vector store {:?}", self.dir);
        Ok(())
    }
}

fn connect(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(conn)
}

/// Chunk from the five columns starting at `first`
fn chunk_from_row(row: &Row<'_>, first: usize) -> rusqlite::Result<Chunk> {
    Ok(Chunk {
        source: row.get(first)?,
        chunk_index: column_usize(row, first + 1)?,
        start_offset: column_usize(row, first + 2)?,
        end_offset: column_usize(row, first + 3)?,
        text: row.get(first + 4)?,
    })
}

fn column_usize(row: &Row<'_>, idx: usize) -> rusqlite::Result<usize> {
    let value: i64 = row.get(idx)?;
    usize::try_from(value).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(idx, value))
}

fn to_i64(value: usize) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| StrataError::Storage(format!("Value {value} does not fit in the store")))
}

fn encode_embedding(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vector.len() * std::mem::size_of::<f32>());
    for value in vector {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

fn decode_embedding(blob: &[u8]) -> Result<Vec<f32>> {
    if blob.len() % std::mem::size_of::<f32>() != 0 {
        return Err(StrataError::StoreRead(format!(
            "Invalid embedding byte length {}",
            blob.len()
        )));
    }
    Ok(blob
        .chunks_exact(std::mem::size_of::<f32>())
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// Cosine similarity; 0.0 for mismatched or zero-length vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a < f32::EPSILON || norm_b < f32::EPSILON {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
