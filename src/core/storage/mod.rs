//! Storage layer for index generations.
//!
//! - **GenerationResolver**: names, lists, resolves and deletes
//!   generation directories under the storage root
//! - **VectorStore**: the store capability bound to one generation
//! - **DiskVectorStore**: SQLite implementation of it

mod generation;
mod vector_store;

pub use generation::{
    DirRemover, GenerationMetadata, GenerationResolver, NewGeneration, RemovalFailure,
    SCHEMA_VERSION,
};
pub use vector_store::{cosine_similarity, ChunkFilter, DiskVectorStore, VectorStore};
