//! Question answering over one generation.
//!
//! A [`RetrievalChain`] is bound to a single vector store at
//! construction; a new chain is composed whenever the live generation
//! changes.

pub mod chain;
pub mod prompt;

pub use chain::RetrievalChain;
pub use prompt::PromptTemplate;
