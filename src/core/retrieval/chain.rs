//! Retrieval chain: embed, retrieve, fill, complete.

use std::path::Path;
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::llm::{Completer, Embedder};
use crate::core::retrieval::PromptTemplate;
use crate::core::storage::VectorStore;
use crate::core::types::Chunk;

/// Separator placed between retrieved chunk texts in the context slot
const CONTEXT_SEPARATOR: &str = "\n\n";

/// A `question -> answer` function bound to one generation's store
pub struct RetrievalChain {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    completer: Arc<dyn Completer>,
    template: PromptTemplate,
    k: usize,
}

impl RetrievalChain {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        completer: Arc<dyn Completer>,
        template: PromptTemplate,
        k: usize,
    ) -> Self {
        Self {
            store,
            embedder,
            completer,
            template,
            k,
        }
    }

    /// Generation directory this chain reads from
    pub fn generation(&self) -> &Path {
        self.store.dir()
    }

    /// Top-`k` chunks for `question`, in store order
    pub async fn retrieve(&self, question: &str) -> Result<Vec<Chunk>> {
        let vector = self.embedder.embed(question).await?;
        self.store.query(&vector, self.k)
    }

    /// Answer `question` from the bound generation
    ///
    /// Any string is forwarded as-is; adapters validate their input.
    ///
    /// # Errors
    ///
    /// Whatever the embedder, store or completer reported.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let hits = self.retrieve(question).await?;
        tracing::debug!(
            "Retrieved {} chunks from {:?} for question",
            hits.len(),
            self.store.dir()
        );

        let context = hits
            .iter()
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);
        let prompt = self.template.render(&context, question);

        let output = self.completer.complete(&prompt).await?;
        Ok(output.trim().to_string())
    }
}
