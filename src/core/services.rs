//! Unified service container for Strata
//!
//! Owns the live index snapshot and exposes the five public operations
//! the adapters call. Readers clone an `Arc<LiveIndex>` and never block
//! writers for longer than that clone; index builds and clears are
//! serialized by one async mutex.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::indexer::{BuildOutcome, ChunkingPipeline, IndexBuilder};
use crate::core::llm::{Completer, Embedder, OllamaCompleter, OllamaEmbedder};
use crate::core::lookup;
use crate::core::retrieval::{PromptTemplate, RetrievalChain};
use crate::core::stats;
use crate::core::storage::{DiskVectorStore, GenerationResolver, VectorStore};
use crate::core::types::{ClearOutcome, IndexReport, StatsReport};

/// Immutable view of the live generation
///
/// Generation, store and chain are swapped together, so a reader can
/// never observe them disagreeing.
pub struct LiveIndex {
    pub generation: PathBuf,
    pub store: Arc<dyn VectorStore>,
    pub chain: RetrievalChain,
}

/// Unified services container
///
/// All adapters use this same struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Application configuration
    pub config: Arc<Config>,

    resolver: GenerationResolver,
    embedder: Arc<dyn Embedder>,
    completer: Arc<dyn Completer>,
    template: PromptTemplate,
    live: Arc<RwLock<Arc<LiveIndex>>>,
    write_lock: Arc<Mutex<()>>,
}

impl Services {
    /// Create services backed by the Ollama model clients
    pub fn new(config: Config) -> Result<Self> {
        let embedder = Arc::new(OllamaEmbedder::new(&config.models)?);
        let completer = Arc::new(OllamaCompleter::new(&config.models)?);
        Self::with_providers(config, embedder, completer)
    }

    /// Create services with explicit model capabilities
    pub fn with_providers(
        config: Config,
        embedder: Arc<dyn Embedder>,
        completer: Arc<dyn Completer>,
    ) -> Result<Self> {
        let resolver =
            GenerationResolver::new(config.storage.root.clone(), config.storage.dir_prefix.clone());
        Self::with_resolver(config, resolver, embedder, completer)
    }

    /// Create services over an explicit generation resolver
    ///
    /// Binds the live snapshot to whatever generation the resolver
    /// currently picks.
    pub fn with_resolver(
        config: Config,
        resolver: GenerationResolver,
        embedder: Arc<dyn Embedder>,
        completer: Arc<dyn Completer>,
    ) -> Result<Self> {
        let template = PromptTemplate::new(config.retrieval.template.clone())?;

        let dir = resolver.resolve();
        tracing::info!("Live generation: {:?}", dir);
        let store = Arc::new(DiskVectorStore::open(&dir)?);
        let initial = compose(
            dir,
            store,
            &embedder,
            &completer,
            &template,
            config.retrieval.k,
        );

        Ok(Self {
            config: Arc::new(config),
            resolver,
            embedder,
            completer,
            template,
            live: Arc::new(RwLock::new(Arc::new(initial))),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Current live snapshot
    pub fn snapshot(&self) -> Arc<LiveIndex> {
        match self.live.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Directory of the live generation
    pub fn live_generation(&self) -> PathBuf {
        self.snapshot().generation.clone()
    }

    pub fn resolver(&self) -> &GenerationResolver {
        &self.resolver
    }

    /// Rebuild the index from the configured document root
    ///
    /// Never fails outward: a chunk count of 0 with a diagnostic log
    /// signals an empty tree or a failed build, in which case the
    /// previous generation stays live.
    pub async fn run_indexing(&self) -> IndexReport {
        let _guard = self.write_lock.lock().await;

        let doc_path = self.config.indexing.doc_path.clone();
        tracing::info!("Indexing {:?}", doc_path);

        let builder = match self.builder() {
            Ok(builder) => builder,
            Err(e) => return IndexReport::failed(format!("Indexing error: {e}")),
        };

        let mut log = vec!["Preparing new generation...".to_string()];
        let built = match builder.build(&doc_path, &mut log).await {
            Ok(BuildOutcome::Built(built)) => built,
            Ok(BuildOutcome::Empty) => {
                tracing::warn!("No chunks produced from {:?}", doc_path);
                return IndexReport {
                    chunk_count: 0,
                    log,
                    generation: None,
                };
            }
            Err(e) => {
                tracing::error!("Indexing failed: {}", e);
                return IndexReport::failed(format!("Indexing error: {e}"));
            }
        };

        let next = self.bind(built.dir.clone(), built.store);
        let previous = self.swap(next);
        log.push(format!("Generation {} is live.", built.id));
        tracing::info!("Generation {} is live at {:?}", built.id, built.dir);

        self.release(previous, &mut log);

        match self.resolver.remove_all_except(&built.dir) {
            Ok((removed, failures)) => {
                if !removed.is_empty() {
                    log.push(format!("Removed {} old generation(s).", removed.len()));
                }
                for failure in failures {
                    log.push(format!(
                        "Could not remove {}: {}",
                        failure.dir.display(),
                        failure.reason
                    ));
                }
            }
            Err(e) => {
                tracing::warn!("Garbage collection failed: {}", e);
                log.push(format!("Garbage collection failed: {e}"));
            }
        }

        IndexReport {
            chunk_count: built.chunk_count,
            log,
            generation: Some(built.dir),
        }
    }

    /// Answer a question from the live generation
    ///
    /// # Errors
    ///
    /// Surfaces the embedding, store or completion failure.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let live = self.snapshot();
        live.chain.answer(question).await
    }

    /// Statistics over the live generation
    pub fn stats(&self) -> StatsReport {
        let live = self.snapshot();
        stats::compute(live.store.as_ref(), &self.config)
    }

    /// Chunk texts recorded for `path` in the live generation
    pub fn chunks_for(&self, path: &str) -> Vec<String> {
        let live = self.snapshot();
        lookup::chunks_for(live.store.as_ref(), path)
    }

    /// Delete every generation and reset to the default one
    pub async fn clear_all(&self) -> ClearOutcome {
        let _guard = self.write_lock.lock().await;

        // Readers see the empty default generation while directories go
        let default_dir = self.resolver.default_dir();
        let empty = Arc::new(DiskVectorStore::empty(&default_dir));
        let previous = self.swap(self.bind(default_dir.clone(), empty));
        let mut failures = Vec::new();
        self.release(previous, &mut failures);

        let removed = match self.resolver.remove_all() {
            Ok((removed, errors)) => {
                failures.extend(
                    errors
                        .into_iter()
                        .map(|f| format!("{}: {}", f.dir.display(), f.reason)),
                );
                removed
            }
            Err(e) => {
                failures.push(e.to_string());
                Vec::new()
            }
        };

        // Anything that survived deletion is still a generation
        let dir = self.resolver.resolve();
        if dir != default_dir {
            match self.open_live(dir) {
                Ok(next) => {
                    self.swap(next);
                }
                Err(e) => failures.push(format!("Failed to reopen surviving generation: {e}")),
            }
        }

        let removed: Vec<String> = removed.iter().map(|d| d.display().to_string()).collect();
        for dir in &removed {
            tracing::info!("Removed generation {}", dir);
        }

        if failures.is_empty() {
            ClearOutcome {
                success: true,
                message: format!(
                    "Database fully cleared ({} generation(s) removed).",
                    removed.len()
                ),
                removed,
            }
        } else {
            tracing::warn!("Clear left {} problem(s)", failures.len());
            ClearOutcome {
                success: false,
                message: format!("Clear incomplete: {}", failures.join("; ")),
                removed,
            }
        }
    }

    fn builder(&self) -> Result<IndexBuilder> {
        let indexing = &self.config.indexing;
        Ok(IndexBuilder::new(
            ChunkingPipeline::from_config(indexing)?,
            self.resolver.clone(),
            Arc::clone(&self.embedder),
            self.config.models.embed_batch_size,
            indexing.chunk_size,
            indexing.chunk_overlap,
        ))
    }

    fn open_live(&self, dir: PathBuf) -> Result<LiveIndex> {
        let store = Arc::new(DiskVectorStore::open(&dir)?);
        Ok(self.bind(dir, store))
    }

    fn bind(&self, generation: PathBuf, store: Arc<DiskVectorStore>) -> LiveIndex {
        compose(
            generation,
            store,
            &self.embedder,
            &self.completer,
            &self.template,
            self.config.retrieval.k,
        )
    }

    fn swap(&self, next: LiveIndex) -> Arc<LiveIndex> {
        let next = Arc::new(next);
        match self.live.write() {
            Ok(mut guard) => std::mem::replace(&mut *guard, next),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), next),
        }
    }

    /// Close a superseded store once no reader holds its snapshot
    ///
    /// While readers remain, the store stays open and closes when the
    /// last of them drops it. Its directory may be deleted either way.
    fn release(&self, previous: Arc<LiveIndex>, log: &mut Vec<String>) {
        let previous = match Arc::try_unwrap(previous) {
            Ok(previous) => previous,
            Err(shared) => {
                tracing::debug!(
                    "Generation {:?} still has {} reader(s); closing on last drop",
                    shared.generation,
                    Arc::strong_count(&shared) - 1
                );
                return;
            }
        };

        if let Err(e) = previous.store.close() {
            tracing::warn!("Failed to close {:?}: {}", previous.generation, e);
            log.push(format!("Failed to close {}: {e}", previous.generation.display()));
        }
    }
}

/// Compose a snapshot with a fresh chain bound to `store`
fn compose(
    generation: PathBuf,
    store: Arc<DiskVectorStore>,
    embedder: &Arc<dyn Embedder>,
    completer: &Arc<dyn Completer>,
    template: &PromptTemplate,
    k: usize,
) -> LiveIndex {
    let store: Arc<dyn VectorStore> = store;
    let chain = RetrievalChain::new(
        Arc::clone(&store),
        Arc::clone(embedder),
        Arc::clone(completer),
        template.clone(),
        k,
    );
    LiveIndex {
        generation,
        store,
        chain,
    }
}
