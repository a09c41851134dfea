//! Configuration management for the Strata service.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with defaults for all settings.

use crate::core::error::{Result, StrataError};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Embedding and completion model settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelsConfig {
    /// Base URL of the Ollama server
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Model used to answer questions
    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Texts sent per embedding request
    #[serde(default = "default_embed_batch_size")]
    pub embed_batch_size: usize,

    /// HTTP timeout for model calls; 0 disables it
    #[serde(default)]
    pub request_timeout_secs: u64,
}

/// Indexing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Root of the source tree to index
    #[serde(default = "default_doc_path")]
    pub doc_path: PathBuf,

    /// Characters per chunk (not bytes!)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// File extensions to load, without the leading dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// File patterns to exclude (glob syntax)
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Maximum file size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding every generation directory
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,

    /// Generation directory name prefix
    #[serde(default = "default_dir_prefix")]
    pub dir_prefix: String,
}

/// Retrieval chain configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalConfig {
    /// Chunks fed into the prompt context
    #[serde(default = "default_k")]
    pub k: usize,

    /// Prompt template with `{context}` and `{question}` slots
    #[serde(default = "default_template")]
    pub template: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_llm_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_temperature() -> f32 {
    0.25
}

fn default_embed_batch_size() -> usize {
    32
}

fn default_doc_path() -> PathBuf {
    PathBuf::from("./data/")
}

fn default_chunk_size() -> usize {
    2000
}

fn default_chunk_overlap() -> usize {
    300
}

fn default_extensions() -> Vec<String> {
    vec![
        "java".to_string(),
        "xml".to_string(),
        "properties".to_string(),
    ]
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        "**/target/**".to_string(),
        "**/build/**".to_string(),
        "**/node_modules/**".to_string(),
        "**/.git/**".to_string(),
        "**/dist/**".to_string(),
    ]
}

fn default_max_file_size() -> usize {
    10
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("./store")
}

fn default_dir_prefix() -> String {
    "vector_db".to_string()
}

fn default_k() -> usize {
    8
}

/// Default prompt: a Spring Boot expert answering only from context
pub const DEFAULT_TEMPLATE: &str = "\
You are a Spring Boot expert with more than 10 years of experience on modern Java \
applications (Spring Boot 2.x/3.x, REST, JPA, Security, etc.).

Strict rules for every answer:
- Answer ONLY from the provided context. Do not invent anything.
- If the question is about an endpoint, a method or a controller:
  - ALWAYS show the full annotation (@RequestMapping, @PostMapping, @GetMapping, etc.)
  - Show the full method signature (visibility, return type, name, annotated parameters)
  - Give the relative file path (e.g. src/main/java/com/example/controller/AccountController.java)
  - If there are several results, list them with their source
  - If nothing matches, say clearly \"No matching endpoint/method found in the indexed files\"
- For other questions (refactoring, explanation, bugs, configuration):
  - Stay concise, technical and precise
  - Use Java/Spring code when relevant
  - Suggest current best practices when relevant

Context (codebase excerpts):
{context}

User question:
{question}

Answer:
";

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            ollama_url: default_ollama_url(),
            embedding_model: default_embedding_model(),
            llm_model: default_llm_model(),
            temperature: default_temperature(),
            embed_batch_size: default_embed_batch_size(),
            request_timeout_secs: 0,
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            doc_path: default_doc_path(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            extensions: default_extensions(),
            exclude_patterns: default_exclude_patterns(),
            max_file_size_mb: default_max_file_size(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            dir_prefix: default_dir_prefix(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            template: default_template(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| StrataError::Config(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// File priority:
    /// 1. STRATA_CONFIG env var
    /// 2. XDG config file (~/.config/strata/config.toml)
    /// 3. ./strata.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("STRATA_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("strata.toml").exists() {
                Self::from_file("strata.toml")?
            } else {
                Self::default()
            }
        };

        // Generations live in the XDG data dir unless a root was set
        if config.storage.root == default_storage_root() {
            config.storage.root = xdg.generations_dir();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(host) = env::var("OLLAMA_HOST") {
            self.models.ollama_url = host;
        }
        if let Ok(model) = env::var("STRATA_EMBEDDING_MODEL") {
            self.models.embedding_model = model;
        }
        if let Ok(model) = env::var("STRATA_LLM_MODEL") {
            self.models.llm_model = model;
        }

        if let Ok(doc_path) = env::var("STRATA_DOC_PATH") {
            self.indexing.doc_path = PathBuf::from(doc_path);
        }
        if let Ok(chunk_size) = env::var("STRATA_CHUNK_SIZE") {
            if let Ok(size) = chunk_size.parse() {
                self.indexing.chunk_size = size;
            }
        }
        if let Ok(overlap) = env::var("STRATA_CHUNK_OVERLAP") {
            if let Ok(o) = overlap.parse() {
                self.indexing.chunk_overlap = o;
            }
        }

        if let Ok(data_dir) = env::var("STRATA_DATA_DIR") {
            self.storage.root = PathBuf::from(data_dir).join("generations");
        }

        if let Ok(k) = env::var("STRATA_RETRIEVER_K") {
            if let Ok(k) = k.parse() {
                self.retrieval.k = k;
            }
        }

        if let Ok(host) = env::var("STRATA_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("STRATA_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.indexing.chunk_size == 0 {
            return Err(StrataError::Config(
                "Chunk size must be non-zero".to_string(),
            ));
        }

        if self.indexing.chunk_overlap >= self.indexing.chunk_size {
            return Err(StrataError::Config(
                "Chunk overlap must be less than chunk size".to_string(),
            ));
        }

        if self.indexing.extensions.is_empty() {
            return Err(StrataError::Config(
                "At least one file extension must be configured".to_string(),
            ));
        }

        if self.retrieval.k == 0 {
            return Err(StrataError::Config(
                "Retriever k must be non-zero".to_string(),
            ));
        }

        for slot in ["{context}", "{question}"] {
            if !self.retrieval.template.contains(slot) {
                return Err(StrataError::Config(format!(
                    "Prompt template is missing the {slot} slot"
                )));
            }
        }

        if self.storage.dir_prefix.is_empty() {
            return Err(StrataError::Config(
                "Generation directory prefix must not be empty".to_string(),
            ));
        }

        if self.models.embed_batch_size == 0 {
            return Err(StrataError::Config(
                "Embedding batch size must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Ollama URL: {}", self.models.ollama_url);
        tracing::info!("  Embedding model: {}", self.models.embedding_model);
        tracing::info!("  LLM model: {}", self.models.llm_model);
        tracing::info!("  Document root: {:?}", self.indexing.doc_path);
        tracing::info!("  Chunk size: {} chars", self.indexing.chunk_size);
        tracing::info!("  Chunk overlap: {} chars", self.indexing.chunk_overlap);
        tracing::info!("  Extensions: {:?}", self.indexing.extensions);
        tracing::info!("  Storage root: {:?}", self.storage.root);
        tracing::info!("  Retriever k: {}", self.retrieval.k);
    }
}
