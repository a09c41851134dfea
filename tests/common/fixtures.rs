// Test fixtures for integration testing

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use strata::core::config::Config;
use strata::core::llm::Completer;
use strata::core::services::Services;
use strata::core::storage::GenerationResolver;
use tempfile::TempDir;

use super::providers::{KeywordEmbedder, RecordingCompleter};

/// Synthetic document tree
#[allow(dead_code)]
pub struct TestRepo {
    pub dir: TempDir,
}

#[allow(dead_code)]
impl TestRepo {
    /// Empty tree
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Tree with the given (relative_path, content) files
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let repo = Self::empty();
        for (path, content) in files {
            repo.write(path, content.as_bytes());
        }
        repo
    }

    /// A small Spring Boot style project
    pub fn spring_app() -> Self {
        Self::with_files(&[
            (
                "src/main/java/com/example/web/AccountController.java",
                "package com.example.web;\n\n\
                 @RestController\n\
                 @RequestMapping(\"/accounts\")\n\
                 public class AccountController {\n\
                 \x20   private final AccountService accountService;\n\n\
                 \x20   @GetMapping(\"/{id}\")\n\
                 \x20   public Account getAccount(@PathVariable Long id) {\n\
                 \x20       return accountService.findById(id);\n\
                 \x20   }\n\
                 }\n",
            ),
            (
                "src/main/java/com/example/service/AccountService.java",
                "package com.example.service;\n\n\
                 @Service\n\
                 public class AccountService {\n\
                 \x20   public Account findById(Long id) {\n\
                 \x20       return repository.findById(id).orElseThrow();\n\
                 \x20   }\n\
                 }\n",
            ),
            (
                "src/main/resources/application.properties",
                "spring.datasource.url=jdbc:h2:mem:accounts\nserver.port=8080\n",
            ),
            ("pom.xml", "<project>\n  <artifactId>accounts</artifactId>\n</project>\n"),
        ])
    }

    pub fn write(&self, path: &str, content: &[u8]) {
        let full = self.dir.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(full, content).expect("Failed to write file");
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Services over a temporary storage root, plus the handles tests inspect
#[allow(dead_code)]
pub struct TestServices {
    pub services: Arc<Services>,
    pub completer: Arc<RecordingCompleter>,
    pub storage: TempDir,
}

/// Services indexing `docs` into a fresh storage root
#[allow(dead_code)]
pub fn create_test_services(docs: &Path) -> TestServices {
    let completer = Arc::new(RecordingCompleter::default());
    let (services, storage) = services_with(docs, completer.clone());
    TestServices {
        services,
        completer,
        storage,
    }
}

/// Services with an explicit completer
#[allow(dead_code)]
pub fn services_with(docs: &Path, completer: Arc<dyn Completer>) -> (Arc<Services>, TempDir) {
    let storage = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(docs, storage.path());

    let services = Services::with_providers(config, Arc::new(KeywordEmbedder), completer)
        .expect("Failed to create services");
    (Arc::new(services), storage)
}

/// Services whose generation deletes fail while the returned flag is set
#[allow(dead_code)]
pub fn create_services_with_stuck_dirs(docs: &Path) -> (TestServices, Arc<AtomicBool>) {
    let storage = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(docs, storage.path());

    let stuck = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stuck);
    let resolver = GenerationResolver::new(
        config.storage.root.clone(),
        config.storage.dir_prefix.clone(),
    )
    .with_remover(Arc::new(move |dir: &Path| {
        if flag.load(Ordering::SeqCst) {
            Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "directory is busy",
            ))
        } else {
            std::fs::remove_dir_all(dir)
        }
    }));

    let completer = Arc::new(RecordingCompleter::default());
    let services = Services::with_resolver(
        config,
        resolver,
        Arc::new(KeywordEmbedder),
        completer.clone(),
    )
    .expect("Failed to create services");

    let ts = TestServices {
        services: Arc::new(services),
        completer,
        storage,
    };
    (ts, stuck)
}

fn test_config(docs: &Path, storage: &Path) -> Config {
    let mut config = Config::default();
    config.indexing.doc_path = docs.to_path_buf();
    config.indexing.chunk_size = 400;
    config.indexing.chunk_overlap = 40;
    config.storage.root = storage.to_path_buf();
    config
}
