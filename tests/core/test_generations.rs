// Generation lifecycle: one live generation after every build,
// failed builds never promote, clear resets to the default directory.

use std::sync::atomic::Ordering;

use crate::common::fixtures::create_services_with_stuck_dirs;
use crate::common::{create_test_services, TestRepo};
use strata::core::lookup;
use strata::core::storage::GenerationMetadata;

#[tokio::test]
async fn test_build_leaves_exactly_the_new_generation() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());

    let report = ts.services.run_indexing().await;
    assert!(report.chunk_count > 0, "log: {:?}", report.log);

    let generation = report.generation.expect("generation dir");
    let on_disk = ts.services.resolver().list().unwrap();
    assert_eq!(on_disk, vec![generation.clone()]);
    assert_eq!(ts.services.live_generation(), generation);
}

#[tokio::test]
async fn test_sequential_builds_replace_generation() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());

    let first = ts.services.run_indexing().await.generation.unwrap();
    let second = ts.services.run_indexing().await.generation.unwrap();

    assert_ne!(first, second);
    assert!(!first.exists());
    assert!(second.exists());

    let second_meta = GenerationMetadata::read(&second).unwrap();
    let second_name = second.file_name().unwrap().to_string_lossy().into_owned();
    assert!(second_name.ends_with(&second_meta.id));
    assert_ne!(first.file_name(), second.file_name());
}

#[tokio::test]
async fn test_build_removes_default_generation() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    let default_dir = ts.services.resolver().default_dir();
    std::fs::create_dir_all(&default_dir).unwrap();

    let report = ts.services.run_indexing().await;

    assert!(report.chunk_count > 0);
    assert!(!default_dir.exists());
    assert!(report
        .log
        .iter()
        .any(|line| line == "Removed 1 old generation(s)."));
}

#[tokio::test]
async fn test_empty_tree_keeps_live_generation() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    let live = ts.services.run_indexing().await.generation.unwrap();

    for entry in std::fs::read_dir(repo.path()).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            std::fs::remove_dir_all(path).unwrap();
        } else {
            std::fs::remove_file(path).unwrap();
        }
    }
    let report = ts.services.run_indexing().await;

    assert_eq!(report.chunk_count, 0);
    assert!(report.generation.is_none());
    assert!(report.log.last().unwrap().starts_with("No chunks produced"));
    assert_eq!(ts.services.live_generation(), live);
    assert_eq!(ts.services.resolver().list().unwrap(), vec![live]);
}

#[tokio::test]
async fn test_superseded_snapshot_stays_consistent() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    let before = ts.services.snapshot();
    ts.services.run_indexing().await;
    let after = ts.services.snapshot();

    assert_ne!(before.generation, after.generation);
    assert_eq!(before.chain.generation(), before.generation.as_path());
    assert_eq!(after.chain.generation(), after.generation.as_path());

    // The old directory is gone but the held snapshot still reads
    assert!(!before.generation.exists());
    let chunks = lookup::chunks_for(before.store.as_ref(), "AccountController.java");
    assert!(!chunks.is_empty());
    let answer = before
        .chain
        .answer("What does AccountController do?")
        .await
        .unwrap();
    assert!(!answer.is_empty());
    let prompts = ts.completer.prompts();
    assert!(prompts
        .last()
        .unwrap()
        .contains("public class AccountController"));
}

#[tokio::test]
async fn test_gc_failure_is_logged_and_new_generation_stays_live() {
    let repo = TestRepo::spring_app();
    let (ts, stuck) = create_services_with_stuck_dirs(repo.path());
    let first = ts.services.run_indexing().await.generation.unwrap();

    stuck.store(true, Ordering::SeqCst);
    let report = ts.services.run_indexing().await;

    assert!(report.chunk_count > 0, "log: {:?}", report.log);
    let second = report.generation.unwrap();
    assert_eq!(ts.services.live_generation(), second);
    assert!(first.exists());
    let expected = format!("Could not remove {}:", first.display());
    assert!(
        report.log.iter().any(|line| line.starts_with(&expected)),
        "log: {:?}",
        report.log
    );
    assert!(report.log.iter().any(|line| line.contains("directory is busy")));
}

#[tokio::test]
async fn test_clear_with_stuck_generation_reopens_it() {
    let repo = TestRepo::spring_app();
    let (ts, stuck) = create_services_with_stuck_dirs(repo.path());
    let report = ts.services.run_indexing().await;
    let generation = report.generation.unwrap();

    stuck.store(true, Ordering::SeqCst);
    let outcome = ts.services.clear_all().await;

    assert!(!outcome.success);
    assert!(outcome.message.starts_with("Clear incomplete: "));
    assert!(outcome
        .message
        .contains(&generation.display().to_string()));
    assert!(outcome.removed.is_empty());

    assert_eq!(ts.services.live_generation(), generation);
    assert_eq!(
        ts.services.stats().summary().unwrap().total_chunks,
        report.chunk_count
    );
    assert!(!ts.services.chunks_for("AccountController.java").is_empty());
}

#[tokio::test]
async fn test_clear_resets_to_empty_default() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    let outcome = ts.services.clear_all().await;

    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(
        outcome.message,
        "Database fully cleared (1 generation(s) removed)."
    );
    assert_eq!(outcome.removed.len(), 1);

    let default_dir = ts.services.resolver().default_dir();
    assert_eq!(ts.services.live_generation(), default_dir);
    let remaining = ts.services.resolver().list().unwrap();
    assert!(remaining.is_empty() || remaining == vec![default_dir]);

    let stats = ts.services.stats();
    assert_eq!(stats.summary().unwrap().total_chunks, 0);
}

#[tokio::test]
async fn test_clear_with_nothing_on_disk() {
    let repo = TestRepo::empty();
    let ts = create_test_services(repo.path());

    let outcome = ts.services.clear_all().await;

    assert!(outcome.success);
    assert!(outcome.removed.is_empty());
}

#[tokio::test]
async fn test_reindex_after_clear() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;
    ts.services.clear_all().await;

    let report = ts.services.run_indexing().await;

    assert!(report.chunk_count > 0);
    assert_eq!(
        ts.services.stats().summary().unwrap().total_chunks,
        report.chunk_count
    );
}

#[tokio::test]
async fn test_services_reopen_latest_generation() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    let report = ts.services.run_indexing().await;

    let reopened = strata::core::services::Services::with_providers(
        ts.services.config.as_ref().clone(),
        std::sync::Arc::new(crate::common::KeywordEmbedder),
        ts.completer.clone(),
    )
    .unwrap();

    assert_eq!(Some(reopened.live_generation()), report.generation);
    assert_eq!(
        reopened.stats().summary().unwrap().total_chunks,
        report.chunk_count
    );
}
