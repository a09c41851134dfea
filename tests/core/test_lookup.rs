// Three-tier source lookup against an indexed tree.

use crate::common::{create_test_services, TestRepo};

const CONTROLLER: &str = "src/main/java/com/example/web/AccountController.java";

#[tokio::test]
async fn test_exact_source_lookup() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    let source = format!("{}/{}", repo.path().display(), CONTROLLER);
    let chunks = ts.services.chunks_for(&source);

    assert!(!chunks.is_empty());
    assert!(chunks[0].contains("AccountController"));
}

#[tokio::test]
async fn test_normalized_lookup() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    let messy = format!(
        "{}/src/main/./java/com/example/service/../web/AccountController.java",
        repo.path().display()
    );
    let chunks = ts.services.chunks_for(&messy);

    assert!(!chunks.is_empty());
}

#[tokio::test]
async fn test_suffix_lookup_finds_prefixed_source() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    let chunks = ts.services.chunks_for("web/AccountController.java");

    assert!(!chunks.is_empty());
    assert!(chunks.iter().all(|c| !c.contains("class AccountService")));
}

#[tokio::test]
async fn test_suffix_lookup_accepts_backslashes() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    let chunks = ts.services.chunks_for(r"com\example\web\AccountController.java");

    assert!(!chunks.is_empty());
}

#[tokio::test]
async fn test_lookup_is_idempotent() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    let first = ts.services.chunks_for("AccountService.java");
    let second = ts.services.chunks_for("AccountService.java");

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unknown_path_is_empty() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    assert!(ts.services.chunks_for("web/OrderController.java").is_empty());
}
