// Statistics over the live generation.

use crate::common::{create_test_services, TestRepo};

#[tokio::test]
async fn test_stats_without_index() {
    let repo = TestRepo::empty();
    let ts = create_test_services(repo.path());

    let report = ts.services.stats();
    let summary = report.summary().expect("summary");

    assert_eq!(summary.total_chunks, 0);
    assert_eq!(summary.average_chunk_size, 0);
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.unique_packages, 0);
    assert!(summary.files.is_empty());
    assert_eq!(
        summary.persist_dir,
        ts.services.resolver().default_dir().display().to_string()
    );
}

#[tokio::test]
async fn test_stats_after_indexing() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    let report = ts.services.run_indexing().await;

    let stats = ts.services.stats();
    let summary = stats.summary().expect("summary");

    assert_eq!(summary.total_chunks, report.chunk_count);
    assert!(summary.average_chunk_size > 0);
    assert_eq!(summary.total_files, 4);
    // web, service, resources and the tree root
    assert_eq!(summary.unique_packages, 4);
    assert_eq!(summary.chunk_size, 400);
    assert_eq!(summary.chunk_overlap, 40);
    assert_eq!(summary.retriever_k, ts.services.config.retrieval.k);
    assert_eq!(
        summary.persist_dir,
        report.generation.unwrap().display().to_string()
    );

    let mut sorted = summary.files.clone();
    sorted.sort();
    assert_eq!(summary.files, sorted);
}

#[tokio::test]
async fn test_stats_serialize_flat() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    let json = serde_json::to_value(ts.services.stats()).unwrap();

    assert!(json.get("total_chunks").is_some());
    assert!(json.get("files").unwrap().is_array());
    assert!(json.get("error").is_none());
}
