//! Tests for the CLI command handlers
//!
//! Each command runs in both output formats against services over a
//! temporary storage root.

use crate::common::{create_test_services, TestRepo};
use strata::cli::commands::{ask, chunks, clear, config, index, stats};
use strata::cli::OutputFormat;
use strata::core::xdg::XdgDirs;

fn index_args() -> index::IndexArgs {
    index::IndexArgs {
        path: None,
        quiet: true,
    }
}

#[tokio::test]
async fn test_index_human() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());

    let result = index::execute(index_args(), &ts.services, OutputFormat::Human).await;

    assert!(result.is_ok(), "Index should succeed: {:?}", result.err());
    assert_eq!(ts.services.resolver().list().unwrap().len(), 1);
}

#[tokio::test]
async fn test_index_json() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());

    let result = index::execute(index_args(), &ts.services, OutputFormat::Json).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_index_empty_tree_fails() {
    let repo = TestRepo::empty();
    let ts = create_test_services(repo.path());

    let err = index::execute(index_args(), &ts.services, OutputFormat::Human)
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("No chunks produced"));
}

#[tokio::test]
async fn test_ask_returns_answer() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    let args = ask::AskArgs {
        words: vec!["What".into(), "does".into(), "AccountController".into(), "do?".into()],
    };
    let result = ask::execute(args, &ts.services, OutputFormat::Json).await;

    assert!(result.is_ok());
    let prompts = ts.completer.prompts();
    assert!(prompts[0].contains("What does AccountController do?"));
}

#[tokio::test]
async fn test_ask_blank_question_is_answered() {
    let repo = TestRepo::empty();
    let ts = create_test_services(repo.path());

    let args = ask::AskArgs {
        words: vec![" ".into()],
    };
    let result = ask::execute(args, &ts.services, OutputFormat::Human).await;

    assert!(result.is_ok());
    assert_eq!(ts.completer.prompts().len(), 1);
}

#[tokio::test]
async fn test_stats_human_and_json() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    let human = stats::execute(
        stats::StatsArgs { files: true },
        &ts.services,
        OutputFormat::Human,
    )
    .await;
    let json = stats::execute(
        stats::StatsArgs { files: false },
        &ts.services,
        OutputFormat::Json,
    )
    .await;

    assert!(human.is_ok());
    assert!(json.is_ok());
}

#[tokio::test]
async fn test_clear_with_confirmation_skipped() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    let result = clear::execute(
        clear::ClearArgs { yes: true },
        &ts.services,
        OutputFormat::Human,
    )
    .await;

    assert!(result.is_ok());
    assert!(ts.services.resolver().list().unwrap().is_empty());
}

#[tokio::test]
async fn test_clear_json_never_prompts() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    let result = clear::execute(
        clear::ClearArgs { yes: false },
        &ts.services,
        OutputFormat::Json,
    )
    .await;

    assert!(result.is_ok());
    assert!(ts.services.resolver().list().unwrap().is_empty());
}

#[tokio::test]
async fn test_chunks_found_and_missing() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    let found = chunks::execute(
        chunks::ChunksArgs {
            path: "web/AccountController.java".to_string(),
        },
        &ts.services,
        OutputFormat::Human,
    )
    .await;
    let missing = chunks::execute(
        chunks::ChunksArgs {
            path: "Nope.java".to_string(),
        },
        &ts.services,
        OutputFormat::Json,
    )
    .await;

    assert!(found.is_ok());
    assert!(missing.is_ok());
}

#[tokio::test]
async fn test_show_config() {
    let repo = TestRepo::empty();
    let ts = create_test_services(repo.path());
    let xdg = XdgDirs::new();

    let human = config::execute(
        config::ConfigArgs { all: true },
        &ts.services,
        &xdg,
        OutputFormat::Human,
    )
    .await;
    let json = config::execute(
        config::ConfigArgs { all: false },
        &ts.services,
        &xdg,
        OutputFormat::Json,
    )
    .await;

    assert!(human.is_ok());
    assert!(json.is_ok());
}
