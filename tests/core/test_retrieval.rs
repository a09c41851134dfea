// Answers are produced from chunks of the live generation placed in
// the prompt's context slot.

use std::sync::Arc;

use crate::common::fixtures::services_with;
use crate::common::{create_test_services, FailingCompleter, TestRepo};
use strata::core::error::StrataError;

#[tokio::test]
async fn test_answer_uses_indexed_chunk_as_context() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    let answer = ts
        .services
        .answer("What does AccountController do?")
        .await
        .unwrap();

    assert!(!answer.is_empty());
    assert_eq!(answer, answer.trim());
    assert!(answer.contains("public class AccountController"));

    let prompts = ts.completer.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("What does AccountController do?"));
    assert!(prompts[0].contains("@RequestMapping(\"/accounts\")"));
}

#[tokio::test]
async fn test_answer_follows_new_generation() {
    let repo = TestRepo::with_files(&[("Old.java", "class LegacyBilling {}")]);
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    std::fs::remove_file(repo.path().join("Old.java")).unwrap();
    repo.write("New.java", b"class ModernInvoicing {}");
    ts.services.run_indexing().await;

    let answer = ts.services.answer("Which billing classes exist?").await.unwrap();

    assert!(answer.contains("ModernInvoicing"));
    assert!(!answer.contains("LegacyBilling"));
}

#[tokio::test]
async fn test_answer_without_index_has_empty_context() {
    let repo = TestRepo::empty();
    let ts = create_test_services(repo.path());

    let answer = ts.services.answer("Anything indexed?").await.unwrap();

    assert!(answer.contains("Anything indexed?"));
    assert_eq!(ts.completer.prompts().len(), 1);
}

#[tokio::test]
async fn test_blank_question_reaches_model() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());

    let result = ts.services.answer("   ").await;

    assert!(result.is_ok());
    assert_eq!(ts.completer.prompts().len(), 1);
}

#[tokio::test]
async fn test_completion_failure_surfaces_message() {
    let repo = TestRepo::spring_app();
    let (services, _storage) = services_with(repo.path(), Arc::new(FailingCompleter));
    services.run_indexing().await;

    let err = services
        .answer("What does AccountController do?")
        .await
        .unwrap_err();

    assert!(matches!(err, StrataError::Completion(_)));
    assert!(err.to_string().contains("connection refused"));
}
