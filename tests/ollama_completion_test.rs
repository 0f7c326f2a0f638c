//! Integration tests for the Ollama completion adapter against a mock server.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{axis, memory_store, StaticEmbeddingProvider};
use mockito::{Matcher, Server};
use serde_json::json;
use strand::adapters::completion::{OllamaCompletionConfig, OllamaCompletionProvider};
use strand::domain::errors::DomainError;
use strand::domain::ports::CompletionProvider;
use strand::infrastructure::http::RetryPolicy;
use strand::services::{Agent, Retriever};

fn provider(server: &Server, retry: RetryPolicy) -> OllamaCompletionProvider {
    let config = OllamaCompletionConfig {
        url: format!("{}/api/generate", server.url()),
        model: "deepseek-r1:7b".to_string(),
        timeout_secs: 5,
    };
    OllamaCompletionProvider::new(config, retry).unwrap()
}

fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(max_retries, Duration::from_millis(1), Duration::from_millis(5))
}

#[tokio::test]
async fn test_generate_returns_response_field() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "model": "deepseek-r1:7b",
            "prompt": "Say hi",
            "stream": false
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"model": "deepseek-r1:7b", "response": "hi", "done": true}).to_string())
        .create_async()
        .await;

    let answer = provider(&server, RetryPolicy::none())
        .complete("Say hi")
        .await
        .unwrap();

    assert_eq!(answer, "hi");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_response_field_yields_empty_answer() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body(json!({"done": true}).to_string())
        .create_async()
        .await;

    let answer = provider(&server, RetryPolicy::none())
        .complete("anything")
        .await
        .unwrap();
    assert_eq!(answer, "");
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let mut server = Server::new_async().await;
    let failing = server
        .mock("POST", "/api/generate")
        .with_status(503)
        .with_body("loading model")
        .expect(3)
        .create_async()
        .await;

    let result = provider(&server, fast_retry(2)).complete("q").await;

    assert!(matches!(result, Err(DomainError::CompletionUnavailable(_))));
    failing.assert_async().await;
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .with_status(404)
        .with_body(r#"{"error":"model 'deepseek-r1:7b' not found"}"#)
        .expect(1)
        .create_async()
        .await;

    let err = provider(&server, fast_retry(3))
        .complete("q")
        .await
        .unwrap_err();

    match err {
        DomainError::CompletionUnavailable(reason) => {
            assert!(reason.contains("404"), "unexpected reason: {reason}");
            assert!(reason.contains("not found"), "unexpected reason: {reason}");
        }
        other => panic!("expected CompletionUnavailable, got {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_endpoint_is_completion_unavailable() {
    let config = OllamaCompletionConfig {
        url: "http://127.0.0.1:1/api/generate".to_string(),
        model: "deepseek-r1:7b".to_string(),
        timeout_secs: 2,
    };
    let provider = OllamaCompletionProvider::new(config, RetryPolicy::none()).unwrap();

    assert!(matches!(
        provider.complete("q").await,
        Err(DomainError::CompletionUnavailable(_))
    ));
}

#[tokio::test]
async fn test_agent_renders_http_failure_with_error_prefix() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let embedder = Arc::new(StaticEmbeddingProvider::new(2).with("q", axis(2, 0)));
    let store = memory_store(2, &[("doc", axis(2, 0))]).await;
    let agent = Agent::new(
        Retriever::new(embedder, store).unwrap(),
        Arc::new(provider(&server, RetryPolicy::none())),
    );

    let answer = agent.run("q").await;
    assert!(answer.starts_with("Error calling LLM: "), "got {answer}");
    assert!(answer.contains("500"), "got {answer}");
}
