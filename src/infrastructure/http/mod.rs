//! HTTP plumbing shared by the embedding and completion adapters
//!
//! - Client construction with request timeouts
//! - JSON request/response helper with status classification
//! - Retry with exponential backoff

pub mod error;
pub mod retry;

pub use error::HttpCallError;
pub use retry::RetryPolicy;

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// Build an HTTP client whose every request is bounded by `timeout_secs`.
pub fn build_client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
        .build()
}

/// Send a prepared request and decode a JSON body.
///
/// Non-success statuses become [`HttpCallError::Status`] carrying the body
/// text, so server-side error messages reach the logs.
pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, HttpCallError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read response body".to_string());
        return Err(HttpCallError::Status { status, body });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| HttpCallError::Decode(e.to_string()))
}
