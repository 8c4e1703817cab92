//! Shared HTTP plumbing: client construction and bounded retry.
//!
//! Every request goes out with the per-request timeout from
//! [`NetworkConfig`]. Transient failures (connect errors, timeouts, HTTP 429
//! and 5xx) are retried up to `max_retries` times with doubling backoff.
//! Other failures are returned immediately.

use reqwest::{RequestBuilder, Response, StatusCode};

use crate::config::NetworkConfig;

/// Failure of a single logical request after retries
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Build the HTTP client used for every call in a run.
pub fn build_client(network: &NetworkConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .gzip(true)
        .timeout(network.timeout())
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
}

/// Whether a status code is worth retrying
pub fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn is_transient_error(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.is_request()
}

/// Send the request built by `build`, retrying transient failures.
///
/// `build` is called once per attempt because a `RequestBuilder` is consumed
/// by `send`.
pub async fn send_with_retry<F>(network: &NetworkConfig, build: F) -> Result<Response, HttpError>
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 0;
    loop {
        let result = build().send().await;

        let retryable = match &result {
            Ok(response) => is_transient_status(response.status()),
            Err(e) => is_transient_error(e),
        };

        if !retryable || attempt >= network.max_retries {
            let response = result?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(HttpError::Status {
                    status,
                    body: body.chars().take(200).collect(),
                });
            }
            return Ok(response);
        }

        attempt += 1;
        let delay = network.backoff(attempt);
        match &result {
            Ok(response) => tracing::warn!(
                "HTTP {} from {}, retry {}/{} in {:?}",
                response.status(),
                response.url(),
                attempt,
                network.max_retries,
                delay
            ),
            Err(e) => tracing::warn!(
                "Request failed ({}), retry {}/{} in {:?}",
                e,
                attempt,
                network.max_retries,
                delay
            ),
        }
        tokio::time::sleep(delay).await;
    }
}
