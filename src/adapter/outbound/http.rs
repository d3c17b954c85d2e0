//! Shared HTTP plumbing for the price source adapters.
//!
//! Every request is bounded by the client timeout. Connect failures and
//! timeouts are retried up to the configured attempt count; everything else
//! is mapped straight to a [`SourceError`] kind.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::warn;
use url::Url;

use crate::error::{ConfigError, SourceError};

/// Timeouts and retry policy for one adapter.
#[derive(Debug, Clone, Copy)]
pub struct HttpPolicy {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub retry_max_attempts: u32,
    pub retry_backoff: Duration,
}

/// Build a client with the policy's timeouts.
pub fn build_client(policy: &HttpPolicy, user_agent: &str) -> HttpClient {
    HttpClient::builder()
        .timeout(policy.timeout)
        .connect_timeout(policy.connect_timeout)
        .user_agent(user_agent)
        .build()
        .unwrap_or_else(|err| {
            warn!(error = %err, "Failed to build HTTP client, using defaults");
            HttpClient::new()
        })
}

/// Parse an adapter base URL, rejecting anything that cannot take a path.
pub fn parse_base_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|err| ConfigError::InvalidValue {
        field,
        reason: err.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("expected an http(s) URL, got {raw}"),
        });
    }
    Ok(url)
}

/// GET `url` and decode a JSON body, retrying transient transport failures.
pub async fn get_json<T>(
    http: &HttpClient,
    url: &str,
    policy: &HttpPolicy,
    source: &'static str,
) -> Result<T, SourceError>
where
    T: DeserializeOwned,
{
    let max_attempts = policy.retry_max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        let response = match http.get(url).header("Accept", "application/json").send().await {
            Ok(response) => response,
            Err(err) => {
                if attempt >= max_attempts || !should_retry(&err) {
                    return Err(SourceError::from_transport(&err));
                }
                backoff(policy, attempt, max_attempts, source, &err).await;
                continue;
            }
        };

        if let Some(kind) = SourceError::from_status(response.status()) {
            return Err(kind);
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                if attempt >= max_attempts || !should_retry(&err) {
                    return Err(SourceError::from_transport(&err));
                }
                backoff(policy, attempt, max_attempts, source, &err).await;
                continue;
            }
        };

        return serde_json::from_slice(&body).map_err(|err| {
            warn!(source, url, error = %err, "Undecodable response body");
            SourceError::MalformedResponse
        });
    }
}

fn should_retry(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

async fn backoff(
    policy: &HttpPolicy,
    attempt: u32,
    max_attempts: u32,
    source: &'static str,
    err: &reqwest::Error,
) {
    warn!(
        source,
        attempt,
        max_attempts,
        error = %err,
        "HTTP request failed, retrying"
    );
    if !policy.retry_backoff.is_zero() {
        sleep(policy.retry_backoff).await;
    }
}
