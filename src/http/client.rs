//! HTTP client with retrying reads and single-shot writes.

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::retry::{MAX_RETRIES, RETRY_DELAY_MS, check_response, is_retryable_error};

/// HTTP client wrapping a configured reqwest [`Client`].
///
/// GETs are idempotent and retried on transient failures. POSTs create
/// remote state and are sent exactly once.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Performs a GET request and deserializes the JSON response.
    /// Automatically retries on transient errors.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get_json_with_query(url, &[]).await
    }

    /// Performs a GET request with query parameters and deserializes the JSON response.
    /// Automatically retries on transient errors.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        debug!("GET JSON from {} with query {:?}...", url, query);

        self.with_retry("GET JSON", || async {
            let response = self
                .client
                .get(url)
                .query(query)
                .send()
                .await
                .context("Failed to send request")?;

            let result = check_response(response)
                .await?
                .json::<T>()
                .await
                .context("Failed to parse JSON response")?;

            Ok(result)
        })
        .await
    }

    /// Performs a POST request with a JSON body and deserializes the JSON response.
    #[tracing::instrument(skip(self, body))]
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        debug!("POST JSON to {}...", url);

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        check_response(response)
            .await?
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    /// Performs a POST request with a raw, possibly streamed, body and
    /// deserializes the JSON response. `content_length` is sent explicitly
    /// since streamed bodies carry no length of their own.
    #[tracing::instrument(skip(self, query, body))]
    pub async fn post_body<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        content_type: &str,
        content_length: u64,
        body: impl Into<Body>,
    ) -> Result<T> {
        debug!("POST {} bytes to {} with query {:?}...", content_length, url, query);

        let response = self
            .client
            .post(url)
            .query(query)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, content_length)
            .body(body)
            .send()
            .await
            .context("Failed to send request")?;

        check_response(response)
            .await?
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    /// Executes an async operation with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation_name: &str, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 1..=MAX_RETRIES {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !is_retryable_error(&e) {
                        debug!("{}: non-retryable error: {}", operation_name, e);
                        return Err(e);
                    }

                    if attempt < MAX_RETRIES {
                        warn!(
                            "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                            operation_name, attempt, MAX_RETRIES, e, RETRY_DELAY_MS
                        );
                        tokio::time::sleep(std::time::Duration::from_millis(RETRY_DELAY_MS)).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            anyhow::anyhow!("{}: failed after {} attempts", operation_name, MAX_RETRIES)
        }))
    }
}
