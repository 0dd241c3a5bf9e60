//! OpenAI-compatible embeddings client.
//!
//! Implements the `Embedder` trait from `prodvec-core` against
//! `POST {base_url}/embeddings`. Rate limits (429), server errors and
//! transport failures are retried with exponential backoff.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when building the `Authorization` header.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use prodvec_core::embedder::Embedder;
use prodvec_types::config::OpenAiConfig;
use prodvec_types::error::EmbeddingError;

/// Embeddings client for OpenAI and compatible endpoints.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    dimension: usize,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl OpenAiEmbedder {
    /// Build a client from config.
    ///
    /// `dimension` is the vector size the store expects. It is sent as the
    /// `dimensions` request field for `text-embedding-3-*` models, which
    /// support shortened outputs; other models return their native size.
    pub fn new(
        config: &OpenAiConfig,
        api_key: SecretString,
        dimension: usize,
    ) -> Result<Self, EmbeddingError> {
        if api_key.expose_secret().trim().is_empty() {
            return Err(EmbeddingError::MissingApiKey);
        }
        if config.embedding_model.trim().is_empty() {
            return Err(EmbeddingError::Request("embedding model name is empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret().trim()))
            .map_err(|_| EmbeddingError::Request("API key is not a valid header value".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| EmbeddingError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", config.base_url.trim_end_matches('/')),
            model: config.embedding_model.clone(),
            dimension,
            max_retries: config.max_retries,
            retry_base_delay: Duration::from_millis(500),
        })
    }

    /// Override the first retry delay (doubles per attempt).
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    fn requested_dimensions(&self) -> Option<usize> {
        self.model
            .starts_with("text-embedding-3")
            .then_some(self.dimension)
    }

    fn retry_backoff(&self, attempt: u32) -> Duration {
        self.retry_base_delay * (1u32 << attempt.min(5))
    }

    async fn send_once(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, Attempt> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
            dimensions: self.requested_dimensions(),
        };

        let response = match self.client.post(&self.endpoint).json(&request).send().await {
            Ok(resp) => resp,
            Err(e) => {
                let retryable = e.is_timeout() || e.is_connect() || e.is_request();
                return Err(Attempt {
                    error: EmbeddingError::Request(e.to_string()),
                    retryable,
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(Attempt {
                error: EmbeddingError::Status {
                    status: status.as_u16(),
                    body,
                },
                retryable: status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error(),
            });
        }

        let mut parsed: EmbeddingResponse = response.json().await.map_err(|e| Attempt {
            error: EmbeddingError::Malformed(e.to_string()),
            retryable: false,
        })?;
        parsed.data.sort_by_key(|entry| entry.index);

        if parsed.data.len() != texts.len() {
            return Err(Attempt {
                error: EmbeddingError::Malformed(format!(
                    "{} embeddings returned for {} inputs",
                    parsed.data.len(),
                    texts.len()
                )),
                retryable: false,
            });
        }
        Ok(parsed.data.into_iter().map(|entry| entry.embedding).collect())
    }
}

struct Attempt {
    error: EmbeddingError,
    retryable: bool,
}

impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut attempt = 0u32;
        loop {
            match self.send_once(texts).await {
                Ok(vectors) => return Ok(vectors),
                Err(failed) if failed.retryable && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.retry_backoff(attempt - 1);
                    tracing::warn!(
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %failed.error,
                        "retrying embedding request"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(failed) => return Err(failed.error),
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
