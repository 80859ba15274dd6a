//! The HTTP search backend client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use quarry_core::config::{BackendConfig, TimeoutConfig};
use quarry_core::errors::BackendError;
use quarry_core::models::{BackendHit, KeywordRequest, SemanticRequest, VectorRequest};
use quarry_core::traits::SearchBackend;
use quarry_core::QuarryResult;

use crate::filter;
use crate::protocol::{KeywordBody, SearchResults, SemanticBody, VectorBody};
use crate::retry::RetryPolicy;

/// Async client for the search backend.
///
/// Holds one `reqwest::Client` (connection pool keyed by endpoint) and a
/// semaphore bounding pending calls; when the bound is exhausted the call
/// fails fast instead of queueing.
pub struct HttpSearchBackend {
    http: reqwest::Client,
    endpoint: String,
    pending: Arc<Semaphore>,
    policy: RetryPolicy,
    call_timeout: Duration,
}

impl HttpSearchBackend {
    pub fn new(config: &BackendConfig, timeouts: &TimeoutConfig) -> QuarryResult<Self> {
        let call_timeout = Duration::from_millis(timeouts.backend_call_ms);
        let http = reqwest::Client::builder()
            .timeout(call_timeout)
            .build()
            .map_err(|e| BackendError::Transport {
                reason: e.to_string(),
            })?;
        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            pending: Arc::new(Semaphore::new(config.pending_limit)),
            policy: RetryPolicy::from_config(config),
            call_timeout,
        })
    }

    /// POST a body to `{endpoint}/{path}`, retrying on 5xx and connect
    /// errors per the backoff policy.
    async fn call<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Vec<BackendHit>, BackendError> {
        // Fail fast when the pending queue is saturated.
        let _permit = self
            .pending
            .clone()
            .try_acquire_owned()
            .map_err(|_| BackendError::Overloaded)?;

        let url = format!("{}/{}", self.endpoint, path);
        let mut last_error = BackendError::Transport {
            reason: "no attempt made".into(),
        };

        for attempt in 1..=self.policy.max_attempts() {
            match self.http.post(&url).json(body).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed: SearchResults =
                            response
                                .json()
                                .await
                                .map_err(|e| BackendError::MalformedResponse {
                                    reason: e.to_string(),
                                })?;
                        debug!(path, attempt, hits = parsed.results.len(), "backend call ok");
                        return Ok(parsed.results);
                    }
                    if !status.is_server_error() {
                        // 4xx is not retryable: the request itself is wrong.
                        return Err(BackendError::Status {
                            status: status.as_u16(),
                        });
                    }
                    last_error = BackendError::Status {
                        status: status.as_u16(),
                    };
                }
                Err(e) if e.is_timeout() => {
                    last_error = BackendError::Timeout {
                        millis: self.call_timeout.as_millis() as u64,
                    };
                }
                Err(e) if e.is_connect() || e.is_request() => {
                    last_error = BackendError::Transport {
                        reason: e.to_string(),
                    };
                }
                Err(e) => {
                    return Err(BackendError::Transport {
                        reason: e.to_string(),
                    });
                }
            }

            if attempt < self.policy.max_attempts() {
                let delay = self.policy.delay(attempt);
                warn!(path, attempt, ?delay, error = %last_error, "backend call failed, retrying");
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error)
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn keyword_search(&self, request: &KeywordRequest) -> QuarryResult<Vec<BackendHit>> {
        let filter = filter::render(&request.filters)?;
        let body = KeywordBody {
            query: &request.query,
            top_k: request.top_k,
            filter,
        };
        Ok(self.call("search/keyword", &body).await?)
    }

    async fn vector_search(&self, request: &VectorRequest) -> QuarryResult<Vec<BackendHit>> {
        let filter = filter::render(&request.filters)?;
        let body = VectorBody {
            vector: &request.vector,
            top_k: request.top_k,
            filter,
        };
        Ok(self.call("search/vector", &body).await?)
    }

    async fn semantic_search(&self, request: &SemanticRequest) -> QuarryResult<Vec<BackendHit>> {
        let filter = filter::render(&request.filters)?;
        let body = SemanticBody {
            query: &request.query,
            top_k: request.top_k,
            filter,
        };
        Ok(self.call("search/semantic", &body).await?)
    }
}
