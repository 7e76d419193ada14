//! # Retrying Transport
//!
//! Everything that touches the network goes through this module.
//!
//! ## Layers
//!
//! - [`Backend`]: the HTTP seam. One call, one request, no retries. [`HttpBackend`] is the
//!   `reqwest` implementation; [`MockBackend`](crate::framework::mock::MockBackend) is the
//!   in-memory one used by tests.
//! - [`RetryingTransport`]: wraps a backend with a fixed timeout and a fixed-delay retry loop.
//!
//! ## Retry policy
//!
//! Up to [`RetryPolicy::max_attempts`] attempts, separated by a constant
//! [`RetryPolicy::delay`]. No exponential backoff and no jitter: the backend is a single slow
//! host that idles when unused, and the dashboard issues a handful of requests per minute.
//!
//! A failure is retried when no response arrived at all (network error or client-side timeout)
//! or when the status is 408, 429 or 5xx. Everything else propagates on the first attempt.
//!
//! Writes are retried too. There are no idempotency keys, so a POST whose response was lost in
//! transit may be applied twice.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde_json::Value;
use tracing::{debug, warn};

// =============================================================================
// 1. ERRORS
// =============================================================================

/// Failure of a single backend call.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum TransportError {
    /// The call did not complete before its client-side timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// No response was received (connection refused, DNS, reset...).
    #[error("Network error: {0}")]
    Network(String),
    /// A response arrived with a non-success status.
    #[error("Backend responded with status {status}")]
    Status { status: u16, body: Value },
}

impl TransportError {
    /// Whether the failure is transient and worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Timeout(_) | TransportError::Network(_) => true,
            TransportError::Status { status, .. } => {
                matches!(status, 408 | 429) || (500..=599).contains(status)
            }
        }
    }

    /// The structured `error` field the backend put in its response body, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            TransportError::Status { body, .. } => body.get("error").and_then(Value::as_str),
            _ => None,
        }
    }

    /// The HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// 2. THE HTTP SEAM
// =============================================================================

/// One HTTP call against the backend. The path is relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub timeout: Duration,
}

/// A response, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: Value,
}

impl ApiReply {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Executes a single request.
///
/// Implementations return `Ok` for every response that arrived, including 4xx and 5xx, and `Err`
/// only when there is no response at all.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiReply, TransportError>;
}

/// `reqwest`-based backend.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn execute(&self, request: ApiRequest) -> Result<ApiReply, TransportError> {
        let url = self.url_for(&request.path);
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .timeout(request.timeout);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                warn!(path = %request.path, "Request timed out, backend might be asleep");
                TransportError::Timeout(request.timeout)
            } else {
                TransportError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(request.timeout)
            } else {
                TransportError::Network(e.to_string())
            }
        })?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(ApiReply { status, body })
    }
}

// =============================================================================
// 3. RETRY POLICY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` counts the initial attempt; it is never lower than 1.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a failure on `attempt` (1-based) should be followed by another attempt.
    pub fn should_retry(&self, attempt: u32, error: &TransportError) -> bool {
        attempt < self.max_attempts && error.is_retryable()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_millis(2_000))
    }
}

// =============================================================================
// 4. THE RETRYING TRANSPORT
// =============================================================================

/// Shared by every resource client so that they all use one timeout and one retry policy.
#[derive(Clone)]
pub struct RetryingTransport {
    backend: Arc<dyn Backend>,
    policy: RetryPolicy,
    timeout: Duration,
}

impl RetryingTransport {
    pub fn new(backend: Arc<dyn Backend>, policy: RetryPolicy, timeout: Duration) -> Self {
        Self {
            backend,
            policy,
            timeout,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs `operation` until it succeeds, fails with a terminal error, or the attempts run out.
    ///
    /// The last error is returned when every attempt failed.
    pub async fn retry<T, F, Fut>(&self, mut operation: F) -> Result<T, TransportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if self.policy.should_retry(attempt, &e) => {
                    warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        error = %e,
                        "Retryable failure"
                    );
                    tokio::time::sleep(self.policy.delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_retryable() {
                        warn!(attempt, error = %e, "Retries exhausted");
                    } else {
                        debug!(attempt, error = %e, "Terminal failure");
                    }
                    return Err(e);
                }
            }
        }
    }

    /// Sends one logical request with the transport's timeout and retry policy.
    ///
    /// Non-success statuses come back as [`TransportError::Status`].
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiReply, TransportError> {
        let request = ApiRequest {
            method,
            path: path.to_string(),
            body,
            timeout: self.timeout,
        };
        debug!(method = %request.method, path, "Sending request");
        self.retry(|| {
            let request = request.clone();
            async move { into_checked(self.backend.execute(request).await) }
        })
        .await
    }

    /// A single attempt with its own timeout, bypassing the retry loop. Used for liveness probes.
    pub async fn probe(&self, path: &str, timeout: Duration) -> Result<ApiReply, TransportError> {
        let request = ApiRequest {
            method: Method::GET,
            path: path.to_string(),
            body: None,
            timeout,
        };
        into_checked(self.backend.execute(request).await)
    }
}

fn into_checked(reply: Result<ApiReply, TransportError>) -> Result<ApiReply, TransportError> {
    let reply = reply?;
    if reply.is_success() {
        Ok(reply)
    } else {
        Err(TransportError::Status {
            status: reply.status,
            body: reply.body,
        })
    }
}
