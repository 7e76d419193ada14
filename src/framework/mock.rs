//! # Mock Backend
//!
//! Utilities for testing clients, watches and warmup without a network.
//!
//! [`MockBackend`] implements the [`Backend`] seam with a queue of expectations. Every request
//! pops the next expectation, checks method and path, and answers with the scripted reply.
//!
//! # Example
//! ```ignore
//! let mut mock = MockBackend::new();
//! mock.expect(Method::GET, "/api/orders").return_status(503);
//! mock.expect(Method::GET, "/api/orders").return_json(200, json!({ "orders": [] }));
//!
//! let transport = RetryingTransport::new(mock.backend(), RetryPolicy::default(), timeout);
//! // Use transport in tests...
//! mock.verify(); // Ensures all expectations were met
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::transport::{ApiReply, ApiRequest, Backend, TransportError};

/// Represents an expected request and the reply to give it.
struct Expectation {
    method: Method,
    path: String,
    delay: Duration,
    reply: Result<ApiReply, TransportError>,
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    received: Vec<ApiRequest>,
}

/// A scripted backend with expectation tracking for fluent testing.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    /// Creates a new mock backend with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the backend for use in transports.
    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::new(self.clone())
    }

    /// Expects a request with this method and path.
    pub fn expect(&mut self, method: Method, path: &str) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            path: path.to_string(),
            delay: Duration::ZERO,
            state: self.state.clone(),
        }
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().received.clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn execute(&self, request: ApiRequest) -> Result<ApiReply, TransportError> {
        let expectation = {
            let mut state = self.state.lock().unwrap();
            state.received.push(request.clone());
            state.expectations.pop_front()
        };

        let Some(expectation) = expectation else {
            panic!("Unexpected request: {} {}", request.method, request.path);
        };
        if expectation.method != request.method || expectation.path != request.path {
            panic!(
                "Expected {} {}, got {} {}",
                expectation.method, expectation.path, request.method, request.path
            );
        }

        if !expectation.delay.is_zero() {
            tokio::time::sleep(expectation.delay).await;
        }
        expectation.reply
    }
}

/// Builder for a single expectation.
pub struct ExpectationBuilder {
    method: Method,
    path: String,
    delay: Duration,
    state: Arc<Mutex<MockState>>,
}

impl ExpectationBuilder {
    /// Holds the reply back for `delay` before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Answers with a status and a JSON body.
    pub fn return_json(self, status: u16, body: Value) {
        self.push(Ok(ApiReply::new(status, body)));
    }

    /// Answers with a status and an empty body.
    pub fn return_status(self, status: u16) {
        self.push(Ok(ApiReply::new(status, Value::Null)));
    }

    /// Fails as if the client-side timeout had expired.
    pub fn return_timeout(self) {
        self.push(Err(TransportError::Timeout(Duration::from_secs(30))));
    }

    /// Fails as if no connection could be made.
    pub fn return_network_error(self) {
        self.push(Err(TransportError::Network("connection refused".to_string())));
    }

    fn push(self, reply: Result<ApiReply, TransportError>) {
        let mut state = self.state.lock().unwrap();
        state.expectations.push_back(Expectation {
            method: self.method,
            path: self.path,
            delay: self.delay,
            reply,
        });
    }
}
