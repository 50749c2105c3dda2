//! HTTP client abstraction for the account-info endpoint.
//!
//! This module defines the `AccountClient` trait to abstract the remote
//! account lookup, enabling testability with mock implementations.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Response from an account-info request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as a string
    pub body: String,
}

/// Trait for fetching account info for a credential.
///
/// This abstraction allows for different implementations (production vs.
/// testing) and makes the batch runner testable without real network calls.
///
/// # Example
/// ```ignore
/// let client = ReqwestAccountClient::new();
/// let response = client.fetch_account(url, "sk-...", 15000).await?;
/// println!("Status: {}, Body: {}", response.status, response.body);
/// ```
#[async_trait]
pub trait AccountClient: Send + Sync + Clone {
    /// Fetch account info for one credential.
    ///
    /// The credential is presented as a bearer token in the Authorization
    /// header. A non-success HTTP status is NOT an error here; it comes
    /// back as a normal `AccountResponse` for the verifier to classify.
    ///
    /// # Errors
    /// Returns an error only for transport-level failures: the endpoint
    /// cannot be reached, the request times out, or the response body
    /// cannot be read.
    async fn fetch_account(
        &self,
        url: &str,
        credential: &str,
        timeout_ms: u64,
    ) -> Result<AccountResponse>;
}

// ============================================================================
// Production Implementation using reqwest
// ============================================================================

/// Production account client using reqwest.
#[derive(Clone, Default)]
pub struct ReqwestAccountClient {
    client: reqwest::Client,
}

impl ReqwestAccountClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AccountClient for ReqwestAccountClient {
    #[tracing::instrument(skip(self, credential), fields(url = %url, timeout_ms))]
    async fn fetch_account(
        &self,
        url: &str,
        credential: &str,
        timeout_ms: u64,
    ) -> Result<AccountResponse> {
        tracing::debug!("Fetching account info");

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", credential))
            .timeout(Duration::from_millis(timeout_ms))
            .send()
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Account request failed");
                e
            })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(
            status = status,
            response_len = body.len(),
            "Account request completed"
        );

        Ok(AccountResponse { status, body })
    }
}

// ============================================================================
// Test/Mock Implementation
// ============================================================================

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Mock account client for testing.
///
/// Allows configuring predetermined responses per credential without making
/// actual HTTP calls.
///
/// # Example
/// ```ignore
/// let mock = MockAccountClient::new();
/// mock.add_response(
///     "sk-live",
///     Ok(AccountResponse {
///         status: 200,
///         body: r#"{"data": {"balance": 5.0}}"#.to_string(),
///     }),
/// );
/// ```
#[derive(Clone, Default)]
pub struct MockAccountClient {
    responses: Arc<Mutex<HashMap<String, Vec<MockResponse>>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
    in_flight: Arc<AtomicUsize>,
}

/// A mock response that can optionally wait for a trigger before completing.
enum MockResponse {
    /// Immediate response
    Immediate(Result<AccountResponse>),
    /// Response that waits for a trigger signal before completing
    Triggered {
        response: Result<AccountResponse>,
        trigger: Arc<Mutex<Option<oneshot::Receiver<()>>>>,
    },
}

/// Record of a call made to the mock account client.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub url: String,
    pub credential: String,
    pub timeout_ms: u64,
}

impl MockAccountClient {
    /// Create a new mock account client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predetermined response for a credential.
    ///
    /// Multiple responses can be added for the same credential - they are
    /// consumed in FIFO order, so duplicate submissions of a key each get
    /// their own response.
    pub fn add_response(&self, credential: &str, response: Result<AccountResponse>) {
        self.responses
            .lock()
            .entry(credential.to_string())
            .or_default()
            .push(MockResponse::Immediate(response));
    }

    /// Add a response that will wait for a manual trigger before completing.
    ///
    /// Returns a sender that when triggered (by sending `()` or dropping)
    /// will cause the lookup to complete with the given response. Useful for
    /// testing batches that must not settle until told to.
    pub fn add_response_with_trigger(
        &self,
        credential: &str,
        response: Result<AccountResponse>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.responses
            .lock()
            .entry(credential.to_string())
            .or_default()
            .push(MockResponse::Triggered {
                response,
                trigger: Arc::new(Mutex::new(Some(rx))),
            });
        tx
    }

    /// Get all calls that have been made to this mock client.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    /// Get the number of calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Get the number of lookups currently in flight.
    ///
    /// This is useful for asserting that a whole batch is dispatched at
    /// once rather than serialized.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountClient for MockAccountClient {
    async fn fetch_account(
        &self,
        url: &str,
        credential: &str,
        timeout_ms: u64,
    ) -> Result<AccountResponse> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);

        // Guard to ensure we decrement even if cancelled/panicked
        let in_flight = self.in_flight.clone();
        let _guard = scopeguard::guard((), move |_| {
            in_flight.fetch_sub(1, Ordering::SeqCst);
        });

        // Record this call
        self.calls.lock().push(MockCall {
            url: url.to_string(),
            credential: credential.to_string(),
            timeout_ms,
        });

        // Look up the response
        let mock_response = {
            let mut responses = self.responses.lock();
            if let Some(response_queue) = responses.get_mut(credential) {
                if !response_queue.is_empty() {
                    Some(response_queue.remove(0))
                } else {
                    None
                }
            } else {
                None
            }
        };

        match mock_response {
            Some(MockResponse::Immediate(response)) => response,
            Some(MockResponse::Triggered { response, trigger }) => {
                let rx = {
                    let mut trigger_guard = trigger.lock();
                    trigger_guard.take()
                };

                if let Some(rx) = rx {
                    // Wait for trigger (ignore the result - we proceed either way)
                    let _ = rx.await;
                }

                response
            }
            None => Err(crate::error::KeysweepError::Other(anyhow::anyhow!(
                "no mock response configured for credential {}",
                credential
            ))),
        }
    }
}
