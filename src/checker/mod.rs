//! Batch verification runner with stale-run protection.
//!
//! The runner fans out one account lookup per credential, waits for every
//! call to settle, and publishes the finished batch only if no newer run
//! started in the meantime.

use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;

use crate::domain::batch::{BatchId, BatchResult};
use crate::domain::outcome::VerificationOutcome;
use crate::error::{KeysweepError, Result};
use crate::http::AccountClient;

mod verify;

/// Configuration for the batch runner.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CheckerConfig {
    /// Account-info endpoint queried once per credential
    pub account_info_url: String,

    /// Timeout for each individual verification request in milliseconds
    pub request_timeout_ms: u64,

    /// How long the "copied" acknowledgment stays raised after a successful
    /// export, in milliseconds
    pub ack_window_ms: u64,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            account_info_url: "https://api.siliconflow.cn/v1/user/info".to_string(),
            request_timeout_ms: 15_000,
            ack_window_ms: 2_000,
        }
    }
}

/// Mutable runner state guarded by the generation counter.
///
/// A single writer slot: each run bumps `generation` at dispatch, and only
/// the run whose generation still matches at settle time may publish into
/// `result`.
#[derive(Debug, Default)]
struct RunnerState {
    /// Generation of the most recently started run
    generation: u64,
    /// Result of the most recent run to finish un-superseded
    result: Option<BatchResult>,
    /// Number of dispatched runs that have not yet settled
    in_flight: usize,
}

/// Runs verification batches against the account endpoint.
///
/// All lookups for a batch are dispatched at once; the join point is a
/// settle-all barrier, so one credential's failure never aborts or delays
/// its siblings. There is no partial-result visibility: readers see either
/// no result or the complete batch.
pub struct BatchRunner<C: AccountClient> {
    client: Arc<C>,
    config: CheckerConfig,
    state: Mutex<RunnerState>,
}

impl<C: AccountClient + 'static> BatchRunner<C> {
    /// Create a new runner over the given account client.
    pub fn new(client: Arc<C>, config: CheckerConfig) -> Self {
        Self {
            client,
            config,
            state: Mutex::new(RunnerState::default()),
        }
    }

    /// Verify every credential in the batch and publish the result.
    ///
    /// The previously published result is cleared before dispatch, so
    /// readers see "no result" for the whole time the batch is in flight.
    /// Returns `Ok(None)` when a newer run started while this one was in
    /// flight: the stale result is discarded unpublished. In-flight lookups
    /// of a superseded run are not aborted; they settle on their own and
    /// are ignored at the publish point.
    ///
    /// # Errors
    /// `KeysweepError::EmptyBatch` if `credentials` is empty; nothing is
    /// dispatched.
    #[tracing::instrument(skip(self, credentials), fields(count = credentials.len()))]
    pub async fn run_batch(&self, credentials: Vec<String>) -> Result<Option<BatchResult>> {
        if credentials.is_empty() {
            return Err(KeysweepError::EmptyBatch);
        }

        let batch_id = BatchId::from(uuid::Uuid::new_v4());
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.result = None;
            state.in_flight += 1;
            state.generation
        };

        // Settles even if the caller drops us mid-flight
        let _in_flight_guard = scopeguard::guard((), |_| {
            self.state.lock().in_flight -= 1;
        });

        let started_at = chrono::Utc::now();
        tracing::info!(
            batch_id = %batch_id,
            generation = generation,
            count = credentials.len(),
            "Dispatching verification batch"
        );

        let lookups = credentials.into_iter().map(|credential| {
            let client = self.client.clone();
            let url = self.config.account_info_url.clone();
            let timeout_ms = self.config.request_timeout_ms;
            async move {
                let fetched = client.fetch_account(&url, &credential, timeout_ms).await;
                verify::classify_response(credential, fetched)
            }
        });

        // join_all preserves input order, so outcome i belongs to
        // credential i no matter which lookup settled first.
        let outcomes: Vec<VerificationOutcome> = join_all(lookups).await;
        let completed_at = chrono::Utc::now();

        let result = BatchResult {
            id: batch_id,
            generation,
            outcomes,
            started_at,
            completed_at,
        };

        let mut state = self.state.lock();
        if state.generation != generation {
            tracing::debug!(
                batch_id = %batch_id,
                generation = generation,
                current_generation = state.generation,
                "Discarding superseded batch result"
            );
            return Ok(None);
        }

        state.result = Some(result.clone());
        tracing::info!(
            batch_id = %batch_id,
            generation = generation,
            count = result.len(),
            "Published batch result"
        );
        Ok(Some(result))
    }

    /// Result of the most recent run to complete un-superseded, if any.
    pub fn current_result(&self) -> Option<BatchResult> {
        self.state.lock().result.clone()
    }

    /// True while at least one dispatched batch has not yet settled.
    pub fn is_in_flight(&self) -> bool {
        self.state.lock().in_flight > 0
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }
}
