//! Fan-out dispatcher.
//!
//! Sends one fixed-size batch of like calls for a single target. Every call
//! runs in its own task on a `JoinSet` owned by the dispatch; a semaphore
//! local to the dispatch caps how many are in flight. Individual failures are
//! recorded and never stop the batch.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::codec::LikeEnvelope;
use crate::credentials::{CredentialPool, Token};
use crate::error::{LikeError, Result};
use crate::upstream::{CallOutcome, UpstreamTransport};

/// Outcomes of one batch, indexed by call number.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub outcomes: Vec<CallOutcome>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }
}

/// Token used by call `index` of a batch.
pub fn token_for_call(tokens: &[Token], index: usize) -> Option<&Token> {
    if tokens.is_empty() {
        None
    } else {
        tokens.get(index % tokens.len())
    }
}

pub struct FanOutDispatcher {
    pool: Arc<CredentialPool>,
    transport: Arc<dyn UpstreamTransport>,
    batch_size: usize,
    max_in_flight: usize,
}

impl FanOutDispatcher {
    pub fn new(
        pool: Arc<CredentialPool>,
        transport: Arc<dyn UpstreamTransport>,
        batch_size: usize,
        max_in_flight: usize,
    ) -> Self {
        Self {
            pool,
            transport,
            batch_size,
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// Send the like batch for `target_id` to `url`.
    ///
    /// Fails only when the envelope cannot be built or no tokens are
    /// available; call failures are reported in the returned batch.
    pub async fn dispatch(&self, target_id: u64, region: &str, url: &str) -> Result<BatchReport> {
        let payload = Arc::new(LikeEnvelope::like(target_id, region).seal()?);

        let tokens = self.pool.snapshot();
        if tokens.is_empty() {
            return Err(LikeError::NoTokensAvailable);
        }

        debug!(
            target_id,
            %url,
            batch = self.batch_size,
            tokens = tokens.len(),
            "Dispatching like batch"
        );

        let url: Arc<str> = Arc::from(url);
        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let mut join_set = JoinSet::new();
        let mut task_index = HashMap::with_capacity(self.batch_size);

        for index in 0..self.batch_size {
            let Some(token) = token_for_call(&tokens, index).cloned() else {
                return Err(LikeError::NoTokensAvailable);
            };
            let semaphore = Arc::clone(&semaphore);
            let transport = Arc::clone(&self.transport);
            let payload = Arc::clone(&payload);
            let url = Arc::clone(&url);

            let handle = join_set.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return CallOutcome::Failed(e.to_string()),
                };
                transport.send(&payload, &token, &url).await
            });
            task_index.insert(handle.id(), index);
        }

        let mut outcomes: Vec<Option<CallOutcome>> = vec![None; self.batch_size];
        while let Some(joined) = join_set.join_next_with_id().await {
            let (id, outcome) = match joined {
                Ok((id, outcome)) => (id, outcome),
                Err(e) => (e.id(), CallOutcome::Failed(format!("call task failed: {e}"))),
            };
            if let Some(&index) = task_index.get(&id) {
                outcomes[index] = Some(outcome);
            }
        }

        let report = BatchReport {
            outcomes: outcomes
                .into_iter()
                .map(|o| o.unwrap_or_else(|| CallOutcome::Failed("call did not complete".into())))
                .collect(),
        };

        info!(
            target_id,
            total = report.total(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Like batch finished"
        );
        Ok(report)
    }
}
