//! Bounded pool for like runs.
//!
//! Each run is spawned onto the runtime and waits for one of `max_workers`
//! permits. The caller waits on the task against the run deadline; queueing
//! time counts toward it. When the deadline passes the caller gets
//! `OrchestrationTimeout` and the task keeps going in the background, since
//! like calls already sent cannot be taken back anyway.

use std::sync::Arc;
use std::time::Duration;

use like_engine::{LikeError, LikeOrchestrator, LikeOutcome, LikeTarget, Result};
use tokio::sync::Semaphore;
use tracing::{error, warn};

pub struct LikeWorkerPool {
    semaphore: Arc<Semaphore>,
    deadline: Duration,
}

impl LikeWorkerPool {
    pub fn new(max_workers: usize, deadline: Duration) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_workers.max(1))),
            deadline,
        }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Permits not currently held by a run.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Run `target` through `orchestrator` within the deadline.
    pub async fn submit(
        &self,
        orchestrator: Arc<LikeOrchestrator>,
        target: LikeTarget,
    ) -> Result<LikeOutcome> {
        let deadline = tokio::time::Instant::now() + self.deadline;
        let semaphore = Arc::clone(&self.semaphore);
        let uid = target.uid;

        let handle = tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|e| LikeError::Worker(e.to_string()))?;
            orchestrator.run(target).await
        });

        match tokio::time::timeout_at(deadline, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                error!(uid, error = %e, "Like run task failed");
                Err(LikeError::Worker(e.to_string()))
            }
            Err(_) => {
                warn!(uid, deadline = ?self.deadline, "Request processing timed out");
                Err(LikeError::OrchestrationTimeout(self.deadline))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use bytes::Bytes;
    use like_engine::codec::EncryptedPayload;
    use like_engine::{
        CallOutcome, CredentialPool, EngineConfig, Token, TokenSource, UpstreamTransport,
    };

    struct NoSource;

    #[async_trait]
    impl TokenSource for NoSource {
        async fn fetch(&self) -> Result<Vec<Token>> {
            Err(LikeError::TokenSource("offline".to_string()))
        }

        fn describe(&self) -> String {
            "none".to_string()
        }
    }

    /// Answers every call after `delay`; snapshot calls report one more
    /// like each time.
    struct SlowUpstream {
        delay: Duration,
        probes: AtomicUsize,
    }

    #[async_trait]
    impl UpstreamTransport for SlowUpstream {
        async fn send(&self, _: &EncryptedPayload, _: &Token, url: &str) -> CallOutcome {
            tokio::time::sleep(self.delay).await;
            if url.ends_with("/GetPlayerPersonalShow") {
                let n = self.probes.fetch_add(1, Ordering::SeqCst) as u8;
                // account_info { uid: 1, likes: n }
                CallOutcome::Success(Bytes::from(vec![0x0a, 0x05, 0x08, 0x01, 0xa8, 0x01, n]))
            } else {
                CallOutcome::Success(Bytes::new())
            }
        }
    }

    fn orchestrator(delay: Duration) -> Arc<LikeOrchestrator> {
        let pool = Arc::new(CredentialPool::new(Arc::new(NoSource)));
        pool.publish(vec![Token::from("t")]);
        let config = EngineConfig {
            batch_size: 4,
            ..EngineConfig::default()
        };
        Arc::new(LikeOrchestrator::new(
            pool,
            Arc::new(SlowUpstream {
                delay,
                probes: AtomicUsize::new(0),
            }),
            &config,
        ))
    }

    #[tokio::test]
    async fn completes_within_deadline() {
        let workers = LikeWorkerPool::new(5, Duration::from_secs(5));
        let outcome = workers
            .submit(orchestrator(Duration::ZERO), LikeTarget::new(1, "SG"))
            .await
            .unwrap();
        assert_eq!(outcome.likes_given, 1);
        assert_eq!(workers.available(), 5);
    }

    #[tokio::test]
    async fn deadline_maps_to_timeout() {
        let workers = LikeWorkerPool::new(5, Duration::from_millis(50));
        let result = workers
            .submit(orchestrator(Duration::from_millis(200)), LikeTarget::new(1, "SG"))
            .await;
        assert!(matches!(result, Err(LikeError::OrchestrationTimeout(_))));
    }

    #[tokio::test]
    async fn queued_time_counts_toward_deadline() {
        let workers = Arc::new(LikeWorkerPool::new(1, Duration::from_millis(150)));

        let busy = Arc::clone(&workers);
        let first = tokio::spawn(async move {
            busy.submit(orchestrator(Duration::from_millis(100)), LikeTarget::new(1, "SG"))
                .await
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(workers.available(), 0);

        // needs the only permit, which stays held past this deadline
        let second = workers
            .submit(orchestrator(Duration::ZERO), LikeTarget::new(2, "SG"))
            .await;
        assert!(matches!(second, Err(LikeError::OrchestrationTimeout(_))));

        let _ = first.await.unwrap();
    }
}
