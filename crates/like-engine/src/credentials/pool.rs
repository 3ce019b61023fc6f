//! Credential pool.
//!
//! Holds the live token list. A background task replaces the whole list on a
//! fixed interval; readers take an immutable snapshot and never wait on a
//! refresh in progress.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::source::TokenSource;
use super::token::Token;

/// Immutable view of the token list at one point in time.
pub type TokenSnapshot = Arc<[Token]>;

pub struct CredentialPool {
    source: Arc<dyn TokenSource>,
    tokens: RwLock<TokenSnapshot>,
    ready: watch::Sender<bool>,
}

impl CredentialPool {
    /// Create an empty pool that has not loaded yet.
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            source,
            tokens: RwLock::new(Arc::from(Vec::new())),
            ready,
        }
    }

    /// Current token list. Later refreshes do not affect the returned value.
    pub fn snapshot(&self) -> TokenSnapshot {
        Arc::clone(&self.tokens.read())
    }

    /// First token of the current snapshot.
    pub fn first(&self) -> Option<Token> {
        self.tokens.read().first().cloned()
    }

    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether at least one refresh has succeeded.
    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Wait until the first successful load, up to `timeout`.
    pub async fn await_ready(&self, timeout: Duration) -> bool {
        let mut rx = self.ready.subscribe();
        let result = tokio::time::timeout(timeout, rx.wait_for(|ready| *ready)).await;
        matches!(result, Ok(Ok(_)))
    }

    /// Replace the token list wholesale and mark the pool ready.
    pub fn publish(&self, tokens: Vec<Token>) {
        let snapshot: TokenSnapshot = tokens.into();
        *self.tokens.write() = snapshot;
        self.ready.send_replace(true);
    }

    /// Fetch a fresh token list from the source.
    ///
    /// On failure, or when the source returns no tokens, the previous
    /// snapshot is kept. Returns whether the snapshot was replaced.
    pub async fn refresh(&self) -> bool {
        info!(source = %self.source.describe(), "Attempting to refresh tokens");

        match self.source.fetch().await {
            Ok(tokens) if !tokens.is_empty() => {
                let count = tokens.len();
                self.publish(tokens);
                info!(count, "Tokens refreshed successfully");
                true
            }
            Ok(_) => {
                warn!("Token source returned an empty list. Keeping existing tokens");
                self.report_if_empty();
                false
            }
            Err(e) => {
                warn!(error = %e, "Failed to refresh tokens. Keeping existing tokens");
                self.report_if_empty();
                false
            }
        }
    }

    fn report_if_empty(&self) {
        if self.is_empty() {
            error!("No tokens loaded after refresh attempt");
        }
    }

    /// Refresh now, then every `interval` until `cancel` fires.
    pub fn spawn_refresh_task(
        self: &Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let pool = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(?interval, "Token refresh scheduler started");

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("Token refresh scheduler stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        pool.refresh().await;
                    }
                }
            }
        })
    }
}
