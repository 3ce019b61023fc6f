//! Calls to the game client API.

mod client;
mod routing;

use async_trait::async_trait;
use bytes::Bytes;

pub use client::UpstreamClient;
pub use routing::{Endpoints, LIKE_PATH, RegionRoute, SNAPSHOT_PATH};

use crate::codec::EncryptedPayload;
use crate::credentials::Token;
use crate::error::{LikeError, Result};
use crate::snapshot::{PlayerSnapshot, decode_snapshot};

/// Result of one upstream call. Failures are values, not errors, so a
/// batch can tally them without stopping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// HTTP 200 with its body.
    Success(Bytes),
    /// Any other HTTP status.
    Status(u16),
    /// Connection error, timeout, or a task that did not finish.
    Failed(String),
}

impl CallOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success(_))
    }
}

/// Sends one encrypted envelope with one bearer token.
#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    async fn send(&self, payload: &EncryptedPayload, token: &Token, url: &str) -> CallOutcome;
}

/// Issue a snapshot probe and decode the response.
pub async fn fetch_snapshot(
    transport: &dyn UpstreamTransport,
    payload: &EncryptedPayload,
    token: &Token,
    url: &str,
) -> Result<PlayerSnapshot> {
    match transport.send(payload, token, url).await {
        CallOutcome::Success(body) => decode_snapshot(&body),
        CallOutcome::Status(status) => Err(LikeError::UpstreamStatus(status)),
        CallOutcome::Failed(reason) => Err(LikeError::UpstreamTransport(reason)),
    }
}
