//! Engine-wide error types.

use std::time::Duration;

use thiserror::Error;

/// Engine-wide result type.
pub type Result<T> = std::result::Result<T, LikeError>;

/// Which of the two read-only probes failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotPhase {
    Before,
    After,
}

impl std::fmt::Display for SnapshotPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotPhase::Before => write!(f, "before"),
            SnapshotPhase::After => write!(f, "after"),
        }
    }
}

#[derive(Error, Debug)]
pub enum LikeError {
    #[error("credential pool has not completed its first load")]
    CredentialsNotLoaded,

    #[error("no tokens available")]
    NoTokensAvailable,

    #[error("envelope encoding failed: {0}")]
    Encoding(String),

    #[error("upstream transport error: {0}")]
    UpstreamTransport(String),

    #[error("upstream returned status {0}")]
    UpstreamStatus(u16),

    #[error("failed to decode upstream response: {0}")]
    Decode(String),

    #[error("failed to retrieve player info ({phase} likes): {reason}")]
    SnapshotFailed { phase: SnapshotPhase, reason: String },

    #[error("request processing timed out after {0:?}")]
    OrchestrationTimeout(Duration),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("token source error: {0}")]
    TokenSource(String),

    #[error("worker error: {0}")]
    Worker(String),
}

impl LikeError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn snapshot_failed(phase: SnapshotPhase, reason: impl std::fmt::Display) -> Self {
        Self::SnapshotFailed {
            phase,
            reason: reason.to_string(),
        }
    }

    /// Whether this error means the credential pool cannot serve requests.
    pub fn is_credential_unavailable(&self) -> bool {
        matches!(self, Self::CredentialsNotLoaded | Self::NoTokensAvailable)
    }
}

impl From<reqwest::Error> for LikeError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::UpstreamStatus(status.as_u16())
        } else {
            Self::UpstreamTransport(err.to_string())
        }
    }
}

impl From<prost::DecodeError> for LikeError {
    fn from(err: prost::DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}
