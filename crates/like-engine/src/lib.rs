//! Like dispatch engine.
//!
//! Keeps a refreshed pool of bearer tokens, builds encrypted request
//! envelopes, fans like calls out to the regional game client endpoints and
//! reconciles before/after player snapshots into a [`LikeOutcome`].

pub mod codec;
pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod orchestrator;
pub mod snapshot;
pub mod upstream;

pub use config::EngineConfig;
pub use credentials::{CredentialPool, HttpTokenSource, Token, TokenSource};
pub use dispatch::{BatchReport, FanOutDispatcher};
pub use error::{LikeError, Result, SnapshotPhase};
pub use orchestrator::{LikeOrchestrator, LikeOutcome, LikeStatus, LikeTarget, OrchestrationState};
pub use snapshot::PlayerSnapshot;
pub use upstream::{CallOutcome, Endpoints, UpstreamClient, UpstreamTransport};
