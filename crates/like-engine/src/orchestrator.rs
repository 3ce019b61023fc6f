//! Like orchestration.
//!
//! One run walks `AcquireToken -> SnapshotBefore -> Dispatch -> SnapshotAfter
//! -> Reconcile -> Done`; any failing step ends the run with an error. The
//! overall deadline is enforced by whoever drives the run.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::{debug, info, instrument, warn};

use crate::codec::{EncryptedPayload, LikeEnvelope};
use crate::config::EngineConfig;
use crate::credentials::{CredentialPool, Token};
use crate::dispatch::FanOutDispatcher;
use crate::error::{LikeError, Result, SnapshotPhase};
use crate::snapshot::PlayerSnapshot;
use crate::upstream::{Endpoints, UpstreamTransport, fetch_snapshot};

/// Steps of one orchestration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestrationState {
    AcquireToken,
    SnapshotBefore,
    Dispatch,
    SnapshotAfter,
    Reconcile,
    Done,
    Failed,
}

impl std::fmt::Display for OrchestrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OrchestrationState::AcquireToken => "acquire_token",
            OrchestrationState::SnapshotBefore => "snapshot_before",
            OrchestrationState::Dispatch => "dispatch",
            OrchestrationState::SnapshotAfter => "snapshot_after",
            OrchestrationState::Reconcile => "reconcile",
            OrchestrationState::Done => "done",
            OrchestrationState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Whether the counter moved during the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeStatus {
    Granted,
    NoChange,
}

impl LikeStatus {
    pub fn from_delta(likes_given: i64) -> Self {
        if likes_given != 0 {
            LikeStatus::Granted
        } else {
            LikeStatus::NoChange
        }
    }

    /// Numeric code used on the wire: 1 granted, 2 no change.
    pub fn code(self) -> u8 {
        match self {
            LikeStatus::Granted => 1,
            LikeStatus::NoChange => 2,
        }
    }
}

impl Serialize for LikeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Result of one completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikeOutcome {
    #[serde(rename = "UID")]
    pub uid: u64,
    #[serde(rename = "PlayerNickname")]
    pub nickname: String,
    #[serde(rename = "LikesbeforeCommand")]
    pub likes_before: u64,
    #[serde(rename = "LikesafterCommand")]
    pub likes_after: u64,
    /// Signed; a counter that went down is reported as a negative value.
    #[serde(rename = "LikesGivenByAPI")]
    pub likes_given: i64,
    pub status: LikeStatus,
}

impl LikeOutcome {
    pub fn reconcile(before: &PlayerSnapshot, after: PlayerSnapshot) -> Self {
        let likes_given = after.like_count as i64 - before.like_count as i64;
        Self {
            uid: after.uid,
            nickname: after.nickname,
            likes_before: before.like_count,
            likes_after: after.like_count,
            likes_given,
            status: LikeStatus::from_delta(likes_given),
        }
    }
}

/// Target of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeTarget {
    pub uid: u64,
    pub region: String,
}

impl LikeTarget {
    pub fn new(uid: u64, region: impl Into<String>) -> Self {
        Self {
            uid,
            region: region.into(),
        }
    }
}

pub struct LikeOrchestrator {
    pool: Arc<CredentialPool>,
    transport: Arc<dyn UpstreamTransport>,
    endpoints: Endpoints,
    dispatcher: FanOutDispatcher,
}

impl LikeOrchestrator {
    pub fn new(
        pool: Arc<CredentialPool>,
        transport: Arc<dyn UpstreamTransport>,
        config: &EngineConfig,
    ) -> Self {
        let dispatcher = FanOutDispatcher::new(
            Arc::clone(&pool),
            Arc::clone(&transport),
            config.batch_size,
            config.max_in_flight,
        );
        Self {
            pool,
            transport,
            endpoints: config.endpoints.clone(),
            dispatcher,
        }
    }

    pub fn pool(&self) -> &Arc<CredentialPool> {
        &self.pool
    }

    /// Execute one full run for `target`.
    #[instrument(skip(self, target), fields(uid = target.uid, region = %target.region))]
    pub async fn run(&self, target: LikeTarget) -> Result<LikeOutcome> {
        let result = self.run_inner(&target).await;
        if let Err(e) = &result {
            warn!(state = %OrchestrationState::Failed, error = %e, "Like run failed");
        }
        result
    }

    async fn run_inner(&self, target: &LikeTarget) -> Result<LikeOutcome> {
        enter(OrchestrationState::AcquireToken);
        let token = self.pool.first().ok_or(LikeError::NoTokensAvailable)?;
        let probe = LikeEnvelope::probe(target.uid).seal()?;
        let snapshot_url = self.endpoints.snapshot_url(&target.region);

        enter(OrchestrationState::SnapshotBefore);
        let before = self
            .snapshot(&probe, &token, &snapshot_url, SnapshotPhase::Before)
            .await?;
        info!(likes = before.like_count, "Likes before command");

        enter(OrchestrationState::Dispatch);
        let like_url = self.endpoints.like_url(&target.region);
        match self
            .dispatcher
            .dispatch(target.uid, &target.region, &like_url)
            .await
        {
            Ok(report) if report.failed() > 0 => {
                debug!(failed = report.failed(), "Some like calls failed");
            }
            Ok(_) => {}
            // The after snapshot still decides what was granted.
            Err(e) => warn!(error = %e, "Like batch could not be dispatched"),
        }

        enter(OrchestrationState::SnapshotAfter);
        let after = self
            .snapshot(&probe, &token, &snapshot_url, SnapshotPhase::After)
            .await?;

        enter(OrchestrationState::Reconcile);
        let outcome = LikeOutcome::reconcile(&before, after);
        info!(
            likes_after = outcome.likes_after,
            likes_given = outcome.likes_given,
            "Likes after command"
        );

        enter(OrchestrationState::Done);
        Ok(outcome)
    }

    async fn snapshot(
        &self,
        probe: &EncryptedPayload,
        token: &Token,
        url: &str,
        phase: SnapshotPhase,
    ) -> Result<PlayerSnapshot> {
        fetch_snapshot(self.transport.as_ref(), probe, token, url)
            .await
            .map_err(|e| LikeError::snapshot_failed(phase, e))
    }
}

fn enter(state: OrchestrationState) {
    debug!(%state, "Orchestration state");
}
