//! Like route.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use like_engine::{LikeError, LikeOutcome, LikeTarget};
use serde::Deserialize;
use tracing::warn;

use crate::api::error::{ApiError, ApiResult};
use crate::api::server::AppState;

/// Create the like router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(give_like))
}

#[derive(Debug, Deserialize)]
pub struct LikeQuery {
    pub uid: Option<String>,
    pub server_name: Option<String>,
}

impl LikeQuery {
    fn into_target(self) -> Result<LikeTarget, ApiError> {
        let uid = self.uid.map(|u| u.trim().to_string()).unwrap_or_default();
        let region = self
            .server_name
            .map(|s| s.trim().to_uppercase())
            .unwrap_or_default();

        if uid.is_empty() || region.is_empty() {
            return Err(ApiError::bad_request("UID and server_name are required"));
        }

        let uid = uid
            .parse::<u64>()
            .map_err(|_| LikeError::invalid_input(format!("uid must be an integer, got '{uid}'")))?;

        Ok(LikeTarget::new(uid, region))
    }
}

/// Like a player's profile and report the change in its like counter.
async fn give_like(
    State(state): State<AppState>,
    Query(query): Query<LikeQuery>,
) -> ApiResult<Json<LikeOutcome>> {
    let target = query.into_target()?;
    let pool = state.orchestrator.pool();

    if !pool.is_ready() {
        warn!("Tokens are not yet loaded. Waiting for initial load");
        if !pool.await_ready(state.ready_wait).await {
            return Err(LikeError::CredentialsNotLoaded.into());
        }
    }

    if pool.is_empty() {
        return Err(LikeError::NoTokensAvailable.into());
    }

    let outcome = state
        .workers
        .submit(Arc::clone(&state.orchestrator), target)
        .await?;
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use bytes::Bytes;
    use like_engine::codec::EncryptedPayload;
    use like_engine::{
        CallOutcome, CredentialPool, EngineConfig, LikeOrchestrator, Token, TokenSource,
        UpstreamTransport,
    };
    use tower::ServiceExt;

    use crate::worker::LikeWorkerPool;

    struct NoSource;

    #[async_trait]
    impl TokenSource for NoSource {
        async fn fetch(&self) -> like_engine::Result<Vec<Token>> {
            Err(LikeError::TokenSource("offline".to_string()))
        }

        fn describe(&self) -> String {
            "none".to_string()
        }
    }

    /// Likes counter that grows by one per accepted like call batch.
    struct CountingUpstream {
        likes: AtomicU64,
        delay: Duration,
    }

    #[async_trait]
    impl UpstreamTransport for CountingUpstream {
        async fn send(&self, _: &EncryptedPayload, _: &Token, url: &str) -> CallOutcome {
            tokio::time::sleep(self.delay).await;
            if url.ends_with("/GetPlayerPersonalShow") {
                let likes = self.likes.load(Ordering::SeqCst) as u8;
                // account_info { uid: 7, nickname: "Ana", likes }
                CallOutcome::Success(Bytes::from(vec![
                    0x0a, 0x0a, 0x08, 0x07, 0x1a, 0x03, b'A', b'n', b'a', 0xa8, 0x01, likes,
                ]))
            } else {
                // only the first like of a batch counts, the rest hit the daily limit
                if self
                    .likes
                    .compare_exchange(120, 121, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok()
                {
                    CallOutcome::Success(Bytes::new())
                } else {
                    CallOutcome::Status(400)
                }
            }
        }
    }

    fn app(tokens: Option<&[&str]>, delay: Duration, deadline: Duration) -> Router {
        let pool = Arc::new(CredentialPool::new(Arc::new(NoSource)));
        if let Some(tokens) = tokens {
            pool.publish(tokens.iter().map(|t| Token::from(*t)).collect());
        }
        let orchestrator = Arc::new(LikeOrchestrator::new(
            pool,
            Arc::new(CountingUpstream {
                likes: AtomicU64::new(120),
                delay,
            }),
            &EngineConfig::default(),
        ));
        let state = AppState::new(
            orchestrator,
            Arc::new(LikeWorkerPool::new(5, deadline)),
            Duration::from_millis(50),
        );
        Router::new().nest("/like", router()).with_state(state)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn reports_granted_like() {
        let app = app(Some(&["t1", "t2", "t3"]), Duration::ZERO, Duration::from_secs(5));
        let (status, body) = get(app, "/like?uid=7&server_name=sg").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({
                "LikesGivenByAPI": 1,
                "LikesbeforeCommand": 120,
                "LikesafterCommand": 121,
                "PlayerNickname": "Ana",
                "UID": 7,
                "status": 1
            })
        );
    }

    #[tokio::test]
    async fn missing_parameters_are_rejected() {
        for uri in ["/like?uid=7", "/like?server_name=IND", "/like", "/like?uid=&server_name=IND"] {
            let app = app(Some(&["t"]), Duration::ZERO, Duration::from_secs(5));
            let (status, body) = get(app, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["code"], "BAD_REQUEST");
        }
    }

    #[tokio::test]
    async fn non_numeric_uid_is_rejected() {
        let app = app(Some(&["t"]), Duration::ZERO, Duration::from_secs(5));
        let (status, _) = get(app, "/like?uid=abc&server_name=IND").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unloaded_pool_returns_503() {
        let app = app(None, Duration::ZERO, Duration::from_secs(5));
        let (status, body) = get(app, "/like?uid=7&server_name=IND").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn loaded_but_empty_pool_returns_500() {
        let app = app(Some(&[]), Duration::ZERO, Duration::from_secs(5));
        let (status, body) = get(app, "/like?uid=7&server_name=IND").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["message"].as_str().unwrap().contains("No tokens"));
    }

    #[tokio::test]
    async fn slow_run_returns_504() {
        let app = app(Some(&["t"]), Duration::from_millis(200), Duration::from_millis(50));
        let (status, body) = get(app, "/like?uid=7&server_name=IND").await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["code"], "TIMEOUT");
    }
}
