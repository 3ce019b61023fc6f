//! API server setup and configuration.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::Request;
use like_engine::LikeOrchestrator;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::api::routes;
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::worker::LikeWorkerPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server start time for uptime calculation
    pub start_time: Instant,
    /// Like engine, including the credential pool
    pub orchestrator: Arc<LikeOrchestrator>,
    /// Bounded pool that runs likes under the deadline
    pub workers: Arc<LikeWorkerPool>,
    /// How long a request waits for the first token load
    pub ready_wait: Duration,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<LikeOrchestrator>,
        workers: Arc<LikeWorkerPool>,
        ready_wait: Duration,
    ) -> Self {
        Self {
            start_time: Instant::now(),
            orchestrator,
            workers,
            ready_wait,
        }
    }
}

/// API server.
pub struct ApiServer {
    config: ServiceConfig,
    state: AppState,
    cancel_token: CancellationToken,
}

impl ApiServer {
    /// Create with custom state.
    pub fn with_state(config: ServiceConfig, state: AppState) -> Self {
        Self {
            config,
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Get the cancellation token for graceful shutdown.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Build the router with all middleware and routes.
    pub fn build_router(&self) -> Router {
        let mut router = routes::create_router(self.state.clone());

        // Add CORS if enabled
        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router = router.layer(cors);
        }

        // Add tracing
        router.layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request| {
                    if req.uri().path().starts_with("/health") {
                        Span::none()
                    } else {
                        let mut make_span =
                            tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO);
                        use tower_http::trace::MakeSpan;
                        make_span.make_span(req)
                    }
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        if span.is_disabled() {
                            return;
                        }
                        let on_response =
                            tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO);
                        use tower_http::trace::OnResponse;
                        on_response.on_response(res, latency, span);
                    },
                ),
        )
    }

    /// Start the server.
    pub async fn run(&self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.bind_address, self.config.port)
            .parse()
            .map_err(|e| Error::InvalidAddress(format!("{e}")))?;

        let router = self.build_router();
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("API server listening on http://{}", addr);

        let cancel_token = self.cancel_token.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                tracing::info!("API server shutting down...");
            })
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        Ok(())
    }

    /// Shutdown the server.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
