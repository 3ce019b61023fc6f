use std::sync::Arc;

use like_engine::{CredentialPool, HttpTokenSource, LikeOrchestrator, UpstreamClient};
use like_server::api::{ApiServer, AppState};
use like_server::worker::LikeWorkerPool;
use like_server::{ServiceConfig, logging};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    logging::init_logging();

    let config = ServiceConfig::from_env_or_default();
    let http = reqwest::Client::builder().gzip(true).build()?;

    // Token pool, refreshed in the background for the life of the process
    let source = Arc::new(HttpTokenSource::new(
        http.clone(),
        config.engine.token_url.clone(),
        config.engine.token_fetch_timeout,
    ));
    let pool = Arc::new(CredentialPool::new(source));
    let refresh_cancel = CancellationToken::new();
    let refresh_task =
        pool.spawn_refresh_task(config.engine.refresh_interval, refresh_cancel.clone());

    let transport = Arc::new(UpstreamClient::new(http, config.engine.call_timeout));
    let orchestrator = Arc::new(LikeOrchestrator::new(pool, transport, &config.engine));
    let workers = Arc::new(LikeWorkerPool::new(config.workers, config.run_deadline));
    let state = AppState::new(orchestrator, workers, config.ready_wait);

    let server = ApiServer::with_state(config, state);
    let shutdown = server.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    server.run().await?;

    refresh_cancel.cancel();
    let _ = refresh_task.await;
    Ok(())
}
