//! Service configuration.

use std::time::Duration;

use like_engine::EngineConfig;

/// How long a request waits for the first token load.
pub const DEFAULT_READY_WAIT: Duration = Duration::from_secs(30);

/// Overall budget for one like run.
pub const DEFAULT_RUN_DEADLINE: Duration = Duration::from_secs(60);

/// Like runs allowed to execute at once.
pub const DEFAULT_WORKERS: usize = 5;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Server bind address
    pub bind_address: String,
    /// Server port
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Wait for the first token load before rejecting a request
    pub ready_wait: Duration,
    /// Deadline for one like run, including time spent queued
    pub run_deadline: Duration,
    /// Concurrent like runs
    pub workers: usize,
    pub engine: EngineConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
            enable_cors: true,
            ready_wait: DEFAULT_READY_WAIT,
            run_deadline: DEFAULT_RUN_DEADLINE,
            workers: DEFAULT_WORKERS,
            engine: EngineConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load config from environment variables, falling back to defaults.
    ///
    /// Supported env vars:
    /// - `API_BIND_ADDRESS` (e.g. "0.0.0.0")
    /// - `PORT` or `API_PORT` (e.g. "8080")
    /// - `TOKEN_URL`
    /// - `LIKE_WORKERS`
    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(bind_address) = lookup("API_BIND_ADDRESS")
            && !bind_address.trim().is_empty()
        {
            config.bind_address = bind_address;
        }

        if let Some(port) = lookup("PORT").or_else(|| lookup("API_PORT"))
            && let Ok(parsed) = port.trim().parse::<u16>()
        {
            config.port = parsed;
        }

        if let Some(url) = lookup("TOKEN_URL")
            && !url.trim().is_empty()
        {
            config.engine.token_url = url.trim().to_string();
        }

        if let Some(workers) = lookup("LIKE_WORKERS")
            && let Ok(parsed) = workers.trim().parse::<usize>()
            && parsed > 0
        {
            config.workers = parsed;
        }

        config
    }
}
