//! Engine configuration.

use std::time::Duration;

use crate::upstream::Endpoints;

/// Default token list location.
pub const DEFAULT_TOKEN_URL: &str = "https://zproject-api-sever-tele.x10.mx/token_sg.json";

/// Default token refresh interval (120 seconds).
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(120);

/// Default timeout for fetching the token list.
pub const DEFAULT_TOKEN_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default total timeout for a single upstream call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(15);

/// Number of like calls issued per dispatch.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Maximum like calls in flight at once within one dispatch.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 50;

/// Configuration for the like engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// URL of the JSON token list
    pub token_url: String,
    /// Interval between token refreshes
    pub refresh_interval: Duration,
    /// Timeout for a token list fetch
    pub token_fetch_timeout: Duration,
    /// Total timeout for one upstream call
    pub call_timeout: Duration,
    /// Calls per fan-out batch
    pub batch_size: usize,
    /// Concurrency ceiling inside one batch
    pub max_in_flight: usize,
    /// Region endpoint table
    pub endpoints: Endpoints,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            token_fetch_timeout: DEFAULT_TOKEN_FETCH_TIMEOUT,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            batch_size: DEFAULT_BATCH_SIZE,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            endpoints: Endpoints::default(),
        }
    }
}
