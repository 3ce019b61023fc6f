//! Logging initialisation.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default log filter directive.
pub const DEFAULT_LOG_FILTER: &str = "like_server=info,like_engine=info,tower_http=info";

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
