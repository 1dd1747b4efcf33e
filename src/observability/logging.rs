//! Structured logging.
//!
//! Uses the tracing crate; the level comes from `RUST_LOG` when set,
//! otherwise from the configured default.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `default_level` applies when `RUST_LOG` is absent, e.g. "info".
pub fn init(default_level: &str) {
    let fallback = format!("api_gateway={default_level},tower_http={default_level}");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
