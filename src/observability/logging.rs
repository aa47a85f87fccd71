//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing for structured logging
//! - `RUST_LOG` wins over the configured level when set

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::schema::ObservabilityConfig;

/// Initialize the tracing subscriber.
///
/// The default filter is derived from the configured log level; the
/// `RUST_LOG` environment variable overrides it.
pub fn init_logging(config: &ObservabilityConfig) {
    let default_filter = format!("keymux={},tower_http=info", config.log_level);

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
