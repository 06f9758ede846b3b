//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for binaries embedding the library
//! - Configure log level from environment, falling back to config
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging; the library only emits events
//! - `RUST_LOG` wins over the configured level
//! - Installing twice is reported, not a panic

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install a global fmt subscriber filtered by `RUST_LOG` or `config.log_level`.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("failsafe={}", config.log_level.to_ascii_lowercase())));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
