//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! circuit_breaker / retries / decorators produce:
//!     → tracing events (transitions, rejections, retry waits)
//!     → metrics.rs (gauges, counters, call timers)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout) or the host's own subscriber
//!     → whatever `metrics` recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (`circuit`, `attempt`, `delay`) on every event
//! - Metrics are cheap (atomic increments), no-ops without a recorder

pub mod logging;
pub mod metrics;
