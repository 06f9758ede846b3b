//! Circuit breaker for backend protection.
//!
//! # States
//! - Closed: normal operation, requests pass through
//! - Open: backend assumed down, requests fail fast
//! - Half-Closed: cool-down elapsed, trial requests test if backend recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive counted failures == failure_threshold
//! Open → Half-Closed: first permission check after cool_down
//! Half-Closed → Closed: trial request succeeds
//! Half-Closed → Open: trial request fails (cool-down restarts)
//! ```
//!
//! # Design Decisions
//! - Per-backend circuit breaker, shared through the registry by name
//! - Fail fast in Open state (no waiting for cool-down)
//! - Ignored failures are recorded as successes
//! - Concurrent callers may all be admitted as trials in Half-Closed

mod breaker;
mod config;
mod decorate;
mod registry;
mod state;

pub use breaker::{CallNotPermitted, CircuitBreaker};
pub use config::{BreakerConfig, BreakerConfigBuilder, DEFAULT_COOL_DOWN, DEFAULT_FAILURE_THRESHOLD, MIN_COOL_DOWN};
pub use decorate::{decorate_function, decorate_runnable, decorate_supplier};
pub use registry::BreakerRegistry;
pub use state::{BreakerState, CircuitState, Event};
