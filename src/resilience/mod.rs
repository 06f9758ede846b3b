//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to a dependency:
//!     → circuit_breaker (permission check, reject fast while open)
//!     → the call itself
//!     → circuit_breaker (record outcome, maybe transition)
//!     → On failure: retries.rs (skip ignored types, wait per backoff.rs, retry)
//! ```
//!
//! # Design Decisions
//! - Breaker state is one immutable value swapped atomically
//! - Retry attempt counters live on the stack of each call
//! - Ignored failures are classified by type through classify.rs
//! - All resilience logic is composable through `crate::decorators`

pub mod backoff;
pub mod circuit_breaker;
pub mod classify;
pub mod retries;

pub use backoff::Backoff;
pub use circuit_breaker::{
    BreakerConfig, BreakerConfigBuilder, BreakerRegistry, BreakerState, CallNotPermitted, CircuitBreaker,
    CircuitState,
};
pub use classify::IgnoredFailures;
pub use retries::{RetryPolicy, RetryPolicyBuilder};
