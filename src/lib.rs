//! Failsafe: fault-tolerance decorators for synchronous calls.
//!
//! # Architecture Overview
//!
//! ```text
//!     caller
//!       │
//!       ▼
//!  ┌─────────────────────────────────────────────┐
//!  │ decorators (layer added last runs first)    │
//!  │   ┌─────────┐  ┌─────────┐  ┌───────────┐   │
//!  │   │ metrics │─▶│  retry  │─▶│  circuit  │───┼──▶ protected call
//!  │   │  timer  │  │  loop   │  │  breaker  │   │
//!  │   └─────────┘  └─────────┘  └─────┬─────┘   │
//!  └───────────────────────────────────┼─────────┘
//!                                      │ shared by name
//!                               ┌──────┴───────┐
//!                               │   registry   │──▶ health report
//!                               └──────────────┘
//!
//!  Cross-cutting: config (TOML + fluent builders), observability (tracing, metrics)
//! ```

pub mod config;
pub mod decorators;
pub mod health;
pub mod observability;
pub mod resilience;

pub use config::{load_config, ConfigError, FailsafeConfig, ValidationError};
pub use decorators::{DecorateFunction, DecorateRunnable, DecorateSupplier, Decorator, DecoratorKind, Decorators};
pub use health::HealthReport;
pub use observability::metrics::{HistogramTimer, Timer};
pub use resilience::{
    Backoff, BreakerConfig, BreakerRegistry, BreakerState, CallNotPermitted, CircuitBreaker, CircuitState,
    RetryPolicy,
};
