//! Breaker state values and their transition rules.
//!
//! # State Transitions
//! ```text
//! Closed(n) --failure--> Closed(n+1) | Open(now) when n+1 == threshold
//! Closed(n) --success--> Closed(0)
//! Open(t)   --permission check, cool-down elapsed--> HalfClosed
//! HalfClosed --success--> Closed(0)
//! HalfClosed --failure--> Open(now)
//! ```
//!
//! Transitions are pure: a state never mutates itself and never refers back
//! to the breaker that holds it.

use serde::Serialize;
use std::fmt;
use std::time::Instant;

use super::config::BreakerConfig;

/// The externally visible breaker status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Normal operation, calls pass through.
    Closed,
    /// Tripped, calls fail fast until the cool-down elapses.
    Open,
    /// Cool-down elapsed, trial calls are admitted.
    HalfClosed,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "closed"),
            CircuitState::Open => write!(f, "open"),
            CircuitState::HalfClosed => write!(f, "half-closed"),
        }
    }
}

/// Full state value held by a breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed { consecutive_failures: u32 },
    Open { entered_at: Instant },
    HalfClosed,
}

/// Inputs to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A caller asks whether it may invoke the protected operation.
    PermissionRequested { at: Instant },
    /// The protected operation succeeded, or failed with an ignored failure.
    Succeeded,
    /// The protected operation failed with a counted failure.
    Failed { at: Instant },
}

impl BreakerState {
    pub const INITIAL: BreakerState = BreakerState::Closed {
        consecutive_failures: 0,
    };

    pub fn circuit_state(&self) -> CircuitState {
        match self {
            BreakerState::Closed { .. } => CircuitState::Closed,
            BreakerState::Open { .. } => CircuitState::Open,
            BreakerState::HalfClosed => CircuitState::HalfClosed,
        }
    }

    /// Whether a breaker sitting in this state lets calls through.
    pub fn permits_calls(&self) -> bool {
        !matches!(self, BreakerState::Open { .. })
    }

    /// Compute the state that follows `event`.
    pub fn next(self, event: Event, config: &BreakerConfig) -> BreakerState {
        match (self, event) {
            (BreakerState::Open { entered_at }, Event::PermissionRequested { at }) => {
                if at.saturating_duration_since(entered_at) >= config.cool_down() {
                    BreakerState::HalfClosed
                } else {
                    self
                }
            }
            (_, Event::PermissionRequested { .. }) => self,

            // An open breaker ignores outcomes; it only leaves Open via a permission check.
            (BreakerState::Open { .. }, _) => self,

            (_, Event::Succeeded) => BreakerState::INITIAL,

            (BreakerState::Closed { consecutive_failures }, Event::Failed { at }) => {
                let failures = consecutive_failures.saturating_add(1);
                if failures >= config.failure_threshold() {
                    BreakerState::Open { entered_at: at }
                } else {
                    BreakerState::Closed {
                        consecutive_failures: failures,
                    }
                }
            }
            (BreakerState::HalfClosed, Event::Failed { at }) => BreakerState::Open { entered_at: at },
        }
    }
}
