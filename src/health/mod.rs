//! Health reporting over a breaker registry.
//!
//! # Data Flow
//! ```text
//! BreakerRegistry
//!     → snapshot each breaker (one atomic load each)
//!     → HealthReport (sorted by name, serializable)
//!     → CLI / host status endpoint
//! ```
//!
//! # Design Decisions
//! - Read-only: building a report never creates or transitions a breaker
//! - A breaker that is half-closed counts as healthy; only open ones fail the report

use serde::Serialize;

use crate::resilience::{BreakerRegistry, BreakerState, CircuitState};

/// Point-in-time view of one breaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakerHealth {
    pub name: String,
    pub state: CircuitState,
    pub consecutive_failures: u32,
    pub failure_threshold: u32,
    pub cool_down_ms: u64,
}

/// Point-in-time view of a whole registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub circuits: Vec<BreakerHealth>,
}

impl HealthReport {
    pub fn from_registry(registry: &BreakerRegistry) -> Self {
        let mut circuits: Vec<BreakerHealth> = registry
            .breakers()
            .iter()
            .map(|breaker| {
                let snapshot = breaker.snapshot();
                BreakerHealth {
                    name: breaker.name().to_string(),
                    state: snapshot.circuit_state(),
                    consecutive_failures: match snapshot {
                        BreakerState::Closed { consecutive_failures } => consecutive_failures,
                        _ => 0,
                    },
                    failure_threshold: breaker.config().failure_threshold(),
                    cool_down_ms: breaker.config().cool_down().as_millis() as u64,
                }
            })
            .collect();
        circuits.sort_by(|a, b| a.name.cmp(&b.name));

        let healthy = circuits.iter().all(|c| c.state != CircuitState::Open);
        Self { healthy, circuits }
    }

    /// True when no breaker is open.
    pub fn is_healthy(&self) -> bool {
        self.healthy
    }

    pub fn open_circuits(&self) -> Vec<&str> {
        self.circuits
            .iter()
            .filter(|c| c.state == CircuitState::Open)
            .map(|c| c.name.as_str())
            .collect()
    }
}
