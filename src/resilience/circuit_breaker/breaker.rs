//! Circuit breaker for backend protection.
//!
//! # Responsibilities
//! - Hold one atomically swapped [`BreakerState`] per named backend
//! - Answer permission checks, record outcomes
//! - Classify failures against the configured ignore list
//!
//! # Design Decisions
//! - Lock-free: every change is a whole-value compare-and-swap
//! - No timers or threads; state only moves when a caller reports in
//! - Fail fast in Open state (no waiting for cool-down)

use arc_swap::ArcSwap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use super::config::BreakerConfig;
use super::state::{BreakerState, CircuitState, Event};
use crate::observability::metrics;

/// Signals that an open breaker refused a call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("circuit breaker '{name}' is open and does not permit calls")]
pub struct CallNotPermitted {
    pub name: String,
}

/// A named circuit breaker.
///
/// Shared by every caller talking to the same logical backend, usually
/// through [`BreakerRegistry`](super::BreakerRegistry).
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: Arc<BreakerConfig>,
    state: ArcSwap<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: BreakerConfig) -> Self {
        Self::with_shared_config(name, Arc::new(config))
    }

    pub(crate) fn with_shared_config(name: impl Into<String>, config: Arc<BreakerConfig>) -> Self {
        let name = name.into();
        metrics::record_circuit_state(&name, CircuitState::Closed);
        Self {
            name,
            config,
            state: ArcSwap::from_pointee(BreakerState::INITIAL),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &BreakerConfig {
        &self.config
    }

    pub fn state(&self) -> CircuitState {
        self.state.load().circuit_state()
    }

    /// The full state value, including the failure count or opening time.
    pub fn snapshot(&self) -> BreakerState {
        **self.state.load()
    }

    /// Ask for permission to call the protected backend.
    ///
    /// An open breaker whose cool-down has elapsed moves to half-closed and
    /// admits the asking call as a trial. The elapsed check and the swap are
    /// not one atomic step: several callers racing on the same open state may
    /// all be admitted, though only one of them installs the half-closed
    /// state.
    pub fn is_call_permitted(&self) -> bool {
        let current = self.state.load_full();
        let next = current.next(Event::PermissionRequested { at: Instant::now() }, &self.config);
        if next != *current {
            self.install(&current, next);
        }
        next.permits_calls()
    }

    /// Like [`is_call_permitted`](Self::is_call_permitted), but yields the
    /// rejection as an error.
    pub fn try_acquire_permission(&self) -> Result<(), CallNotPermitted> {
        if self.is_call_permitted() {
            Ok(())
        } else {
            tracing::debug!(circuit = %self.name, "Call not permitted, circuit is open");
            metrics::record_call_not_permitted(&self.name);
            Err(CallNotPermitted {
                name: self.name.clone(),
            })
        }
    }

    pub fn record_success(&self) {
        self.apply(Event::Succeeded);
    }

    /// Record a failed call. Failures matching an ignore classifier are
    /// recorded as successes.
    pub fn record_failure(&self, failure: &(dyn Error + 'static)) {
        if let Some(classifier) = self.config.ignored_failures().matching(failure) {
            tracing::debug!(
                circuit = %self.name,
                classifier,
                error = %failure,
                "Ignored failure recorded as success"
            );
            self.record_success();
            return;
        }
        self.apply(Event::Failed { at: Instant::now() });
    }

    /// Run `operation` under this breaker's protection.
    ///
    /// The operation is skipped entirely when the breaker is open; the
    /// rejection is converted into the caller's error type. Failures are
    /// recorded and returned unchanged.
    pub fn execute<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: Error + From<CallNotPermitted> + 'static,
    {
        self.try_acquire_permission()?;
        match operation() {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(e) => {
                self.record_failure(&e);
                Err(e)
            }
        }
    }

    fn apply(&self, event: Event) {
        loop {
            let current = self.state.load_full();
            let next = current.next(event, &self.config);
            if next == *current || self.install(&current, next) {
                return;
            }
        }
    }

    /// Swap in `next` if the state is still `current`. Returns whether this
    /// caller's swap won.
    fn install(&self, current: &Arc<BreakerState>, next: BreakerState) -> bool {
        let previous = self.state.compare_and_swap(current, Arc::new(next));
        let installed = Arc::ptr_eq(&previous, current);
        if installed {
            self.log_transition(current, &next);
        }
        installed
    }

    fn log_transition(&self, from: &BreakerState, to: &BreakerState) {
        let (from, to) = (from.circuit_state(), to.circuit_state());
        if from == to {
            return;
        }
        match to {
            CircuitState::Open => tracing::warn!(
                circuit = %self.name,
                from = %from,
                cool_down = ?self.config.cool_down(),
                "Circuit breaker opened"
            ),
            CircuitState::HalfClosed => tracing::info!(
                circuit = %self.name,
                "Circuit breaker half-closed, admitting trial calls"
            ),
            CircuitState::Closed => tracing::info!(circuit = %self.name, "Circuit breaker closed"),
        }
        metrics::record_circuit_state(&self.name, to);
    }
}

impl fmt::Display for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CircuitBreaker '{}'", self.name)
    }
}
