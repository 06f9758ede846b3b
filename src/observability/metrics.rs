//! Metrics collection.
//!
//! # Responsibilities
//! - Publish breaker state and retry activity through the `metrics` facade
//! - Provide the call timer used by the metrics decorator
//!
//! # Metrics
//! - `failsafe_circuit_state` (gauge): 0=closed, 1=half-closed, 2=open, by circuit
//! - `failsafe_calls_not_permitted_total` (counter): rejected calls, by circuit
//! - `failsafe_retry_attempts_total` (counter): retries scheduled
//! - `failsafe_retry_exhausted_total` (counter): calls that ran out of attempts
//!
//! # Design Decisions
//! - No exporter here; the host process installs whatever recorder it uses
//! - Timers record on every exit path, including unwinding

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::decorators::{Decorator, DecoratorKind};
use crate::resilience::CircuitState;

pub fn record_circuit_state(circuit: &str, state: CircuitState) {
    let value = match state {
        CircuitState::Closed => 0.0,
        CircuitState::HalfClosed => 1.0,
        CircuitState::Open => 2.0,
    };
    ::metrics::gauge!("failsafe_circuit_state", "circuit" => circuit.to_string()).set(value);
}

pub fn record_call_not_permitted(circuit: &str) {
    ::metrics::counter!("failsafe_calls_not_permitted_total", "circuit" => circuit.to_string()).increment(1);
}

pub fn record_retry_attempt() {
    ::metrics::counter!("failsafe_retry_attempts_total").increment(1);
}

pub fn record_retry_exhausted() {
    ::metrics::counter!("failsafe_retry_exhausted_total").increment(1);
}

/// Receives the duration of each timed call.
pub trait Timer: Send + Sync {
    fn record(&self, elapsed: Duration);
}

/// A [`Timer`] backed by a `metrics` histogram, in seconds.
#[derive(Debug, Clone)]
pub struct HistogramTimer {
    name: String,
    operation: String,
}

impl HistogramTimer {
    /// Records to histogram `name`, labelled with `operation`.
    pub fn new(name: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operation: operation.into(),
        }
    }
}

impl Timer for HistogramTimer {
    fn record(&self, elapsed: Duration) {
        ::metrics::histogram!(self.name.clone(), "operation" => self.operation.clone())
            .record(elapsed.as_secs_f64());
    }
}

struct Stopwatch<'a> {
    timer: &'a dyn Timer,
    started: Instant,
}

impl<'a> Stopwatch<'a> {
    fn start(timer: &'a dyn Timer) -> Self {
        Self {
            timer,
            started: Instant::now(),
        }
    }
}

impl Drop for Stopwatch<'_> {
    fn drop(&mut self) {
        self.timer.record(self.started.elapsed());
    }
}

/// Times every call passing through it.
pub struct Timed {
    timer: Arc<dyn Timer>,
}

impl Timed {
    pub fn new(timer: Arc<dyn Timer>) -> Self {
        Self { timer }
    }

    pub fn execute<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let _stopwatch = Stopwatch::start(self.timer.as_ref());
        operation()
    }
}

impl<T, E> Decorator<T, E> for Timed {
    fn kind(&self) -> DecoratorKind {
        DecoratorKind::Metrics
    }

    fn around(&self, next: &mut dyn FnMut() -> Result<T, E>) -> Result<T, E> {
        self.execute(next)
    }
}

pub fn timed_supplier<T, E, F>(supplier: F, timer: Arc<dyn Timer>) -> impl Fn() -> Result<T, E> + Send + Sync
where
    F: Fn() -> Result<T, E> + Send + Sync,
{
    let timed = Timed::new(timer);
    move || timed.execute(&supplier)
}

pub fn timed_function<A, R, E, F>(function: F, timer: Arc<dyn Timer>) -> impl Fn(A) -> Result<R, E> + Send + Sync
where
    F: Fn(A) -> Result<R, E> + Send + Sync,
{
    let timed = Timed::new(timer);
    move |arg: A| timed.execute(|| function(arg))
}

pub fn timed_runnable<E, F>(runnable: F, timer: Arc<dyn Timer>) -> impl Fn() -> Result<(), E> + Send + Sync
where
    F: Fn() -> Result<(), E> + Send + Sync,
{
    timed_supplier(runnable, timer)
}
