//! Retry logic.
//!
//! # Responsibilities
//! - Re-invoke a failing callable until it succeeds or the attempt budget runs out
//! - Stop immediately on failures classified as ignored
//! - Block the calling thread between attempts
//!
//! # Design Decisions
//! - The policy is configuration only; the attempt counter lives in each call
//! - Exhaustion rethrows the last failure unchanged, never a wrapper
//! - No cancellation: a hung attempt blocks the loop

use std::error::Error;
use std::time::Duration;

use crate::config::validation::ValidationError;
use crate::decorators::{Decorator, DecoratorKind};
use crate::observability::metrics;
use crate::resilience::backoff::Backoff;
use crate::resilience::classify::IgnoredFailures;

/// Attempts made by default, including the first call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Reusable retry configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
    ignored_failures: IgnoredFailures,
}

impl RetryPolicy {
    /// Three attempts, 500ms apart, nothing ignored.
    pub fn of_defaults() -> Self {
        RetryPolicyBuilder::default().build()
    }

    pub fn custom() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    pub fn ignored_failures(&self) -> &IgnoredFailures {
        &self.ignored_failures
    }

    /// Run `operation` until it succeeds, fails with an ignored failure, or
    /// has been attempted `max_attempts` times.
    pub fn execute<T, E, F>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: Error + 'static,
    {
        let mut attempt: u32 = 1;
        loop {
            let failure = match operation() {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::debug!(attempt, "Call succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) => e,
            };

            if let Some(classifier) = self.ignored_failures.matching(&failure) {
                tracing::debug!(
                    attempt,
                    classifier,
                    error = %failure,
                    "Ignored failure, not retrying"
                );
                return Err(failure);
            }

            let Some(next) = next_attempt(attempt, self.max_attempts) else {
                tracing::warn!(
                    attempts = self.max_attempts,
                    error = %failure,
                    "Retry attempts exhausted"
                );
                metrics::record_retry_exhausted();
                return Err(failure);
            };

            let delay = self.backoff.delay(attempt);
            attempt = next;
            tracing::debug!(attempt, delay = ?delay, error = %failure, "Retrying call");
            metrics::record_retry_attempt();
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
        }
    }
}

/// The attempt after `attempt`, or `None` once `max_attempts` have been made.
fn next_attempt(attempt: u32, max_attempts: u32) -> Option<u32> {
    if attempt >= max_attempts {
        None
    } else {
        Some(attempt + 1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::of_defaults()
    }
}

/// Fluent builder for [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct RetryPolicyBuilder {
    max_attempts: u32,
    backoff: Backoff,
    ignored_failures: IgnoredFailures,
}

impl Default for RetryPolicyBuilder {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Backoff::default(),
            ignored_failures: IgnoredFailures::new(),
        }
    }
}

impl RetryPolicyBuilder {
    /// Total attempts including the first call; must be at least 1.
    pub fn max_attempts(mut self, max_attempts: u32) -> Result<Self, ValidationError> {
        if max_attempts < 1 {
            return Err(ValidationError::MaxAttemptsTooLow(max_attempts));
        }
        self.max_attempts = max_attempts;
        Ok(self)
    }

    /// Fixed wait between attempts.
    pub fn wait_duration(mut self, wait: Duration) -> Self {
        self.backoff = Backoff::Fixed(wait);
        self
    }

    /// Doubling wait between attempts, capped at `max`.
    pub fn exponential_backoff(mut self, initial: Duration, max: Duration) -> Result<Self, ValidationError> {
        if max < initial {
            return Err(ValidationError::BackoffCeilingTooLow { initial, max });
        }
        self.backoff = Backoff::Exponential { initial, max };
        Ok(self)
    }

    /// Failures of type `T` end the loop at once, without consuming an attempt.
    pub fn ignored_failure<T>(mut self) -> Self
    where
        T: Error + 'static,
    {
        self.ignored_failures.push_type::<T>();
        self
    }

    pub fn ignore_if<F>(mut self, label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&(dyn Error + 'static)) -> bool + Send + Sync + 'static,
    {
        self.ignored_failures.push_predicate(label, predicate);
        self
    }

    pub fn build(self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff: self.backoff,
            ignored_failures: self.ignored_failures,
        }
    }
}

/// Wrap a zero-argument callable in a retry loop.
pub fn retryable_supplier<T, E, F>(supplier: F, policy: RetryPolicy) -> impl Fn() -> Result<T, E> + Send + Sync
where
    F: Fn() -> Result<T, E> + Send + Sync,
    E: Error + 'static,
{
    move || policy.execute(&supplier)
}

/// Wrap a single-argument callable in a retry loop. Each attempt receives a
/// clone of the original argument.
pub fn retryable_function<A, R, E, F>(function: F, policy: RetryPolicy) -> impl Fn(A) -> Result<R, E> + Send + Sync
where
    A: Clone,
    F: Fn(A) -> Result<R, E> + Send + Sync,
    E: Error + 'static,
{
    move |arg: A| policy.execute(|| function(arg.clone()))
}

/// Wrap a side-effecting callable in a retry loop.
pub fn retryable_runnable<E, F>(runnable: F, policy: RetryPolicy) -> impl Fn() -> Result<(), E> + Send + Sync
where
    F: Fn() -> Result<(), E> + Send + Sync,
    E: Error + 'static,
{
    retryable_supplier(runnable, policy)
}

impl<T, E> Decorator<T, E> for RetryPolicy
where
    E: Error + 'static,
{
    fn kind(&self) -> DecoratorKind {
        DecoratorKind::Retry
    }

    fn around(&self, next: &mut dyn FnMut() -> Result<T, E>) -> Result<T, E> {
        self.execute(next)
    }
}
