//! Circuit breaker configuration.

use std::error::Error;
use std::time::Duration;

use crate::config::validation::ValidationError;
use crate::resilience::classify::IgnoredFailures;

/// Failures tolerated before the breaker opens, by default.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

/// How long an open breaker blocks calls, by default.
pub const DEFAULT_COOL_DOWN: Duration = Duration::from_secs(60);

/// Shortest cool-down accepted.
pub const MIN_COOL_DOWN: Duration = Duration::from_millis(100);

/// Immutable, validated breaker configuration.
///
/// Built once through [`BreakerConfig::custom`] and shared read-only by
/// every breaker created from it.
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    failure_threshold: u32,
    cool_down: Duration,
    ignored_failures: IgnoredFailures,
}

impl BreakerConfig {
    pub fn custom() -> BreakerConfigBuilder {
        BreakerConfigBuilder::default()
    }

    /// Consecutive counted failures that open the breaker.
    pub fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }

    /// Minimum time the breaker stays open.
    pub fn cool_down(&self) -> Duration {
        self.cool_down
    }

    pub fn ignored_failures(&self) -> &IgnoredFailures {
        &self.ignored_failures
    }
}

impl Default for BreakerConfig {
    fn default() -> Self {
        BreakerConfigBuilder::default().build()
    }
}

/// Fluent builder for [`BreakerConfig`].
///
/// Range checks run in the setters, so an invalid value is rejected at the
/// point it is supplied rather than clamped.
#[derive(Debug, Clone)]
pub struct BreakerConfigBuilder {
    failure_threshold: u32,
    cool_down: Duration,
    ignored_failures: IgnoredFailures,
}

impl Default for BreakerConfigBuilder {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            cool_down: DEFAULT_COOL_DOWN,
            ignored_failures: IgnoredFailures::new(),
        }
    }
}

impl BreakerConfigBuilder {
    pub fn failure_threshold(mut self, threshold: u32) -> Result<Self, ValidationError> {
        if threshold < 1 {
            return Err(ValidationError::FailureThresholdTooLow(threshold));
        }
        self.failure_threshold = threshold;
        Ok(self)
    }

    pub fn cool_down(mut self, cool_down: Duration) -> Result<Self, ValidationError> {
        if cool_down < MIN_COOL_DOWN {
            return Err(ValidationError::CoolDownTooShort {
                actual: cool_down,
                min: MIN_COOL_DOWN,
            });
        }
        self.cool_down = cool_down;
        Ok(self)
    }

    /// Failures of type `T` are recorded as successes.
    pub fn ignored_failure<T>(mut self) -> Self
    where
        T: Error + 'static,
    {
        self.ignored_failures.push_type::<T>();
        self
    }

    /// Failures accepted by `predicate` are recorded as successes.
    pub fn ignore_if<F>(mut self, label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&(dyn Error + 'static)) -> bool + Send + Sync + 'static,
    {
        self.ignored_failures.push_predicate(label, predicate);
        self
    }

    pub fn build(self) -> BreakerConfig {
        BreakerConfig {
            failure_threshold: self.failure_threshold,
            cool_down: self.cool_down,
            ignored_failures: self.ignored_failures,
        }
    }
}
