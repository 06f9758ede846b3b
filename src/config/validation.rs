//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (threshold >= 1, cool-down >= 100ms, attempts >= 1)
//! - Shared by the fluent builders and the file loader
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FailsafeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::time::Duration;
use thiserror::Error;

use crate::config::schema::{BreakerSettings, FailsafeConfig, ObservabilityConfig, RetrySettings};
use crate::resilience::{BreakerConfig, RetryPolicy};

/// A configuration value outside its allowed range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("failure threshold must be at least 1, got {0}")]
    FailureThresholdTooLow(u32),

    #[error("cool-down must be at least {min:?}, got {actual:?}")]
    CoolDownTooShort { actual: Duration, min: Duration },

    #[error("max attempts must be at least 1, got {0}")]
    MaxAttemptsTooLow(u32),

    #[error("backoff ceiling {max:?} is below its initial delay {initial:?}")]
    BackoffCeilingTooLow { initial: Duration, max: Duration },

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),

    /// A problem found inside a named config section.
    #[error("[{section}] {source}")]
    InSection {
        section: String,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    pub(crate) fn in_section(self, section: impl Into<String>) -> Self {
        ValidationError::InSection {
            section: section.into(),
            source: Box::new(self),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a whole config file, collecting every problem.
pub fn validate_config(config: &FailsafeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    collect_breaker(&mut errors, "circuit_breaker", &config.circuit_breaker);
    for (name, settings) in &config.circuit_breakers {
        collect_breaker(&mut errors, &format!("circuit_breakers.{}", name), settings);
    }

    collect_retry(&mut errors, &config.retry);

    if let Err(e) = validate_observability(&config.observability) {
        errors.push(e.in_section("observability"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn collect_breaker(errors: &mut Vec<ValidationError>, section: &str, settings: &BreakerSettings) {
    // Both fields are checked so one bad threshold doesn't hide a bad cool-down.
    let builder = BreakerConfig::custom();
    if let Err(e) = builder.clone().failure_threshold(settings.failure_threshold) {
        errors.push(e.in_section(section));
    }
    if let Err(e) = builder.cool_down(Duration::from_millis(settings.cool_down_ms)) {
        errors.push(e.in_section(section));
    }
}

fn collect_retry(errors: &mut Vec<ValidationError>, settings: &RetrySettings) {
    if let Err(e) = RetryPolicy::custom().max_attempts(settings.max_attempts) {
        errors.push(e.in_section("retry"));
    }
    if settings.exponential {
        let initial = Duration::from_millis(settings.wait_ms);
        let max = Duration::from_millis(settings.max_wait_ms);
        if let Err(e) = RetryPolicy::custom().exponential_backoff(initial, max) {
            errors.push(e.in_section("retry"));
        }
    }
}

fn validate_observability(config: &ObservabilityConfig) -> Result<(), ValidationError> {
    let level = config.log_level.to_ascii_lowercase();
    if LOG_LEVELS.contains(&level.as_str()) {
        Ok(())
    } else {
        Err(ValidationError::UnknownLogLevel(config.log_level.clone()))
    }
}
