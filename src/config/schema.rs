//! Configuration schema definitions.
//!
//! This module defines the file form of breaker and retry settings.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::validation::ValidationError;
use crate::resilience::{BreakerConfig, BreakerRegistry, RetryPolicy};

/// Root configuration file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FailsafeConfig {
    /// Defaults for breakers created on demand by the registry.
    pub circuit_breaker: BreakerSettings,

    /// Breakers created eagerly, each with its own settings.
    pub circuit_breakers: BTreeMap<String, BreakerSettings>,

    /// Retry policy settings.
    pub retry: RetrySettings,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl FailsafeConfig {
    /// A registry defaulting to `[circuit_breaker]` with every named breaker
    /// already registered.
    pub fn build_registry(&self) -> Result<BreakerRegistry, ValidationError> {
        let default_config = self
            .circuit_breaker
            .to_config()
            .map_err(|e| e.in_section("circuit_breaker"))?;
        let registry = BreakerRegistry::of(default_config);

        for (name, settings) in &self.circuit_breakers {
            let config = settings
                .to_config()
                .map_err(|e| e.in_section(format!("circuit_breakers.{}", name)))?;
            registry.circuit_breaker_with_config(name, config);
        }

        Ok(registry)
    }

    pub fn retry_policy(&self) -> Result<RetryPolicy, ValidationError> {
        self.retry.to_policy().map_err(|e| e.in_section("retry"))
    }
}

/// Circuit breaker settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerSettings {
    /// Consecutive failures that open the circuit.
    pub failure_threshold: u32,

    /// Time spent open before a trial call is allowed, in milliseconds.
    pub cool_down_ms: u64,
}

impl Default for BreakerSettings {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            cool_down_ms: 60_000,
        }
    }
}

impl BreakerSettings {
    pub fn to_config(&self) -> Result<BreakerConfig, ValidationError> {
        Ok(BreakerConfig::custom()
            .failure_threshold(self.failure_threshold)?
            .cool_down(Duration::from_millis(self.cool_down_ms))?
            .build())
    }
}

/// Retry settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Attempts including the first call.
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds; the initial delay when exponential.
    pub wait_ms: u64,

    /// Double the delay after each attempt, with jitter.
    pub exponential: bool,

    /// Ceiling for exponential delays in milliseconds.
    pub max_wait_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            wait_ms: 500,
            exponential: false,
            max_wait_ms: 30_000,
        }
    }
}

impl RetrySettings {
    pub fn to_policy(&self) -> Result<RetryPolicy, ValidationError> {
        let wait = Duration::from_millis(self.wait_ms);
        let builder = RetryPolicy::custom().max_attempts(self.max_attempts)?;
        let builder = if self.exponential {
            builder.exponential_backoff(wait, Duration::from_millis(self.max_wait_ms))?
        } else {
            builder.wait_duration(wait)
        };
        Ok(builder.build())
    }
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resilience::{Backoff, CircuitState};

    #[test]
    fn test_build_registry_creates_named_breakers() {
        let mut config = FailsafeConfig::default();
        config.circuit_breakers.insert(
            "inventory".into(),
            BreakerSettings {
                failure_threshold: 5,
                cool_down_ms: 250,
            },
        );

        let registry = config.build_registry().unwrap();
        assert_eq!(registry.names(), vec!["inventory".to_string()]);

        let inventory = registry.circuit_breaker("inventory");
        assert_eq!(inventory.config().failure_threshold(), 5);
        assert_eq!(inventory.config().cool_down(), Duration::from_millis(250));
        assert_eq!(inventory.state(), CircuitState::Closed);

        assert_eq!(registry.default_config().failure_threshold(), 3);
    }

    #[test]
    fn test_build_registry_rejects_bad_named_breaker() {
        let mut config = FailsafeConfig::default();
        config.circuit_breakers.insert(
            "billing".into(),
            BreakerSettings {
                cool_down_ms: 5,
                ..Default::default()
            },
        );

        let err = config.build_registry().unwrap_err();
        assert!(err.to_string().starts_with("[circuit_breakers.billing]"));
    }

    #[test]
    fn test_retry_policy_from_settings() {
        let config = FailsafeConfig {
            retry: RetrySettings {
                max_attempts: 4,
                wait_ms: 100,
                exponential: true,
                max_wait_ms: 800,
            },
            ..Default::default()
        };

        let policy = config.retry_policy().unwrap();
        assert_eq!(policy.max_attempts(), 4);
        assert_eq!(
            policy.backoff(),
            Backoff::Exponential {
                initial: Duration::from_millis(100),
                max: Duration::from_millis(800),
            }
        );
    }
}
