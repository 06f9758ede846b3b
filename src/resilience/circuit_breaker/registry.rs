//! Circuit breaker registry.
//!
//! # Responsibilities
//! - Map a logical backend name to its single shared breaker
//! - Create breakers lazily, exactly once per name, under concurrent first access
//!
//! # Design Decisions
//! - Get-or-create goes through the dashmap entry API, which holds the shard
//!   lock across the absent check and the insert
//! - No removal; entries live as long as the registry
//! - A config supplied after a name's first creation is ignored

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

use super::breaker::CircuitBreaker;
use super::config::BreakerConfig;
use super::state::CircuitState;

/// Concurrent name → breaker mapping.
#[derive(Debug)]
pub struct BreakerRegistry {
    breakers: DashMap<String, Arc<CircuitBreaker>>,
    default_config: Arc<BreakerConfig>,
}

impl BreakerRegistry {
    /// Registry whose breakers use [`BreakerConfig::default`].
    pub fn of_defaults() -> Self {
        Self::of(BreakerConfig::default())
    }

    /// Registry whose breakers use `default_config` unless told otherwise.
    pub fn of(default_config: BreakerConfig) -> Self {
        Self {
            breakers: DashMap::new(),
            default_config: Arc::new(default_config),
        }
    }

    /// The process-wide registry, created with default config on first use.
    pub fn global() -> &'static BreakerRegistry {
        static GLOBAL: OnceLock<BreakerRegistry> = OnceLock::new();
        GLOBAL.get_or_init(BreakerRegistry::of_defaults)
    }

    pub fn default_config(&self) -> &BreakerConfig {
        &self.default_config
    }

    /// Get the breaker for `name`, creating it with the registry default.
    pub fn circuit_breaker(&self, name: &str) -> Arc<CircuitBreaker> {
        if let Some(existing) = self.breakers.get(name) {
            return existing.clone();
        }
        self.breakers
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(circuit = %name, "Creating circuit breaker");
                Arc::new(CircuitBreaker::with_shared_config(
                    name,
                    self.default_config.clone(),
                ))
            })
            .clone()
    }

    /// Get the breaker for `name`, creating it with `config` if absent.
    ///
    /// If the breaker already exists it is returned as is and `config` is
    /// dropped.
    pub fn circuit_breaker_with_config(&self, name: &str, config: BreakerConfig) -> Arc<CircuitBreaker> {
        match self.breakers.entry(name.to_string()) {
            Entry::Occupied(entry) => {
                tracing::debug!(
                    circuit = %name,
                    "Circuit breaker already exists, ignoring supplied config"
                );
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                tracing::debug!(circuit = %name, "Creating circuit breaker with custom config");
                entry.insert(Arc::new(CircuitBreaker::new(name, config))).clone()
            }
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.breakers.iter().map(|e| e.key().clone()).collect()
    }

    /// Every registered breaker, in no particular order.
    pub fn breakers(&self) -> Vec<Arc<CircuitBreaker>> {
        self.breakers.iter().map(|e| e.value().clone()).collect()
    }

    /// Current state of every registered breaker.
    pub fn states(&self) -> Vec<(String, CircuitState)> {
        self.breakers
            .iter()
            .map(|e| (e.key().clone(), e.value().state()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.breakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakers.is_empty()
    }
}

impl Default for BreakerRegistry {
    fn default() -> Self {
        Self::of_defaults()
    }
}
