//! Shared utilities for integration and load testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use failsafe::{BreakerConfig, CallNotPermitted, RetryPolicy};
use thiserror::Error;

/// The caller-side error type threaded through decorated calls.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("backend unavailable")]
    Unavailable,

    #[error("request rejected")]
    Rejected(#[source] InvalidRequest),

    #[error(transparent)]
    NotPermitted(#[from] CallNotPermitted),
}

/// A client-side problem that retrying or tripping a breaker will not fix.
#[derive(Debug, Error)]
#[error("invalid request: {0}")]
pub struct InvalidRequest(pub String);

/// A backend that fails its first `failures` calls, then succeeds.
#[derive(Debug, Clone)]
pub struct FlakyService {
    calls: Arc<AtomicU32>,
    failures: u32,
}

#[allow(dead_code)]
impl FlakyService {
    pub fn failing_first(failures: u32) -> Self {
        Self {
            calls: Arc::new(AtomicU32::new(0)),
            failures,
        }
    }

    pub fn always_failing() -> Self {
        Self::failing_first(u32::MAX)
    }

    pub fn healthy() -> Self {
        Self::failing_first(0)
    }

    pub fn call(&self) -> Result<&'static str, ServiceError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            Err(ServiceError::Unavailable)
        } else {
            Ok("pong")
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Breaker config with a short cool-down so tests stay fast.
#[allow(dead_code)]
pub fn breaker_config(threshold: u32, cool_down_ms: u64) -> BreakerConfig {
    BreakerConfig::custom()
        .failure_threshold(threshold)
        .unwrap()
        .cool_down(Duration::from_millis(cool_down_ms))
        .unwrap()
        .build()
}

/// Retry policy with a near-zero wait.
#[allow(dead_code)]
pub fn quick_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::custom()
        .max_attempts(max_attempts)
        .unwrap()
        .wait_duration(Duration::from_millis(1))
        .build()
}
