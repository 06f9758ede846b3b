//! Circuit breaker behaviour through the public API.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use failsafe::resilience::circuit_breaker::{decorate_function, decorate_runnable, decorate_supplier};
use failsafe::{BreakerConfig, BreakerRegistry, BreakerState, CircuitBreaker, CircuitState};

mod common;
use common::{breaker_config, FlakyService, InvalidRequest, ServiceError};

#[test]
fn test_opens_after_exactly_threshold_failures() {
    for threshold in 1..=5 {
        let breaker = CircuitBreaker::new("threshold", breaker_config(threshold, 60_000));

        for _ in 0..threshold - 1 {
            breaker.record_failure(&ServiceError::Unavailable);
        }
        assert_eq!(breaker.state(), CircuitState::Closed, "threshold {}", threshold);

        breaker.record_failure(&ServiceError::Unavailable);
        assert_eq!(breaker.state(), CircuitState::Open, "threshold {}", threshold);
    }
}

#[test]
fn test_success_resets_consecutive_failures() {
    let breaker = CircuitBreaker::new("reset", breaker_config(3, 60_000));

    breaker.record_failure(&ServiceError::Unavailable);
    breaker.record_failure(&ServiceError::Unavailable);
    breaker.record_success();
    breaker.record_failure(&ServiceError::Unavailable);
    breaker.record_failure(&ServiceError::Unavailable);

    assert_eq!(breaker.snapshot(), BreakerState::Closed { consecutive_failures: 2 });
}

#[test]
fn test_open_rejects_until_cool_down_then_half_closes() {
    let breaker = CircuitBreaker::new("cool-down", breaker_config(1, 200));
    breaker.record_failure(&ServiceError::Unavailable);

    assert!(!breaker.is_call_permitted());
    assert_eq!(breaker.state(), CircuitState::Open);

    thread::sleep(Duration::from_millis(250));

    assert!(breaker.is_call_permitted());
    assert_eq!(breaker.state(), CircuitState::HalfClosed);
}

#[test]
fn test_half_closed_success_requires_fresh_threshold() {
    let breaker = CircuitBreaker::new("half-closed-success", breaker_config(2, 100));
    breaker.record_failure(&ServiceError::Unavailable);
    breaker.record_failure(&ServiceError::Unavailable);
    thread::sleep(Duration::from_millis(150));
    assert!(breaker.is_call_permitted());

    breaker.record_success();
    assert_eq!(breaker.snapshot(), BreakerState::INITIAL);

    breaker.record_failure(&ServiceError::Unavailable);
    assert_eq!(breaker.state(), CircuitState::Closed);
}

#[test]
fn test_half_closed_failure_restarts_cool_down() {
    let breaker = CircuitBreaker::new("half-closed-failure", breaker_config(1, 200));
    breaker.record_failure(&ServiceError::Unavailable);
    thread::sleep(Duration::from_millis(250));
    assert!(breaker.is_call_permitted());

    breaker.record_failure(&ServiceError::Unavailable);
    assert_eq!(breaker.state(), CircuitState::Open);
    assert!(!breaker.is_call_permitted());

    thread::sleep(Duration::from_millis(250));
    assert!(breaker.is_call_permitted());
}

#[test]
fn test_ignored_failures_never_trip() {
    let config = BreakerConfig::custom()
        .failure_threshold(1)
        .unwrap()
        .ignored_failure::<InvalidRequest>()
        .build();
    let breaker = CircuitBreaker::new("ignored", config);

    for _ in 0..100 {
        breaker.record_failure(&ServiceError::Rejected(InvalidRequest("bad id".into())));
    }

    assert_eq!(breaker.snapshot(), BreakerState::INITIAL);
}

#[test]
fn test_outcomes_while_open_are_no_ops() {
    let breaker = CircuitBreaker::new("open-no-op", breaker_config(1, 60_000));
    breaker.record_failure(&ServiceError::Unavailable);
    let opened = breaker.snapshot();

    breaker.record_success();
    breaker.record_failure(&ServiceError::Unavailable);

    assert_eq!(breaker.snapshot(), opened);
}

#[test]
fn test_end_to_end_one_second_cool_down() {
    let registry = BreakerRegistry::of_defaults();
    let breaker = registry.circuit_breaker_with_config("e2e", breaker_config(1, 1000));

    breaker.record_failure(&ServiceError::Unavailable);
    assert_eq!(breaker.state(), CircuitState::Open);
    assert!(!breaker.is_call_permitted());

    thread::sleep(Duration::from_millis(1000));

    assert!(breaker.is_call_permitted());
    assert_eq!(breaker.state(), CircuitState::HalfClosed);
}

#[test]
fn test_decorated_supplier_fails_fast_when_open() {
    let service = FlakyService::always_failing();
    let breaker = Arc::new(CircuitBreaker::new("supplier", breaker_config(2, 60_000)));
    let backend = service.clone();
    let call = decorate_supplier(move || backend.call(), breaker.clone());

    assert!(matches!(call(), Err(ServiceError::Unavailable)));
    assert!(matches!(call(), Err(ServiceError::Unavailable)));
    match call() {
        Err(ServiceError::NotPermitted(e)) => assert_eq!(e.name, "supplier"),
        other => panic!("expected rejection, got {:?}", other),
    }

    assert_eq!(service.calls(), 2);
}

#[test]
fn test_decorated_function_and_runnable() {
    let breaker = Arc::new(CircuitBreaker::new("function", BreakerConfig::default()));

    let lookup = decorate_function(
        |id: u32| {
            if id == 0 {
                Err(ServiceError::Unavailable)
            } else {
                Ok(id * 10)
            }
        },
        breaker.clone(),
    );
    assert_eq!(lookup(4).unwrap(), 40);
    assert!(lookup(0).is_err());
    assert_eq!(breaker.snapshot(), BreakerState::Closed { consecutive_failures: 1 });

    let ping = decorate_runnable(|| Ok::<(), ServiceError>(()), breaker.clone());
    assert!(ping().is_ok());
    assert_eq!(breaker.snapshot(), BreakerState::INITIAL);
}

#[test]
fn test_registry_returns_identical_instance() {
    let registry = BreakerRegistry::of_defaults();
    let first = registry.circuit_breaker_with_config("shared", breaker_config(1, 60_000));
    let second = registry.circuit_breaker_with_config("shared", breaker_config(10, 60_000));
    let third = registry.circuit_breaker("shared");

    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &third));

    second.record_failure(&ServiceError::Unavailable);
    assert_eq!(first.state(), CircuitState::Open);
}
