//! Circuit breaker decorators for plain callables.

use std::error::Error;
use std::sync::Arc;

use super::breaker::{CallNotPermitted, CircuitBreaker};
use crate::decorators::{Decorator, DecoratorKind};

/// Wrap a zero-argument callable so each call goes through `breaker`.
pub fn decorate_supplier<T, E, F>(supplier: F, breaker: Arc<CircuitBreaker>) -> impl Fn() -> Result<T, E> + Send + Sync
where
    F: Fn() -> Result<T, E> + Send + Sync,
    E: Error + From<CallNotPermitted> + 'static,
{
    move || breaker.execute(&supplier)
}

/// Wrap a single-argument callable so each call goes through `breaker`.
pub fn decorate_function<A, R, E, F>(function: F, breaker: Arc<CircuitBreaker>) -> impl Fn(A) -> Result<R, E> + Send + Sync
where
    F: Fn(A) -> Result<R, E> + Send + Sync,
    E: Error + From<CallNotPermitted> + 'static,
{
    move |arg: A| breaker.execute(|| function(arg))
}

/// Wrap a side-effecting callable so each call goes through `breaker`.
pub fn decorate_runnable<E, F>(runnable: F, breaker: Arc<CircuitBreaker>) -> impl Fn() -> Result<(), E> + Send + Sync
where
    F: Fn() -> Result<(), E> + Send + Sync,
    E: Error + From<CallNotPermitted> + 'static,
{
    decorate_supplier(runnable, breaker)
}

impl<T, E> Decorator<T, E> for CircuitBreaker
where
    E: Error + From<CallNotPermitted> + 'static,
{
    fn kind(&self) -> DecoratorKind {
        DecoratorKind::CircuitBreaker
    }

    fn around(&self, next: &mut dyn FnMut() -> Result<T, E>) -> Result<T, E> {
        self.execute(next)
    }
}
