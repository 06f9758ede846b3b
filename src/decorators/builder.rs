//! Builders that stack decorators around one callable.

use std::error::Error;
use std::sync::Arc;

use super::layer::{invoke, Decorator, DecoratorKind};
use crate::observability::metrics::{Timed, Timer};
use crate::resilience::{CallNotPermitted, CircuitBreaker, RetryPolicy};

type Layers<T, E> = Vec<Arc<dyn Decorator<T, E>>>;

/// Entry point for decorator composition.
///
/// ```
/// use std::sync::Arc;
/// use failsafe::{BreakerConfig, CallNotPermitted, CircuitBreaker, Decorators, RetryPolicy};
///
/// #[derive(Debug, thiserror::Error)]
/// enum FetchError {
///     #[error("backend unavailable")]
///     Unavailable,
///     #[error(transparent)]
///     Open(#[from] CallNotPermitted),
/// }
///
/// let breaker = Arc::new(CircuitBreaker::new("backend", BreakerConfig::default()));
/// let fetch = Decorators::of_supplier(|| Ok::<_, FetchError>("payload"))
///     .with_circuit_breaker(breaker)
///     .with_retry(RetryPolicy::of_defaults())
///     .decorate();
///
/// assert_eq!(fetch().unwrap(), "payload");
/// ```
pub struct Decorators;

impl Decorators {
    pub fn of_supplier<T, E, F>(supplier: F) -> DecorateSupplier<T, E>
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        DecorateSupplier {
            supplier: Arc::new(supplier),
            layers: Vec::new(),
        }
    }

    pub fn of_function<A, R, E, F>(function: F) -> DecorateFunction<A, R, E>
    where
        F: Fn(A) -> Result<R, E> + Send + Sync + 'static,
    {
        DecorateFunction {
            function: Arc::new(function),
            layers: Vec::new(),
        }
    }

    pub fn of_runnable<E, F>(runnable: F) -> DecorateRunnable<E>
    where
        F: Fn() -> Result<(), E> + Send + Sync + 'static,
    {
        Self::of_supplier(runnable)
    }
}

/// Builder for a decorated zero-argument callable.
///
/// Each `with_*` call wraps everything added so far, so the layer added last
/// runs first on every invocation.
pub struct DecorateSupplier<T, E> {
    supplier: Arc<dyn Fn() -> Result<T, E> + Send + Sync>,
    layers: Layers<T, E>,
}

/// Builder for a decorated side-effecting callable.
pub type DecorateRunnable<E> = DecorateSupplier<(), E>;

impl<T: 'static, E: 'static> DecorateSupplier<T, E> {
    pub fn with_circuit_breaker(self, breaker: Arc<CircuitBreaker>) -> Self
    where
        E: Error + From<CallNotPermitted>,
    {
        self.with(breaker)
    }

    pub fn with_retry(self, policy: RetryPolicy) -> Self
    where
        E: Error,
    {
        self.with(Arc::new(policy))
    }

    pub fn with_metrics(self, timer: Arc<dyn Timer>) -> Self {
        self.with(Arc::new(Timed::new(timer)))
    }

    /// Add any layer.
    pub fn with(mut self, layer: Arc<dyn Decorator<T, E>>) -> Self {
        self.layers.push(layer);
        self
    }

    /// Layer kinds in execution order, outermost first.
    pub fn layers(&self) -> Vec<DecoratorKind> {
        self.layers.iter().rev().map(|l| l.kind()).collect()
    }

    /// Finish the stack. Consumes the builder.
    pub fn decorate(self) -> impl Fn() -> Result<T, E> + Send + Sync {
        let DecorateSupplier { supplier, layers } = self;
        move || invoke(&layers, &mut || supplier())
    }
}

/// Builder for a decorated single-argument callable.
///
/// Retried attempts receive a clone of the original argument.
pub struct DecorateFunction<A, R, E> {
    function: Arc<dyn Fn(A) -> Result<R, E> + Send + Sync>,
    layers: Layers<R, E>,
}

impl<A: Clone + 'static, R: 'static, E: 'static> DecorateFunction<A, R, E> {
    pub fn with_circuit_breaker(self, breaker: Arc<CircuitBreaker>) -> Self
    where
        E: Error + From<CallNotPermitted>,
    {
        self.with(breaker)
    }

    pub fn with_retry(self, policy: RetryPolicy) -> Self
    where
        E: Error,
    {
        self.with(Arc::new(policy))
    }

    pub fn with_metrics(self, timer: Arc<dyn Timer>) -> Self {
        self.with(Arc::new(Timed::new(timer)))
    }

    pub fn with(mut self, layer: Arc<dyn Decorator<R, E>>) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn layers(&self) -> Vec<DecoratorKind> {
        self.layers.iter().rev().map(|l| l.kind()).collect()
    }

    pub fn decorate(self) -> impl Fn(A) -> Result<R, E> + Send + Sync {
        let DecorateFunction { function, layers } = self;
        move |arg: A| invoke(&layers, &mut || function(arg.clone()))
    }
}
