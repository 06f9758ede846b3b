//! Around-call layers and their composition.

use std::fmt;

/// What a layer does, for inspecting a composed stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecoratorKind {
    CircuitBreaker,
    Retry,
    Metrics,
}

impl fmt::Display for DecoratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecoratorKind::CircuitBreaker => write!(f, "circuit_breaker"),
            DecoratorKind::Retry => write!(f, "retry"),
            DecoratorKind::Metrics => write!(f, "metrics"),
        }
    }
}

/// A behaviour wrapped around a call.
///
/// `around` receives the rest of the stack as `next` and decides whether,
/// and how often, to invoke it. Implementations must return `Ok` only with a
/// value produced by `next`.
pub trait Decorator<T, E>: Send + Sync {
    fn kind(&self) -> DecoratorKind;

    fn around(&self, next: &mut dyn FnMut() -> Result<T, E>) -> Result<T, E>;
}

/// Run `call` through `layers`, which are ordered innermost first; the last
/// layer runs outermost.
pub(crate) fn invoke<T, E>(
    layers: &[std::sync::Arc<dyn Decorator<T, E>>],
    call: &mut dyn FnMut() -> Result<T, E>,
) -> Result<T, E> {
    match layers.split_last() {
        None => call(),
        Some((outermost, inner)) => outermost.around(&mut || invoke(inner, &mut *call)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Tracer {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Decorator<u32, String> for Tracer {
        fn kind(&self) -> DecoratorKind {
            DecoratorKind::Metrics
        }

        fn around(&self, next: &mut dyn FnMut() -> Result<u32, String>) -> Result<u32, String> {
            self.log.lock().unwrap().push(format!("enter {}", self.label));
            let result = next();
            self.log.lock().unwrap().push(format!("exit {}", self.label));
            result
        }
    }

    #[test]
    fn test_last_layer_runs_outermost() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let layers: Vec<Arc<dyn Decorator<u32, String>>> = vec![
            Arc::new(Tracer { label: "inner", log: log.clone() }),
            Arc::new(Tracer { label: "outer", log: log.clone() }),
        ];

        let result = invoke(&layers, &mut || {
            log.lock().unwrap().push("call".into());
            Ok(7)
        });

        assert_eq!(result, Ok(7));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["enter outer", "enter inner", "call", "exit inner", "exit outer"]
        );
    }

    #[test]
    fn test_no_layers_calls_directly() {
        let layers: Vec<Arc<dyn Decorator<u32, String>>> = Vec::new();
        assert_eq!(invoke(&layers, &mut || Err("down".to_string())), Err("down".to_string()));
    }
}
