//! Decorator composition.
//!
//! # Data Flow
//! ```text
//! Decorators::of_supplier(call)
//!     .with_circuit_breaker(b)   layers = [breaker]
//!     .with_retry(p)             layers = [breaker, retry]
//!     .decorate()
//!
//! invocation:
//!     retry.around ──▶ breaker.around ──▶ call
//!          ▲ loops          │ permission check + outcome record
//!          └────────────────┘ on every attempt
//! ```
//!
//! # Design Decisions
//! - Layers are an explicit ordered list; the one added last runs outermost
//! - A builder wraps exactly one callable and is consumed by `decorate()`
//! - Failures propagate unchanged; layers observe and count, never substitute

mod builder;
mod layer;

pub use builder::{DecorateFunction, DecorateRunnable, DecorateSupplier, Decorators};
pub use layer::{Decorator, DecoratorKind};
