//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, same rules as the fluent builders)
//!     → FailsafeConfig (validated, immutable)
//!     → build_registry() / retry_policy()
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; breakers keep the config they were built with
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{BreakerSettings, FailsafeConfig, ObservabilityConfig, RetrySettings};
pub use validation::{validate_config, ValidationError};
