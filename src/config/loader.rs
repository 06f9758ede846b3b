//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::FailsafeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Validation(_) => None,
        }
    }
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<FailsafeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<FailsafeConfig, ConfigError> {
    let config: FailsafeConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.circuit_breaker.failure_threshold, 3);
        assert_eq!(config.circuit_breaker.cool_down_ms, 60_000);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.wait_ms, 500);
        assert!(config.circuit_breakers.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[circuit_breaker]
failure_threshold = 5

[circuit_breakers.search]
failure_threshold = 2
cool_down_ms = 1000

[retry]
max_attempts = 4
wait_ms = 50

[observability]
log_level = "debug"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.circuit_breaker.failure_threshold, 5);
        assert_eq!(config.circuit_breaker.cool_down_ms, 60_000);
        assert_eq!(config.circuit_breakers["search"].cool_down_ms, 1000);
        assert_eq!(config.retry.max_attempts, 4);
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/failsafe.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = parse_config("[retry\nmax_attempts = 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_errors_are_joined() {
        let err = parse_config("[circuit_breaker]\nfailure_threshold = 0\n\n[retry]\nmax_attempts = 0\n")
            .unwrap_err();

        match &err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            "Validation failed: [circuit_breaker] failure threshold must be at least 1, got 0, \
             [retry] max attempts must be at least 1, got 0"
        );
    }
}
