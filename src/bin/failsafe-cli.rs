use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;

use failsafe::config::{load_config, ConfigError, FailsafeConfig};
use failsafe::observability::logging::init_logging;
use failsafe::resilience::Backoff;
use failsafe::HealthReport;

#[derive(Parser)]
#[command(name = "failsafe-cli")]
#[command(about = "Inspect circuit breaker and retry configuration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a config file and print the resolved settings
    Check {
        path: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build the registry from a config file and print its health report
    Report { path: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let path = match &cli.command {
        Commands::Check { path, .. } | Commands::Report { path } => path,
    };

    let config = match load_config(path) {
        Ok(config) => config,
        Err(ConfigError::Validation(errors)) => {
            eprintln!("{}: {} problem(s)", path.display(), errors.len());
            for error in errors {
                eprintln!("  - {}", error);
            }
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.observability) {
        eprintln!("Warning: logging not initialised: {}", e);
    }

    let outcome = match cli.command {
        Commands::Check { json, .. } => check(&config, json),
        Commands::Report { .. } => report(&config),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn check(config: &FailsafeConfig, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let policy = config.retry_policy()?;
    let backoff = match policy.backoff() {
        Backoff::Fixed(wait) => json!({ "fixed_ms": wait.as_millis() as u64 }),
        Backoff::Exponential { initial, max } => json!({
            "exponential_initial_ms": initial.as_millis() as u64,
            "exponential_max_ms": max.as_millis() as u64,
        }),
    };

    if as_json {
        let resolved = json!({
            "circuit_breaker": config.circuit_breaker,
            "circuit_breakers": config.circuit_breakers,
            "retry": { "max_attempts": policy.max_attempts(), "backoff": backoff },
        });
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    println!(
        "default breaker: threshold={} cool_down={}ms",
        config.circuit_breaker.failure_threshold, config.circuit_breaker.cool_down_ms
    );
    for (name, settings) in &config.circuit_breakers {
        println!(
            "breaker {}: threshold={} cool_down={}ms",
            name, settings.failure_threshold, settings.cool_down_ms
        );
    }
    println!("retry: max_attempts={} backoff={}", policy.max_attempts(), backoff);
    println!("OK");
    Ok(())
}

fn report(config: &FailsafeConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = config.build_registry()?;
    let report = HealthReport::from_registry(&registry);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
