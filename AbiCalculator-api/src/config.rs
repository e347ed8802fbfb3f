//! Runtime configuration read from the environment.

use std::time::Duration;

use abi_calculator_domain::orchestrator::DEFAULT_CALCULATION_DELAY;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port the HTTP server listens on (`PORT`)
    pub port: u16,

    /// Deployment environment reported by the health check (`APP_ENV`)
    pub environment: String,

    /// Processing pause before results are published (`ABI_CALCULATION_DELAY_MS`)
    pub calculation_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            environment: DEFAULT_ENVIRONMENT.to_string(),
            calculation_delay: DEFAULT_CALCULATION_DELAY,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => parse_number::<u16>("PORT", value)?,
            None => defaults.port,
        };

        let calculation_delay = match lookup("ABI_CALCULATION_DELAY_MS") {
            Some(value) => Duration::from_millis(parse_number::<u64>("ABI_CALCULATION_DELAY_MS", value)?),
            None => defaults.calculation_delay,
        };

        Ok(Self {
            port,
            environment: lookup("APP_ENV").unwrap_or(defaults.environment),
            calculation_delay,
        })
    }

    /// Configuration with no processing pause
    pub fn without_delay() -> Self {
        Self {
            calculation_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidNumber { name, value })
}
