//! Runtime configuration from the environment (`.env` honored).

use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILTER: &str = "loan_schedule=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the calculation backend, without a trailing slash.
    pub base_url: String,
    pub timeout: Duration,
    /// `tracing` filter directive.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let base_url = lookup("LOAN_API_BASE_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match lookup("LOAN_API_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| AppError::input(format!("Invalid LOAN_API_TIMEOUT_SECS '{raw}'.")))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let log_filter = lookup("LOAN_LOG")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let config = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
            log_filter,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(AppError::input(format!(
                "LOAN_API_BASE_URL must start with http:// or https:// (got '{}').",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(AppError::input("LOAN_API_TIMEOUT_SECS must be greater than 0."));
        }
        Ok(())
    }
}
