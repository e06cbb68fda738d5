//! Environment variable helpers for source configuration
//!
//! Callers load `.env` with `dotenv` first; these only read the process
//! environment.

use crate::errors::{ExchangeError, Result};
use std::str::FromStr;

/// Shared request timeout override
pub const ENV_TIMEOUT_MS: &str = "FXDESK_TIMEOUT_MS";

/// Value of `name`, `None` when unset or blank
pub fn var_nonempty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Value of `name` or `default` when unset or blank
pub fn var_or(name: &str, default: &str) -> String {
    var_nonempty(name).unwrap_or_else(|| default.to_string())
}

/// Parse `name`, falling back to `default` when unset. A value that is set
/// but unparsable is a configuration error, never silently replaced.
pub fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match var_nonempty(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ExchangeError::ConfigurationError(format!("{name}={raw} is not a valid value"))),
    }
}
