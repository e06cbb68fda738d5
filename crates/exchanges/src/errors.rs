//! Quote source error types
//!
//! Every failure a fetch can produce, plus a coarse [`ErrorClass`] that the
//! primary source's strategy chain and the refresh cycle use to decide what
//! is recoverable.

use thiserror::Error;

/// Result type for exchange operations
pub type Result<T> = std::result::Result<T, ExchangeError>;

/// Quote source errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangeError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP error {0}: {1}")]
    HttpError(u16, String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Signing error: {0}")]
    SigningError(String),

    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),
}

/// Coarse error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Timeout, connection failure, non-2xx status
    Network,
    /// Malformed or unexpected payload
    Parse,
    /// Pair missing from the payload
    SymbolNotFound,
    /// Missing credentials, bad URLs, bad signing keys
    Configuration,
    /// Every strategy for a source failed
    SourceUnavailable,
}

impl ExchangeError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NetworkError(_) | Self::HttpError(..) | Self::Timeout(_) => ErrorClass::Network,
            Self::ParseError(_) => ErrorClass::Parse,
            Self::SymbolNotFound(_) => ErrorClass::SymbolNotFound,
            Self::InvalidUrl(_) | Self::ConfigurationError(_) | Self::SigningError(_) => {
                ErrorClass::Configuration
            }
            Self::SourceUnavailable(_) => ErrorClass::SourceUnavailable,
        }
    }

    /// Network failures can be retried or routed to a fallback
    pub fn is_network(&self) -> bool {
        self.class() == ErrorClass::Network
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<url::ParseError> for ExchangeError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<fxdesk_core::FixedError> for ExchangeError {
    fn from(err: fxdesk_core::FixedError) -> Self {
        Self::ParseError(err.to_string())
    }
}
