//! Rate engine errors

use fxdesk_core::FixedError;
use fxdesk_exchanges::ExchangeError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RateError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RateError {
    /// Margin drives the effective rate to zero or below
    #[error("Invalid margin: {0}")]
    InvalidMargin(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A source quote that cannot be priced from
    #[error("Invalid quote: {0}")]
    InvalidQuote(String),

    #[error(transparent)]
    Source(#[from] ExchangeError),

    #[error("Numeric error: {0}")]
    Numeric(#[from] FixedError),
}

impl RateError {
    /// Failures that abort a refresh cycle rather than a single query
    pub fn is_cycle_fatal(&self) -> bool {
        matches!(self, Self::Source(_) | Self::InvalidQuote(_) | Self::Numeric(_))
    }
}
