//! Desk configuration
//!
//! One immutable record built once at startup and passed into the refresh
//! cycle and the calculator. Values come from the process environment after
//! `.env` is loaded.

use crate::calculator::SettlementPrecision;
use crate::error::{RateError, Result};
use fxdesk_core::Fixed;
use fxdesk_exchanges::env::parse_var;
use fxdesk_exchanges::{BitkubConfig, RapiraConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const ENV_USDT_MARGIN: &str = "USDT_MARGIN";
pub const ENV_RUB_MARGIN: &str = "RUB_MARGIN";
pub const ENV_PRIMARY_OFFSET: &str = "FXDESK_PRIMARY_OFFSET";

/// Margins applied by the calculator and the export, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginPolicy {
    /// Discount on THB per USDT
    pub usdt_margin: Fixed,
    /// Markup on RUB per USDT
    pub rub_margin: Fixed,
}

impl Default for MarginPolicy {
    fn default() -> Self {
        Self {
            usdt_margin: Fixed::new(25, 1),
            rub_margin: Fixed::new(35, 1),
        }
    }
}

impl MarginPolicy {
    pub fn new(usdt_margin: Fixed, rub_margin: Fixed) -> Result<Self> {
        let policy = Self { usdt_margin, rub_margin };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<()> {
        if !Fixed::discount_factor(self.usdt_margin).is_positive() {
            return Err(RateError::InvalidMargin(format!(
                "USDT margin {}% must be below 100",
                self.usdt_margin
            )));
        }
        if !Fixed::markup_factor(self.rub_margin).is_positive() {
            return Err(RateError::InvalidMargin(format!(
                "RUB margin {}% must be above -100",
                self.rub_margin
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeskConfig {
    pub bitkub: BitkubConfig,
    pub rapira: RapiraConfig,
    pub margins: MarginPolicy,
    /// Subtracted from the primary price before rounding
    pub primary_offset: Fixed,
    pub precision: SettlementPrecision,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            bitkub: BitkubConfig::default(),
            rapira: RapiraConfig::default(),
            margins: MarginPolicy::default(),
            primary_offset: Fixed::ZERO,
            precision: SettlementPrecision::default(),
        }
    }
}

impl DeskConfig {
    /// Load `.env` if present, then read the environment
    pub fn load() -> Result<Self> {
        if dotenv::dotenv().is_ok() {
            info!("📄 Loaded .env");
        }
        Self::from_env()
    }

    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self> {
        let defaults = MarginPolicy::default();
        let config = Self {
            bitkub: BitkubConfig::from_env()?,
            rapira: RapiraConfig::from_env()?,
            margins: MarginPolicy::new(
                parse_var(ENV_USDT_MARGIN, defaults.usdt_margin)?,
                parse_var(ENV_RUB_MARGIN, defaults.rub_margin)?,
            )?,
            primary_offset: parse_var(ENV_PRIMARY_OFFSET, Fixed::ZERO)?,
            precision: SettlementPrecision::default(),
        };

        info!("⚙️  Desk configuration loaded");
        info!("   USDT margin: {}%", config.margins.usdt_margin);
        info!("   RUB margin: {}%", config.margins.rub_margin);
        info!("   Signed fallback: {}", config.bitkub.credentials.is_some());
        Ok(config)
    }

    pub fn with_credentials(mut self, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        self.bitkub = self.bitkub.with_credentials(api_key, api_secret);
        self
    }

    pub fn with_margins(mut self, margins: MarginPolicy) -> Self {
        self.margins = margins;
        self
    }

    pub fn with_primary_offset(mut self, offset: Fixed) -> Self {
        self.primary_offset = offset;
        self
    }

    pub fn with_precision(mut self, precision: SettlementPrecision) -> Self {
        self.precision = precision;
        self
    }

    /// Applies to both sources
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.bitkub.timeout_ms = timeout_ms;
        self.rapira.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout_ms(&self) -> u64 {
        self.bitkub.timeout_ms
    }

    pub fn validate(&self) -> Result<()> {
        self.bitkub.validate()?;
        self.rapira.validate()?;
        self.margins.validate()
    }
}
