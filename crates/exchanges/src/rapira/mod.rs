//! Rapira USDT/RUB bid, the secondary quote source

pub mod rates;

use crate::errors::{ExchangeError, Result};
use crate::http::{HttpTransport, MonoioHttpsClient, DEFAULT_TIMEOUT_MS};
use crate::traits::QuoteSource;
use crate::types::{FetchMode, RawQuote, Venue};

use async_trait::async_trait;
use fxdesk_core::prelude::*;
use std::time::Duration;
use tracing::info;

pub use rates::parse_bid;

pub const DEFAULT_RATES_URL: &str = "https://api.rapira.net/open/market/rates";
pub const USDT_RUB: &str = "USDT/RUB";

pub const ENV_RATES_URL: &str = "RAPIRA_URL";

/// Rapira source configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RapiraConfig {
    pub rates_url: String,
    pub symbol: String,
    pub timeout_ms: u64,
}

impl Default for RapiraConfig {
    fn default() -> Self {
        Self {
            rates_url: DEFAULT_RATES_URL.to_string(),
            symbol: USDT_RUB.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl RapiraConfig {
    /// Defaults overridden by `RAPIRA_URL` and `FXDESK_TIMEOUT_MS`
    pub fn from_env() -> Result<Self> {
        let config = Self {
            rates_url: crate::env::var_or(ENV_RATES_URL, DEFAULT_RATES_URL),
            symbol: USDT_RUB.to_string(),
            timeout_ms: crate::env::parse_var(crate::env::ENV_TIMEOUT_MS, DEFAULT_TIMEOUT_MS)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// URL must parse and the timeout must be non-zero
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.rates_url)?;
        if self.timeout_ms == 0 {
            return Err(ExchangeError::ConfigurationError("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }

    pub fn with_rates_url(mut self, url: impl Into<String>) -> Self {
        self.rates_url = url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Secondary quote source client
pub struct RapiraClient<T: HttpTransport = MonoioHttpsClient> {
    config: RapiraConfig,
    transport: T,
}

impl RapiraClient<MonoioHttpsClient> {
    pub fn new(config: RapiraConfig) -> Self {
        let transport = MonoioHttpsClient::with_timeout(Duration::from_millis(config.timeout_ms));
        Self::with_transport(config, transport)
    }
}

impl<T: HttpTransport> RapiraClient<T> {
    pub fn with_transport(config: RapiraConfig, transport: T) -> Self {
        info!("🔗 Rapira client created: {}", config.rates_url);
        Self { config, transport }
    }

    pub fn config(&self) -> &RapiraConfig {
        &self.config
    }

    /// RUB per USDT bid price
    pub async fn fetch_bid(&self) -> Result<Fixed> {
        let _timer = PerfTimer::start("rapira_rates");
        let body = self.transport.get_success(&self.config.rates_url, &[]).await?;
        parse_bid(&body, &self.config.symbol)
    }
}

#[async_trait(?Send)]
impl<T: HttpTransport> QuoteSource for RapiraClient<T> {
    fn name(&self) -> &'static str {
        "rapira"
    }

    async fn fetch_quote(&self) -> Result<RawQuote> {
        let price = self.fetch_bid().await?;
        let quote = RawQuote::new(price, Venue::Rapira, self.config.symbol.clone(), FetchMode::Public);
        fxdesk_core::log_quote!(quote.venue, quote.pair, quote.price);
        Ok(quote)
    }
}
