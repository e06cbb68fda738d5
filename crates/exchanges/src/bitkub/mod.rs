//! Bitkub THB/USDT ticker, the primary quote source
//!
//! The public ticker is tried first. If Bitkub rejects it (or it fails in any
//! other way) the request is re-issued signed, provided credentials were
//! configured. The last price is the THB paid per USDT.

pub mod auth;
pub mod strategy;
pub mod ticker;

use crate::errors::{ExchangeError, Result};
use crate::http::{HttpTransport, MonoioHttpsClient, DEFAULT_TIMEOUT_MS};
use crate::traits::QuoteSource;
use crate::types::{FetchMode, RawQuote, Venue};

use async_trait::async_trait;
use fxdesk_core::prelude::*;
use std::time::Duration;
use tracing::info;

pub use auth::{BitkubCredentials, BitkubSigner, SignedHeaders};
pub use strategy::{PublicTicker, SignedTicker, StrategyChain, TickerStrategy};

pub const DEFAULT_TICKER_URL: &str = "https://api.bitkub.com/api/market/ticker?sym=THB_USDT";
pub const DEFAULT_SERVER_TIME_URL: &str = "https://api.bitkub.com/api/servertime";
pub const THB_USDT: &str = "THB_USDT";

pub const ENV_TICKER_URL: &str = "BITKUB_TICKER_URL";
pub const ENV_SERVER_TIME_URL: &str = "BITKUB_SERVER_TIME_URL";

/// Bitkub source configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BitkubConfig {
    pub ticker_url: String,
    pub server_time_url: String,
    /// Top-level key of the ticker response
    pub pair_key: String,
    pub credentials: Option<BitkubCredentials>,
    pub timeout_ms: u64,
}

impl Default for BitkubConfig {
    fn default() -> Self {
        Self {
            ticker_url: DEFAULT_TICKER_URL.to_string(),
            server_time_url: DEFAULT_SERVER_TIME_URL.to_string(),
            pair_key: THB_USDT.to_string(),
            credentials: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl BitkubConfig {
    /// Defaults overridden by `BITKUB_*` and `FXDESK_TIMEOUT_MS`
    pub fn from_env() -> Result<Self> {
        let config = Self {
            ticker_url: crate::env::var_or(ENV_TICKER_URL, DEFAULT_TICKER_URL),
            server_time_url: crate::env::var_or(ENV_SERVER_TIME_URL, DEFAULT_SERVER_TIME_URL),
            pair_key: THB_USDT.to_string(),
            credentials: BitkubCredentials::from_env(),
            timeout_ms: crate::env::parse_var(crate::env::ENV_TIMEOUT_MS, DEFAULT_TIMEOUT_MS)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// An empty key or secret leaves the config without credentials
    pub fn with_credentials(mut self, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        self.credentials = Some(BitkubCredentials::new(api_key, api_secret)).filter(BitkubCredentials::is_valid);
        self
    }

    pub fn with_ticker_url(mut self, url: impl Into<String>) -> Self {
        self.ticker_url = url.into();
        self
    }

    pub fn with_server_time_url(mut self, url: impl Into<String>) -> Self {
        self.server_time_url = url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// URLs must parse and the timeout must be non-zero
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.ticker_url)?;
        url::Url::parse(&self.server_time_url)?;
        if self.timeout_ms == 0 {
            return Err(ExchangeError::ConfigurationError("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// Primary quote source client
pub struct BitkubClient<T: HttpTransport = MonoioHttpsClient> {
    config: BitkubConfig,
    transport: T,
    chain: StrategyChain,
}

impl BitkubClient<MonoioHttpsClient> {
    /// Client over HTTPS with the configured timeout
    pub fn new(config: BitkubConfig) -> Result<Self> {
        let transport = MonoioHttpsClient::with_timeout(Duration::from_millis(config.timeout_ms));
        Self::with_transport(config, transport)
    }
}

impl<T: HttpTransport> BitkubClient<T> {
    pub fn with_transport(config: BitkubConfig, transport: T) -> Result<Self> {
        config.validate()?;
        let chain = StrategyChain::for_config(&config)?;

        info!("🔗 Bitkub client created");
        info!("   Ticker: {}", config.ticker_url);
        info!(
            "   Signed fallback: {}",
            config.credentials.as_ref().is_some_and(BitkubCredentials::is_valid)
        );

        Ok(Self {
            config,
            transport,
            chain,
        })
    }

    pub fn config(&self) -> &BitkubConfig {
        &self.config
    }

    /// THB per USDT last price and how it was obtained
    pub async fn fetch_last(&self) -> Result<(Fixed, FetchMode)> {
        self.chain.run(&self.transport, &self.config).await
    }
}

#[async_trait(?Send)]
impl<T: HttpTransport> QuoteSource for BitkubClient<T> {
    fn name(&self) -> &'static str {
        "bitkub"
    }

    async fn fetch_quote(&self) -> Result<RawQuote> {
        let (price, mode) = self.fetch_last().await?;
        let quote = RawQuote::new(price, Venue::Bitkub, self.config.pair_key.clone(), mode);
        fxdesk_core::log_quote!(quote.venue, quote.pair, quote.price);
        Ok(quote)
    }
}
