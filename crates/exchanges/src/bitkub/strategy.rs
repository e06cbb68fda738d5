//! Ticker fetch strategies for the primary source
//!
//! The ticker is tried as an ordered chain: the public endpoint first, then
//! the HMAC-signed variant. Each strategy returns a price or a typed failure
//! and the chain moves on to the next one, there is no other retry.

use super::BitkubConfig;
use super::auth::{BitkubCredentials, BitkubSigner};
use super::ticker::{parse_last, parse_server_time};
use crate::errors::{ExchangeError, Result};
use crate::http::{path_and_query, HttpTransport};
use crate::types::FetchMode;

use async_trait::async_trait;
use fxdesk_core::{Fixed, PerfTimer};
use tracing::{debug, warn};

/// One way of reading the THB/USDT last price
#[async_trait(?Send)]
pub trait TickerStrategy {
    fn name(&self) -> &'static str;

    fn mode(&self) -> FetchMode;

    async fn fetch_last(&self, transport: &dyn HttpTransport, config: &BitkubConfig) -> Result<Fixed>;
}

/// Unauthenticated GET of the ticker endpoint
pub struct PublicTicker;

#[async_trait(?Send)]
impl TickerStrategy for PublicTicker {
    fn name(&self) -> &'static str {
        "public"
    }

    fn mode(&self) -> FetchMode {
        FetchMode::Public
    }

    async fn fetch_last(&self, transport: &dyn HttpTransport, config: &BitkubConfig) -> Result<Fixed> {
        let body = transport.get_success(&config.ticker_url, &[]).await?;
        parse_last(&body, &config.pair_key)
    }
}

/// Server-time-stamped, HMAC-signed GET of the ticker endpoint
///
/// Without credentials it fails with a configuration error before touching
/// the network. An empty key or secret counts as no credentials.
pub struct SignedTicker {
    signer: Option<BitkubSigner>,
}

impl SignedTicker {
    pub fn new(credentials: Option<BitkubCredentials>) -> Result<Self> {
        let signer = credentials
            .filter(BitkubCredentials::is_valid)
            .map(BitkubSigner::new)
            .transpose()?;
        Ok(Self { signer })
    }

    async fn fetch_signed(
        &self,
        signer: &BitkubSigner,
        transport: &dyn HttpTransport,
        config: &BitkubConfig,
    ) -> Result<Fixed> {
        let timestamp = parse_server_time(&transport.get_success(&config.server_time_url, &[]).await?)?;

        let ticker_url = url::Url::parse(&config.ticker_url)?;
        let headers = signer.signed_headers(&timestamp, "GET", &path_and_query(&ticker_url))?;
        debug!("🔐 Signed ticker request at server time {}", timestamp);

        let body = transport.get_success(&config.ticker_url, &headers.as_pairs()).await?;
        parse_last(&body, &config.pair_key)
    }
}

#[async_trait(?Send)]
impl TickerStrategy for SignedTicker {
    fn name(&self) -> &'static str {
        "signed"
    }

    fn mode(&self) -> FetchMode {
        FetchMode::Signed
    }

    async fn fetch_last(&self, transport: &dyn HttpTransport, config: &BitkubConfig) -> Result<Fixed> {
        let signer = self.signer.as_ref().ok_or_else(|| {
            ExchangeError::ConfigurationError(
                "signed request required but no credentials provided (set BITKUB_API_KEY and BITKUB_API_SECRET)"
                    .to_string(),
            )
        })?;

        self.fetch_signed(signer, transport, config)
            .await
            .map_err(|e| ExchangeError::SourceUnavailable(format!("Bitkub signed ticker failed: {e}")))
    }
}

/// Ordered list of strategies, first success wins
pub struct StrategyChain {
    strategies: Vec<Box<dyn TickerStrategy>>,
}

impl StrategyChain {
    pub fn new(strategies: Vec<Box<dyn TickerStrategy>>) -> Self {
        Self { strategies }
    }

    /// Public first, then signed with whatever credentials the config has
    pub fn for_config(config: &BitkubConfig) -> Result<Self> {
        Ok(Self::new(vec![
            Box::new(PublicTicker),
            Box::new(SignedTicker::new(config.credentials.clone())?),
        ]))
    }

    /// Run the chain; the error of the last strategy is returned when all fail
    pub async fn run(&self, transport: &dyn HttpTransport, config: &BitkubConfig) -> Result<(Fixed, FetchMode)> {
        let mut last_error = None;

        for (idx, strategy) in self.strategies.iter().enumerate() {
            let _timer = PerfTimer::start(format!("bitkub_ticker_{}", strategy.name()));

            match strategy.fetch_last(transport, config).await {
                Ok(price) => return Ok((price, strategy.mode())),
                Err(e) => {
                    if idx + 1 < self.strategies.len() {
                        warn!("⚠️  Bitkub {} ticker failed, falling back: {}", strategy.name(), e);
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ExchangeError::ConfigurationError("Bitkub strategy chain is empty".to_string())
        }))
    }
}
