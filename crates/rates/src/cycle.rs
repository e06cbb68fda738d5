//! Refresh cycle
//!
//! Primary quote, then secondary quote, then computation. Any failure ends
//! the cycle with that error and nothing is published.

use crate::calculator::{ConversionCalculator, ConversionQuery, ConversionResult};
use crate::computer::{DerivedRateSet, RateComputer};
use crate::config::{DeskConfig, MarginPolicy};
use crate::error::Result;
use crate::export::RateExport;
use fxdesk_core::{CycleId, PerfTimer, Timestamp};
use fxdesk_exchanges::{BitkubClient, QuoteSource, RapiraClient, RawQuote};
use serde::Serialize;
use tracing::info;

/// Published result of one refresh cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSnapshot {
    pub cycle_id: CycleId,
    /// THB per USDT
    pub primary: RawQuote,
    /// RUB per USDT
    pub secondary: RawQuote,
    pub rates: DerivedRateSet,
    pub computed_at: Timestamp,
}

impl RateSnapshot {
    pub fn export(&self, margins: &MarginPolicy) -> Result<RateExport> {
        RateExport::new(&self.rates, margins)
    }
}

/// Quote sources, computation and conversion settings for a desk
pub struct RateDesk<P: QuoteSource, S: QuoteSource> {
    primary: P,
    secondary: S,
    computer: RateComputer,
    calculator: ConversionCalculator,
    margins: MarginPolicy,
}

impl RateDesk<BitkubClient, RapiraClient> {
    /// Desk over the live exchanges
    pub fn from_config(config: &DeskConfig) -> Result<Self> {
        config.validate()?;
        let primary = BitkubClient::new(config.bitkub.clone())?;
        let secondary = RapiraClient::new(config.rapira.clone());
        Ok(Self::new(primary, secondary, config))
    }
}

impl<P: QuoteSource, S: QuoteSource> RateDesk<P, S> {
    pub fn new(primary: P, secondary: S, config: &DeskConfig) -> Self {
        Self {
            primary,
            secondary,
            computer: RateComputer::new().with_primary_offset(config.primary_offset),
            calculator: ConversionCalculator::new(config.precision),
            margins: config.margins,
        }
    }

    pub fn margins(&self) -> &MarginPolicy {
        &self.margins
    }

    /// Fetch both quotes and compute a fresh snapshot
    pub async fn refresh(&self) -> Result<RateSnapshot> {
        let cycle_id = CycleId::new();
        let _timer = PerfTimer::start(format!("refresh_cycle {cycle_id}"));
        info!("🔄 Refresh cycle {} started", cycle_id);

        match self.run_cycle(cycle_id.clone()).await {
            Ok(snapshot) => {
                info!(
                    "✅ Refresh cycle {} done: usd_rub_base={} thb_usd={} rate={}",
                    cycle_id,
                    snapshot.rates.usd_rub_base(),
                    snapshot.rates.thb_usd(),
                    snapshot.rates.rate()
                );
                Ok(snapshot)
            }
            Err(e) => {
                fxdesk_core::log_error!(format!("refresh cycle {cycle_id}"), e);
                Err(e)
            }
        }
    }

    async fn run_cycle(&self, cycle_id: CycleId) -> Result<RateSnapshot> {
        let primary = self.primary.fetch_quote().await?;
        let secondary = self.secondary.fetch_quote().await?;
        let rates = self.computer.compute(secondary.price, primary.price)?;

        Ok(RateSnapshot {
            cycle_id,
            primary,
            secondary,
            rates,
            computed_at: Timestamp::now(),
        })
    }

    /// Answer a query against a snapshot
    pub fn convert(&self, snapshot: &RateSnapshot, query: &ConversionQuery) -> Result<ConversionResult> {
        self.calculator.convert(&snapshot.rates, query)
    }

    pub fn export(&self, snapshot: &RateSnapshot) -> Result<RateExport> {
        snapshot.export(&self.margins)
    }
}
