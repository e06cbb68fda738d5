//! Quote types shared by the sources

use fxdesk_core::prelude::*;

/// Exchange a quote came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    Bitkub,
    Rapira,
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Venue::Bitkub => write!(f, "bitkub"),
            Venue::Rapira => write!(f, "rapira"),
        }
    }
}

/// How a quote was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchMode {
    Public,
    Signed,
}

/// A single price observation
///
/// Created per fetch and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuote {
    pub price: Fixed,
    pub venue: Venue,
    /// Pair as the venue spells it, `THB_USDT` or `USDT/RUB`
    pub pair: String,
    pub mode: FetchMode,
    pub observed_at: Timestamp,
}

impl RawQuote {
    pub fn new(price: Fixed, venue: Venue, pair: impl Into<String>, mode: FetchMode) -> Self {
        Self {
            price,
            venue,
            pair: pair.into(),
            mode,
            observed_at: Timestamp::now(),
        }
    }

    /// Age of the observation in milliseconds
    pub fn age_ms(&self) -> u64 {
        self.observed_at.elapsed_millis()
    }
}

impl std::fmt::Display for RawQuote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} = {}", self.venue, self.pair, self.price)
    }
}
