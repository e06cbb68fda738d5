//! Rapira market rates payload

use crate::errors::{ExchangeError, Result};
use fxdesk_core::Fixed;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct RapiraRates {
    #[serde(default)]
    data: Option<Vec<RapiraRate>>,
}

/// One traded pair; other pairs may omit fields this one needs
#[derive(Debug, Deserialize)]
struct RapiraRate {
    #[serde(default)]
    symbol: Option<String>,
    /// Number or numeric string
    #[serde(rename = "bidPrice", default)]
    bid_price: Option<Value>,
}

/// Bid price of `symbol` from a rates response
///
/// ```json
/// {"data": [{"symbol": "USDT/RUB", "bidPrice": 79.5, "askPrice": 79.9}, ...]}
/// ```
///
/// The first matching entry wins. A missing or null `data` is an empty list.
pub fn parse_bid(body: &str, symbol: &str) -> Result<Fixed> {
    let rates: RapiraRates = serde_json::from_str(body)
        .map_err(|e| ExchangeError::ParseError(format!("Rapira rates: {e}")))?;

    let entry = rates
        .data
        .unwrap_or_default()
        .into_iter()
        .find(|rate| rate.symbol.as_deref() == Some(symbol))
        .ok_or_else(|| ExchangeError::SymbolNotFound(format!("{symbol} not in Rapira rates")))?;

    let bid = entry
        .bid_price
        .ok_or_else(|| ExchangeError::ParseError(format!("Rapira {symbol} entry has no bidPrice")))?;

    let price = Fixed::from_json(&bid)?;
    if !price.is_positive() {
        return Err(ExchangeError::ParseError(format!("Rapira {symbol} bid {price} is not positive")));
    }
    Ok(price)
}
