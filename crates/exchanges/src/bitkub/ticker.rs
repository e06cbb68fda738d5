//! Bitkub ticker and server time payloads

use crate::errors::{ExchangeError, Result};
use fxdesk_core::Fixed;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// One pair's entry of the ticker response, only `last` is read
#[derive(Debug, Deserialize)]
struct BitkubTicker {
    /// Number or numeric string
    last: Value,
}

/// Extract `<pair_key>.last` from a ticker response
///
/// ```json
/// {"THB_USDT": {"id": 1, "last": 32.1, "lowestAsk": 32.11, ...}}
/// ```
pub fn parse_last(body: &str, pair_key: &str) -> Result<Fixed> {
    let mut entries: HashMap<String, Value> = serde_json::from_str(body)
        .map_err(|e| ExchangeError::ParseError(format!("Bitkub ticker is not a JSON object: {e}")))?;

    // Bitkub reports failures as {"error": <code>} with a 200 status
    if let Some(code) = entries.get("error").and_then(Value::as_i64) {
        if code != 0 {
            return Err(ExchangeError::ParseError(format!("Bitkub returned error code {code}")));
        }
    }

    let entry = entries
        .remove(pair_key)
        .ok_or_else(|| ExchangeError::ParseError(format!("Bitkub ticker has no {pair_key} entry")))?;

    let ticker: BitkubTicker = serde_json::from_value(entry)
        .map_err(|e| ExchangeError::ParseError(format!("Bitkub {pair_key} ticker: {e}")))?;

    let price = Fixed::from_json(&ticker.last)?;
    if !price.is_positive() {
        return Err(ExchangeError::ParseError(format!("Bitkub {pair_key} last price {price} is not positive")));
    }
    Ok(price)
}

/// Server time as the verbatim string to sign with
pub fn parse_server_time(body: &str) -> Result<String> {
    let timestamp = body.trim();
    if timestamp.is_empty() {
        return Err(ExchangeError::ParseError("Bitkub server time is empty".to_string()));
    }
    Ok(timestamp.to_string())
}
