//! Quote source interface

use crate::errors::Result;
use crate::types::RawQuote;
use async_trait::async_trait;

/// Anything that can produce one price observation on demand
///
/// Futures are `!Send`: sources run on the single-threaded monoio runtime.
#[async_trait(?Send)]
pub trait QuoteSource {
    /// Short source name for logs
    fn name(&self) -> &'static str;

    /// Fetch a fresh quote
    async fn fetch_quote(&self) -> Result<RawQuote>;
}
