//! # FxDesk Quote Sources
//!
//! Spot quotes for the rate desk.
//!
//! ## Architecture
//!
//! - **monoio-based HTTPS client** - Single-threaded async, every request under a timeout
//! - **Bitkub** - THB/USDT last price, public ticker with a signed fallback
//! - **Rapira** - USDT/RUB bid price
//! - **Unified interface** - every source is a [`QuoteSource`] producing a [`RawQuote`]

#[cfg(feature = "bitkub")]
pub mod bitkub;
#[cfg(feature = "rapira")]
pub mod rapira;

pub mod env;
pub mod errors;
pub mod http;
pub mod traits;
pub mod types;

#[cfg(feature = "bitkub")]
pub use bitkub::{BitkubClient, BitkubConfig, BitkubCredentials};
#[cfg(feature = "rapira")]
pub use rapira::{RapiraClient, RapiraConfig};
pub use errors::{ErrorClass, ExchangeError, Result};
pub use http::{HttpResponse, HttpTransport, MonoioHttpsClient};
pub use traits::QuoteSource;
pub use types::*;

/// Prelude for convenient imports
pub mod prelude {
    #[cfg(feature = "bitkub")]
    pub use crate::bitkub::{BitkubClient, BitkubConfig, BitkubCredentials};
    #[cfg(feature = "rapira")]
    pub use crate::rapira::{RapiraClient, RapiraConfig};
    pub use crate::errors::{ErrorClass, ExchangeError, Result};
    pub use crate::http::{HttpResponse, HttpTransport, MonoioHttpsClient};
    pub use crate::traits::QuoteSource;
    pub use crate::types::*;
    pub use fxdesk_core::prelude::*;
}
