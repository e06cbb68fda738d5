//! # FxDesk Rates
//!
//! Rate engine for the THB/USDT/RUB desk.
//!
//! - **RateComputer** - two raw quotes into an immutable [`DerivedRateSet`]
//! - **ConversionCalculator** - four directions, operator-favoring settlement rounding
//! - **Export** - flat JSON of the computed rates
//! - **RateDesk** - one refresh cycle: primary quote, secondary quote, compute

pub mod calculator;
pub mod computer;
pub mod config;
pub mod cycle;
pub mod error;
pub mod export;
pub mod rounding;

pub use calculator::{
    ConversionCalculator, ConversionQuery, ConversionResult, Currency, Direction, SettlementPrecision,
};
pub use computer::{compute, DerivedRateSet, MarginStep, RateComputer, ThbDiscount};
pub use config::{DeskConfig, MarginPolicy};
pub use cycle::{RateDesk, RateSnapshot};
pub use error::{RateError, Result};
pub use export::RateExport;
pub use rounding::{round_client_favoring, round_operator_favoring, Flow};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::calculator::{
        ConversionCalculator, ConversionQuery, ConversionResult, Currency, Direction, SettlementPrecision,
    };
    pub use crate::computer::{compute, DerivedRateSet, MarginStep, RateComputer, ThbDiscount};
    pub use crate::config::{DeskConfig, MarginPolicy};
    pub use crate::cycle::{RateDesk, RateSnapshot};
    pub use crate::error::{RateError, Result};
    pub use crate::export::RateExport;
    pub use crate::rounding::{round_client_favoring, round_operator_favoring, Flow};
}
