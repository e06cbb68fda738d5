//! Computed-rates export
//!
//! A flat JSON object of numbers: every [`DerivedRateSet`] field, the two
//! margin-adjusted headline rates and the two margin percents.

use crate::computer::{DerivedRateSet, DERIVED_DP};
use crate::config::MarginPolicy;
use crate::error::Result;
use fxdesk_core::Fixed;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateExport {
    #[serde(with = "rust_decimal::serde::float")]
    pub usd_rub_base: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub usd_rub_plus_3_5: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub usd_rub_plus_4: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub usd_rub_plus_5: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub usd_rub_plus_6: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub usd_rub_plus_7: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub thb_usd: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub thb_usd_2_5: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub thb_usd_2_75: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub thb_usd_3: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub conversion_rate_base: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub conversion_rate_plus_3_5: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub conversion_rate_plus_4: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub conversion_rate_plus_5: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub conversion_rate_plus_6: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub conversion_rate_plus_7: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,

    /// THB per USDT after the USDT margin
    #[serde(with = "rust_decimal::serde::float")]
    pub usdt_thb_with_margin: Decimal,
    /// RUB per THB after the RUB margin
    #[serde(with = "rust_decimal::serde::float")]
    pub rub_thb_with_margin: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub usdt_margin_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub rub_margin_percent: Decimal,
}

impl RateExport {
    pub fn new(rates: &DerivedRateSet, margins: &MarginPolicy) -> Result<Self> {
        let usdt_thb_with_margin = rates
            .thb_usd()
            .checked_mul(Fixed::discount_factor(margins.usdt_margin))?
            .round_dp(DERIVED_DP);
        let rub_thb_with_margin = rates
            .usd_rub_base()
            .checked_mul(Fixed::markup_factor(margins.rub_margin))?
            .checked_div(rates.thb_usd())?
            .round_dp(DERIVED_DP);

        Ok(Self {
            usd_rub_base: rates.usd_rub_base.to_decimal(),
            usd_rub_plus_3_5: rates.usd_rub_plus_3_5.to_decimal(),
            usd_rub_plus_4: rates.usd_rub_plus_4.to_decimal(),
            usd_rub_plus_5: rates.usd_rub_plus_5.to_decimal(),
            usd_rub_plus_6: rates.usd_rub_plus_6.to_decimal(),
            usd_rub_plus_7: rates.usd_rub_plus_7.to_decimal(),
            thb_usd: rates.thb_usd.to_decimal(),
            thb_usd_2_5: rates.thb_usd_2_5.to_decimal(),
            thb_usd_2_75: rates.thb_usd_2_75.to_decimal(),
            thb_usd_3: rates.thb_usd_3.to_decimal(),
            conversion_rate_base: rates.conversion_rate_base.to_decimal(),
            conversion_rate_plus_3_5: rates.conversion_rate_plus_3_5.to_decimal(),
            conversion_rate_plus_4: rates.conversion_rate_plus_4.to_decimal(),
            conversion_rate_plus_5: rates.conversion_rate_plus_5.to_decimal(),
            conversion_rate_plus_6: rates.conversion_rate_plus_6.to_decimal(),
            conversion_rate_plus_7: rates.conversion_rate_plus_7.to_decimal(),
            rate: rates.rate.to_decimal(),
            usdt_thb_with_margin: usdt_thb_with_margin.to_decimal(),
            rub_thb_with_margin: rub_thb_with_margin.to_decimal(),
            usdt_margin_percent: margins.usdt_margin.to_decimal(),
            rub_margin_percent: margins.rub_margin.to_decimal(),
        })
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| fxdesk_exchanges::ExchangeError::from(e).into())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| fxdesk_exchanges::ExchangeError::from(e).into())
    }
}
