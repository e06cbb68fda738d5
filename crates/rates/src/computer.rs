//! Derived rate computation
//!
//! Two raw quotes in, one immutable [`DerivedRateSet`] out. Base quotes are
//! rounded to 2 dp, every derived field to 3 dp, half away from zero.
//! Conversion rates divide the unrounded stepped USD/RUB value by the 2 dp
//! THB/USD base.

use crate::error::{RateError, Result};
use fxdesk_core::Fixed;
use serde::Serialize;
use tracing::debug;

/// Acquisition cost baked into the secondary quote
pub const SECONDARY_UPLIFT: Fixed = Fixed::from_decimal(rust_decimal::Decimal::from_parts(104, 0, 0, false, 2));

pub const BASE_DP: u32 = 2;
pub const DERIVED_DP: u32 = 3;

/// RUB-leg markup steps, in percent
pub const RUB_STEPS: [MarginStep; 5] = [
    MarginStep::Plus3_5,
    MarginStep::Plus4,
    MarginStep::Plus5,
    MarginStep::Plus6,
    MarginStep::Plus7,
];

/// THB-leg discount steps, in percent
pub const THB_STEPS: [ThbDiscount; 3] = [ThbDiscount::Minus2_5, ThbDiscount::Minus2_75, ThbDiscount::Minus3];

/// Markup tier on the RUB leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarginStep {
    Plus3_5,
    Plus4,
    Plus5,
    Plus6,
    Plus7,
}

impl MarginStep {
    /// Margin in percent
    pub fn percent(self) -> Fixed {
        match self {
            MarginStep::Plus3_5 => Fixed::new(35, 1),
            MarginStep::Plus4 => Fixed::from_i64(4),
            MarginStep::Plus5 => Fixed::from_i64(5),
            MarginStep::Plus6 => Fixed::from_i64(6),
            MarginStep::Plus7 => Fixed::from_i64(7),
        }
    }

    /// `1 + percent / 100`
    pub fn multiplier(self) -> Fixed {
        Fixed::markup_factor(self.percent())
    }
}

/// Discount tier on the THB leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThbDiscount {
    Minus2_5,
    Minus2_75,
    Minus3,
}

impl ThbDiscount {
    pub fn percent(self) -> Fixed {
        match self {
            ThbDiscount::Minus2_5 => Fixed::new(25, 1),
            ThbDiscount::Minus2_75 => Fixed::new(275, 2),
            ThbDiscount::Minus3 => Fixed::from_i64(3),
        }
    }

    /// `1 - percent / 100`
    pub fn multiplier(self) -> Fixed {
        Fixed::discount_factor(self.percent())
    }
}

/// Snapshot of base and margin-stepped rates from one pair of quotes
///
/// Only [`RateComputer::compute`] builds one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRateSet {
    pub(crate) usd_rub_base: Fixed,
    pub(crate) usd_rub_plus_3_5: Fixed,
    pub(crate) usd_rub_plus_4: Fixed,
    pub(crate) usd_rub_plus_5: Fixed,
    pub(crate) usd_rub_plus_6: Fixed,
    pub(crate) usd_rub_plus_7: Fixed,

    pub(crate) thb_usd: Fixed,
    pub(crate) thb_usd_2_5: Fixed,
    pub(crate) thb_usd_2_75: Fixed,
    pub(crate) thb_usd_3: Fixed,

    pub(crate) conversion_rate_base: Fixed,
    pub(crate) conversion_rate_plus_3_5: Fixed,
    pub(crate) conversion_rate_plus_4: Fixed,
    pub(crate) conversion_rate_plus_5: Fixed,
    pub(crate) conversion_rate_plus_6: Fixed,
    pub(crate) conversion_rate_plus_7: Fixed,

    pub(crate) rate: Fixed,
}

impl DerivedRateSet {
    /// RUB per USDT after the uplift, 2 dp
    pub fn usd_rub_base(&self) -> Fixed {
        self.usd_rub_base
    }

    /// THB per USDT, 2 dp
    pub fn thb_usd(&self) -> Fixed {
        self.thb_usd
    }

    /// RUB per THB without margin
    pub fn conversion_rate_base(&self) -> Fixed {
        self.conversion_rate_base
    }

    /// Headline RUB per THB rate, the +3.5% tier
    pub fn rate(&self) -> Fixed {
        self.rate
    }

    pub fn usd_rub_plus(&self, step: MarginStep) -> Fixed {
        match step {
            MarginStep::Plus3_5 => self.usd_rub_plus_3_5,
            MarginStep::Plus4 => self.usd_rub_plus_4,
            MarginStep::Plus5 => self.usd_rub_plus_5,
            MarginStep::Plus6 => self.usd_rub_plus_6,
            MarginStep::Plus7 => self.usd_rub_plus_7,
        }
    }

    pub fn conversion_rate_plus(&self, step: MarginStep) -> Fixed {
        match step {
            MarginStep::Plus3_5 => self.conversion_rate_plus_3_5,
            MarginStep::Plus4 => self.conversion_rate_plus_4,
            MarginStep::Plus5 => self.conversion_rate_plus_5,
            MarginStep::Plus6 => self.conversion_rate_plus_6,
            MarginStep::Plus7 => self.conversion_rate_plus_7,
        }
    }

    pub fn thb_usd_minus(&self, step: ThbDiscount) -> Fixed {
        match step {
            ThbDiscount::Minus2_5 => self.thb_usd_2_5,
            ThbDiscount::Minus2_75 => self.thb_usd_2_75,
            ThbDiscount::Minus3 => self.thb_usd_3,
        }
    }

    /// Every field by its published name
    pub fn fields(&self) -> [(&'static str, Fixed); 17] {
        [
            ("usd_rub_base", self.usd_rub_base),
            ("usd_rub_plus_3_5", self.usd_rub_plus_3_5),
            ("usd_rub_plus_4", self.usd_rub_plus_4),
            ("usd_rub_plus_5", self.usd_rub_plus_5),
            ("usd_rub_plus_6", self.usd_rub_plus_6),
            ("usd_rub_plus_7", self.usd_rub_plus_7),
            ("thb_usd", self.thb_usd),
            ("thb_usd_2_5", self.thb_usd_2_5),
            ("thb_usd_2_75", self.thb_usd_2_75),
            ("thb_usd_3", self.thb_usd_3),
            ("conversion_rate_base", self.conversion_rate_base),
            ("conversion_rate_plus_3_5", self.conversion_rate_plus_3_5),
            ("conversion_rate_plus_4", self.conversion_rate_plus_4),
            ("conversion_rate_plus_5", self.conversion_rate_plus_5),
            ("conversion_rate_plus_6", self.conversion_rate_plus_6),
            ("conversion_rate_plus_7", self.conversion_rate_plus_7),
            ("rate", self.rate),
        ]
    }
}

/// Pure rate computation with an optional primary price adjustment
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateComputer {
    primary_offset: Fixed,
}

impl RateComputer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constant subtracted from the primary price before it is rounded
    pub fn with_primary_offset(mut self, offset: Fixed) -> Self {
        self.primary_offset = offset;
        self
    }

    /// `secondary` is RUB per USDT, `primary` is THB per USDT
    pub fn compute(&self, secondary: Fixed, primary: Fixed) -> Result<DerivedRateSet> {
        if !secondary.is_positive() {
            return Err(RateError::InvalidQuote(format!("secondary price {secondary} is not positive")));
        }

        let thb_usd = (primary - self.primary_offset).round_dp(BASE_DP);
        if !thb_usd.is_positive() {
            return Err(RateError::InvalidQuote(format!(
                "primary price {primary} less offset {} rounds to {thb_usd}",
                self.primary_offset
            )));
        }

        let usd_rub_base = secondary.checked_mul(SECONDARY_UPLIFT)?.round_dp(BASE_DP);
        let stepped = |step: MarginStep| usd_rub_base.checked_mul(step.multiplier());
        let conversion = |usd_rub: Fixed| usd_rub.checked_div(thb_usd).map(|r| r.round_dp(DERIVED_DP));
        let discounted = |step: ThbDiscount| thb_usd.checked_mul(step.multiplier()).map(|r| r.round_dp(DERIVED_DP));

        let plus_3_5 = stepped(MarginStep::Plus3_5)?;
        let plus_4 = stepped(MarginStep::Plus4)?;
        let plus_5 = stepped(MarginStep::Plus5)?;
        let plus_6 = stepped(MarginStep::Plus6)?;
        let plus_7 = stepped(MarginStep::Plus7)?;

        let conversion_rate_plus_3_5 = conversion(plus_3_5)?;

        let rates = DerivedRateSet {
            usd_rub_base,
            usd_rub_plus_3_5: plus_3_5.round_dp(DERIVED_DP),
            usd_rub_plus_4: plus_4.round_dp(DERIVED_DP),
            usd_rub_plus_5: plus_5.round_dp(DERIVED_DP),
            usd_rub_plus_6: plus_6.round_dp(DERIVED_DP),
            usd_rub_plus_7: plus_7.round_dp(DERIVED_DP),

            thb_usd,
            thb_usd_2_5: discounted(ThbDiscount::Minus2_5)?,
            thb_usd_2_75: discounted(ThbDiscount::Minus2_75)?,
            thb_usd_3: discounted(ThbDiscount::Minus3)?,

            conversion_rate_base: conversion(usd_rub_base)?,
            conversion_rate_plus_3_5,
            conversion_rate_plus_4: conversion(plus_4)?,
            conversion_rate_plus_5: conversion(plus_5)?,
            conversion_rate_plus_6: conversion(plus_6)?,
            conversion_rate_plus_7: conversion(plus_7)?,

            rate: conversion_rate_plus_3_5,
        };

        debug!(
            "📐 Rates computed: usd_rub_base={} thb_usd={} rate={}",
            rates.usd_rub_base, rates.thb_usd, rates.rate
        );
        Ok(rates)
    }
}

/// [`RateComputer::compute`] without a primary adjustment
pub fn compute(secondary: Fixed, primary: Fixed) -> Result<DerivedRateSet> {
    RateComputer::new().compute(secondary, primary)
}
