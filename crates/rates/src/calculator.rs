//! Four-way conversion calculator
//!
//! | Direction   | Client hands over | Result        | Rounding |
//! |-------------|-------------------|---------------|----------|
//! | `UsdtToThb` | USDT              | THB delivered | floor    |
//! | `ThbToUsdt` | THB wanted        | USDT owed     | ceiling  |
//! | `RubToThb`  | RUB               | THB delivered | floor    |
//! | `ThbToRub`  | THB wanted        | RUB owed      | ceiling  |
//!
//! The USDT legs discount THB per USDT by the margin, the RUB legs mark up
//! RUB per USDT by it. Divisions are performed last so an exact quotient
//! never picks up an error from a pre-rounded rate.
//!
//! Two inputs are refused so that a wanted THB amount, settled and converted
//! back, returns exactly that amount:
//!
//! - a wanted THB amount finer than the THB settlement precision
//!   ([`RateError::InvalidAmount`])
//! - a rate at which one settlement unit of USDT or RUB is worth more than one
//!   THB settlement unit ([`RateError::InvalidQuote`] when the quotes alone do
//!   it, [`RateError::InvalidMargin`] when the margin does)

use crate::computer::DerivedRateSet;
use crate::error::{RateError, Result};
use crate::rounding::{round_client_favoring, round_operator_favoring, Flow};
use fxdesk_core::Fixed;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    Usdt,
    Thb,
    Rub,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Usdt => "USDT",
            Currency::Thb => "THB",
            Currency::Rub => "RUB",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    UsdtToThb,
    ThbToUsdt,
    RubToThb,
    ThbToRub,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::UsdtToThb,
        Direction::ThbToUsdt,
        Direction::RubToThb,
        Direction::ThbToRub,
    ];

    /// Currency of the query amount
    pub fn input(self) -> Currency {
        match self {
            Direction::UsdtToThb => Currency::Usdt,
            Direction::RubToThb => Currency::Rub,
            Direction::ThbToUsdt | Direction::ThbToRub => Currency::Thb,
        }
    }

    /// Currency of the computed amount
    pub fn output(self) -> Currency {
        match self {
            Direction::UsdtToThb | Direction::RubToThb => Currency::Thb,
            Direction::ThbToUsdt => Currency::Usdt,
            Direction::ThbToRub => Currency::Rub,
        }
    }

    pub fn flow(self) -> Flow {
        match self {
            Direction::UsdtToThb | Direction::RubToThb => Flow::PaidByOperator,
            Direction::ThbToUsdt | Direction::ThbToRub => Flow::OwedToOperator,
        }
    }

    /// USDT legs use the discounted THB rate
    pub fn is_usdt_leg(self) -> bool {
        matches!(self, Direction::UsdtToThb | Direction::ThbToUsdt)
    }

    /// The currency traded against THB
    pub fn counter_currency(self) -> Currency {
        if self.is_usdt_leg() { Currency::Usdt } else { Currency::Rub }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.input(), self.output())
    }
}

/// Decimal places each currency settles at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPrecision {
    pub usdt: u32,
    pub thb: u32,
    pub rub: u32,
}

impl Default for SettlementPrecision {
    fn default() -> Self {
        Self { usdt: 2, thb: 0, rub: 0 }
    }
}

impl SettlementPrecision {
    pub fn for_currency(&self, currency: Currency) -> u32 {
        match currency {
            Currency::Usdt => self.usdt,
            Currency::Thb => self.thb,
            Currency::Rub => self.rub,
        }
    }

    /// Smallest settled amount of `currency`, `0.01` at 2 dp
    pub fn unit(&self, currency: Currency) -> Fixed {
        Fixed::new(1, self.for_currency(currency))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionQuery {
    pub direction: Direction,
    pub amount: Fixed,
    pub margin_percent: Fixed,
}

impl ConversionQuery {
    pub fn new(direction: Direction, amount: Fixed, margin_percent: Fixed) -> Self {
        Self {
            direction,
            amount,
            margin_percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub direction: Direction,
    pub input: Fixed,
    /// Settled amount, operator-favoring
    pub amount: Fixed,
    /// Before settlement rounding
    pub exact: Fixed,
    /// What the client would settle at with the rounding reversed
    pub client_favoring: Fixed,
    /// THB per USDT on the USDT legs, RUB per THB on the RUB legs
    pub effective_rate: Fixed,
    pub margin_percent: Fixed,
}

impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} {} @ {}",
            self.input,
            self.direction.input(),
            self.amount,
            self.direction.output(),
            self.effective_rate.round_dp(5)
        )
    }
}

/// Conversion calculator at a fixed settlement precision
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConversionCalculator {
    precision: SettlementPrecision,
}

impl ConversionCalculator {
    pub fn new(precision: SettlementPrecision) -> Self {
        Self { precision }
    }

    pub fn convert(&self, rates: &DerivedRateSet, query: &ConversionQuery) -> Result<ConversionResult> {
        self.validate_amount(query)?;

        let (exact, effective_rate) = match query.direction {
            Direction::UsdtToThb | Direction::ThbToUsdt => {
                let per_usdt = thb_per_usdt(rates, query.margin_percent)?;
                self.check_resolution(query, (rates.thb_usd(), Fixed::ONE), (per_usdt, Fixed::ONE))?;
                let exact = if query.direction == Direction::UsdtToThb {
                    query.amount.checked_mul(per_usdt)?
                } else {
                    query.amount.checked_div(per_usdt)?
                };
                (exact, per_usdt)
            }
            Direction::RubToThb | Direction::ThbToRub => {
                let rub_per_usdt = marked_up_rub_per_usdt(rates, query.margin_percent)?;
                self.check_resolution(
                    query,
                    (rates.thb_usd(), rates.usd_rub_base()),
                    (rates.thb_usd(), rub_per_usdt),
                )?;
                let exact = if query.direction == Direction::RubToThb {
                    query.amount.checked_mul(rates.thb_usd())?.checked_div(rub_per_usdt)?
                } else {
                    query.amount.checked_mul(rub_per_usdt)?.checked_div(rates.thb_usd())?
                };
                (exact, rub_per_usdt.checked_div(rates.thb_usd())?)
            }
        };

        let dp = self.precision.for_currency(query.direction.output());
        let flow = query.direction.flow();
        let result = ConversionResult {
            direction: query.direction,
            input: query.amount,
            amount: round_operator_favoring(exact, dp, flow),
            exact,
            client_favoring: round_client_favoring(exact, dp, flow),
            effective_rate,
            margin_percent: query.margin_percent,
        };

        fxdesk_core::log_conversion!(result.direction, result.input, result.amount, result.effective_rate.round_dp(5));
        Ok(result)
    }

    /// THB delivered for `usdt` given
    pub fn thb_for_usdt(&self, rates: &DerivedRateSet, margin_percent: Fixed, usdt: Fixed) -> Result<Fixed> {
        self.settle(rates, Direction::UsdtToThb, margin_percent, usdt)
    }

    /// USDT owed for `thb` wanted
    pub fn usdt_for_thb(&self, rates: &DerivedRateSet, margin_percent: Fixed, thb: Fixed) -> Result<Fixed> {
        self.settle(rates, Direction::ThbToUsdt, margin_percent, thb)
    }

    /// THB delivered for `rub` given
    pub fn thb_for_rub(&self, rates: &DerivedRateSet, margin_percent: Fixed, rub: Fixed) -> Result<Fixed> {
        self.settle(rates, Direction::RubToThb, margin_percent, rub)
    }

    /// RUB owed for `thb` wanted
    pub fn rub_for_thb(&self, rates: &DerivedRateSet, margin_percent: Fixed, thb: Fixed) -> Result<Fixed> {
        self.settle(rates, Direction::ThbToRub, margin_percent, thb)
    }

    fn settle(&self, rates: &DerivedRateSet, direction: Direction, margin_percent: Fixed, amount: Fixed) -> Result<Fixed> {
        let query = ConversionQuery::new(direction, amount, margin_percent);
        Ok(self.convert(rates, &query)?.amount)
    }

    /// Non-negative, and a wanted THB amount must be deliverable as asked
    fn validate_amount(&self, query: &ConversionQuery) -> Result<()> {
        let amount = query.amount;
        if amount.is_negative() {
            return Err(RateError::InvalidAmount(format!("amount {amount} is negative")));
        }
        if query.direction.input() == Currency::Thb {
            let dp = self.precision.thb;
            if amount.floor_dp(dp) != amount {
                return Err(RateError::InvalidAmount(format!(
                    "{amount} THB is finer than the {dp} dp THB settlement precision"
                )));
            }
        }
        Ok(())
    }

    /// One settlement unit of the counter currency must be worth at most one
    /// THB settlement unit. Each rate is given as `(THB per USDT, counter
    /// currency per USDT)`, first as quoted and then with the margin applied.
    fn check_resolution(
        &self,
        query: &ConversionQuery,
        quoted: (Fixed, Fixed),
        margined: (Fixed, Fixed),
    ) -> Result<()> {
        let counter = query.direction.counter_currency();
        let counter_unit = self.precision.unit(counter);
        let thb_unit = self.precision.unit(Currency::Thb);
        let too_coarse = |(thb_per_usdt, counter_per_usdt): (Fixed, Fixed)| -> Result<bool> {
            Ok(counter_unit.checked_mul(thb_per_usdt)? > thb_unit.checked_mul(counter_per_usdt)?)
        };

        if too_coarse(quoted)? {
            return Err(RateError::InvalidQuote(format!(
                "{counter_unit} {counter} is worth more than {thb_unit} THB at the quoted rates"
            )));
        }
        if too_coarse(margined)? {
            return Err(RateError::InvalidMargin(format!(
                "{}% makes {counter_unit} {counter} worth more than {thb_unit} THB",
                query.margin_percent
            )));
        }
        Ok(())
    }
}

/// `thb_usd * (1 - margin / 100)`, must stay positive
fn thb_per_usdt(rates: &DerivedRateSet, margin_percent: Fixed) -> Result<Fixed> {
    let factor = Fixed::discount_factor(margin_percent);
    if !factor.is_positive() {
        return Err(RateError::InvalidMargin(format!(
            "{margin_percent}% leaves no THB per USDT, must be below 100"
        )));
    }
    Ok(rates.thb_usd().checked_mul(factor)?)
}

/// `usd_rub_base * (1 + margin / 100)`, must stay positive
fn marked_up_rub_per_usdt(rates: &DerivedRateSet, margin_percent: Fixed) -> Result<Fixed> {
    let factor = Fixed::markup_factor(margin_percent);
    if !factor.is_positive() {
        return Err(RateError::InvalidMargin(format!(
            "{margin_percent}% leaves no RUB per USDT, must be above -100"
        )));
    }
    Ok(rates.usd_rub_base().checked_mul(factor)?)
}
