//! Directional settlement rounding
//!
//! Amounts owed to the operator round up, amounts the operator pays out
//! round down. [`round_client_favoring`] is the mirror image and is only
//! reported alongside settled amounts so the rounding edge can be audited.

use fxdesk_core::Fixed;
use serde::{Deserialize, Serialize};

/// Which way money moves for the rounded amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flow {
    /// Client pays the operator
    OwedToOperator,
    /// Operator pays the client
    PaidByOperator,
}

impl Flow {
    pub fn reversed(self) -> Self {
        match self {
            Flow::OwedToOperator => Flow::PaidByOperator,
            Flow::PaidByOperator => Flow::OwedToOperator,
        }
    }
}

/// Ceiling when owed to the operator, floor when paid by the operator
pub fn round_operator_favoring(value: Fixed, dp: u32, flow: Flow) -> Fixed {
    match flow {
        Flow::OwedToOperator => value.ceil_dp(dp),
        Flow::PaidByOperator => value.floor_dp(dp),
    }
}

/// Floor when owed to the operator, ceiling when paid by the operator
pub fn round_client_favoring(value: Fixed, dp: u32, flow: Flow) -> Fixed {
    round_operator_favoring(value, dp, flow.reversed())
}
