// src/core/converter.rs
use crate::error::{DcaError, DcaResult};
use crate::types::{CurrencyRole, MarketConstraints};
use crate::utils::precision::quantize_down;
use rust_decimal::Decimal;

/// Converts the user's amount into a base-asset quantity on the lot grid.
/// Quote-denominated amounts are divided by the execution price first.
pub fn to_base_quantity(
    amount: Decimal,
    role: CurrencyRole,
    constraints: &MarketConstraints,
    price: Decimal,
) -> DcaResult<Decimal> {
    let overflow = || {
        DcaError::Overflow(format!(
            "converting {amount} to {} at {price}",
            constraints.base_currency
        ))
    };
    let raw = match role {
        CurrencyRole::Base => amount,
        CurrencyRole::Quote if price > Decimal::ZERO => {
            amount.checked_div(price).ok_or_else(overflow)?
        }
        CurrencyRole::Quote => Decimal::ZERO,
    };
    quantize_down(raw, constraints.base_increment).ok_or_else(overflow)
}
