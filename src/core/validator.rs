// src/core/validator.rs
use crate::error::{DcaError, DcaResult};
use crate::types::{MarketConstraints, SizedOrder};
use crate::utils::precision::round_to_places;
use rust_decimal::Decimal;

/// Prices the order at `price` and checks it against the market minimum.
/// The notional is computed whether or not the order passes.
pub fn validate_order(
    base_quantity: Decimal,
    price: Decimal,
    constraints: &MarketConstraints,
) -> DcaResult<SizedOrder> {
    let notional = base_quantity.checked_mul(price).ok_or_else(|| {
        DcaError::Overflow(format!(
            "pricing {base_quantity} {} at {price}",
            constraints.base_currency
        ))
    })?;
    let notional_value = round_to_places(notional, constraints.quote_asset_precision);
    Ok(SizedOrder {
        base_quantity,
        notional_value,
        accepted: notional_value >= constraints.min_notional,
    })
}
