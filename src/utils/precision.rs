// src/utils/precision.rs
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a quantity DOWN to a multiple of `increment`, expressed with the
/// increment's decimal places. Never rounds up: the result is always <= amount.
/// Returns `None` when `amount / increment` does not fit in a `Decimal`.
/// Example: amount=0.04999, increment=0.001 -> 0.049
pub fn quantize_down(amount: Decimal, increment: Decimal) -> Option<Decimal> {
    let increment = increment.normalize();
    if increment <= Decimal::ZERO || amount <= Decimal::ZERO {
        return Some(Decimal::ZERO.round_dp(increment.scale()));
    }
    // (amount / increment).floor() * increment
    let steps = amount.checked_div(increment)?.floor();
    let quantized = steps.checked_mul(increment)?;
    Some(quantized.round_dp_with_strategy(increment.scale(), RoundingStrategy::ToZero))
}

/// Rounds to `decimals` places, half-to-even.
/// Used for values that are compared or reported, never for authorized spend.
pub fn round_to_places(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointNearestEven)
}
