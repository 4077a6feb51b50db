// src/core/summary.rs
//! Human-readable one-liners used as log output and notification subjects.
use crate::types::{MarketConstraints, ScalingDecision, SizedOrder, TradeRequest};
use rust_decimal::Decimal;

fn dynamic_prefix(decision: &ScalingDecision) -> String {
    format!(
        "Dynamic DCA: {:.2}% ({}x): ",
        decision.percent_change, decision.steps
    )
}

/// `Dynamic DCA: -12.00% (2x): ETHBTC buy order of 0.006 (0.002) BTC CANCELED`
pub fn cancellation_summary(request: &TradeRequest, decision: &ScalingDecision) -> String {
    format!(
        "{}{} {} order of {} ({}) {} CANCELED",
        dynamic_prefix(decision),
        request.market_name,
        request.side,
        decision.scaled_amount.normalize(),
        decision.original_amount.normalize(),
        request.amount_currency
    )
}

/// Summary of a submitted (or simulated) order. `scaling` is only passed when
/// the dynamic adjustment actually applied.
pub fn execution_summary(
    request: &TradeRequest,
    scaling: Option<&ScalingDecision>,
    status: &str,
    price: Decimal,
    quote_currency: &str,
) -> String {
    match scaling {
        Some(decision) => format!(
            "{}{} {} order of {} ({}) {} {} @ {} {}",
            dynamic_prefix(decision),
            request.market_name,
            request.side,
            decision.scaled_amount.normalize(),
            decision.original_amount.normalize(),
            request.amount_currency,
            status,
            price.normalize(),
            quote_currency
        ),
        None => format!(
            "{} {} order of {} {} {} @ {} {}",
            request.market_name,
            request.side,
            request.amount.normalize(),
            request.amount_currency,
            status,
            price.normalize(),
            quote_currency
        ),
    }
}

/// Diagnostic for an order below MIN_NOTIONAL.
pub fn below_minimum_message(
    order: &SizedOrder,
    price: Decimal,
    constraints: &MarketConstraints,
) -> String {
    format!(
        "Cannot purchase {} {} @ {} {}. Resulting order of {:.8} {} is below the minNotional value of {} {}",
        order.base_quantity.normalize(),
        constraints.base_currency,
        price.normalize(),
        constraints.quote_currency,
        order.notional_value,
        constraints.quote_currency,
        constraints.min_notional.normalize(),
        constraints.quote_currency
    )
}
