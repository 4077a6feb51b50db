// src/types.rs
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Wire representation expected by the exchange.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    /// Summaries render the side in lower case ("buy"/"sell").
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_lowercase())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            other => Err(format!("invalid side '{}', expected BUY or SELL", other)),
        }
    }
}

/// Per-market limits the sizing engine needs. Built once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketConstraints {
    pub symbol: String,
    pub base_currency: String,
    pub quote_currency: String,
    pub quote_asset_precision: u32,
    /// LOT_SIZE step size
    pub base_increment: Decimal,
    /// PRICE_FILTER tick size
    pub quote_increment: Decimal,
    pub min_notional: Decimal,
}

/// Which side of the market the user's amount is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyRole {
    Base,
    Quote,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeRequest {
    pub market_name: String,
    pub side: Side,
    pub amount: Decimal,
    pub amount_currency: String,
    pub dynamic_dca: bool,
}

/// Top of book, taken once per run. Either side may be empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSnapshot {
    pub best_bid: Option<Decimal>,
    pub best_ask: Option<Decimal>,
}

impl PriceSnapshot {
    /// Bid for BUY, ask for SELL. `None` when that side of the book is empty.
    pub fn execution_price(&self, side: Side) -> Option<Decimal> {
        match side {
            Side::Buy => self.best_bid,
            Side::Sell => self.best_ask,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalingDecision {
    pub percent_change: Decimal,
    pub steps: u32,
    pub scaled_amount: Decimal,
    pub original_amount: Decimal,
    /// False when the move was smaller than one step; the run then reports as a plain trade.
    pub applied: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SizedOrder {
    pub base_quantity: Decimal,
    pub notional_value: Decimal,
    pub accepted: bool,
}

/// What the exchange reported for a submitted order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub status: String,
    pub fill_price: Decimal,
    pub raw: serde_json::Value,
}

/// Final state of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Test order accepted by the exchange; nothing traded.
    Simulated { order: SizedOrder, summary: String },
    /// Live market order executed.
    Filled {
        order: SizedOrder,
        execution: ExecutionResult,
        summary: String,
    },
    /// Notional below the market minimum; nothing submitted.
    Rejected {
        order: SizedOrder,
        /// Below-minimum diagnostic, in the market's quote currency.
        message: String,
        summary: Option<String>,
    },
    /// Operator did not confirm the live order.
    Declined,
}
