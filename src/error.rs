// src/error.rs
use rust_decimal::Decimal;
use thiserror::Error;

/// Failures talking to the exchange.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Binance returned `{"code": .., "msg": ..}` with a non-2xx status.
    #[error("exchange rejected request (HTTP {status}, code {code}): {msg}")]
    Api { status: u16, code: i64, msg: String },

    #[error("failed to decode exchange response: {0}")]
    Decode(String),

    #[error("failed to sign request: {0}")]
    Signing(String),
}

/// Everything that terminates a run.
#[derive(Debug, Error)]
pub enum DcaError {
    #[error("market {0} not found in exchange info")]
    UnknownMarket(String),

    #[error("{filter} not found in {symbol} info")]
    MissingFilter { symbol: String, filter: &'static str },

    #[error("amount_currency {currency} not in market {market}")]
    CurrencyNotInMarket { currency: String, market: String },

    #[error("invalid amount {amount} {currency}: must be positive")]
    InvalidAmount { amount: Decimal, currency: String },

    #[error("arithmetic overflow {0}")]
    Overflow(String),

    #[error("unexpected {what} for {symbol}: {detail}")]
    MalformedResponse {
        what: &'static str,
        symbol: String,
        detail: String,
    },

    #[error("unable to place {market} {side} order for {quantity} {base}: {reason}")]
    Execution {
        market: String,
        side: String,
        quantity: Decimal,
        base: String,
        reason: String,
    },

    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

pub type DcaResult<T> = Result<T, DcaError>;
