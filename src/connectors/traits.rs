use crate::connectors::messages::{ExchangeInfo, OrderBookDepth, Ticker24h};
use crate::error::ExchangeError;
use crate::types::Side;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Market data and order entry needed for one DCA run.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    async fn exchange_info(&self, symbol: &str) -> Result<ExchangeInfo, ExchangeError>;

    async fn order_book(&self, symbol: &str, limit: u16) -> Result<OrderBookDepth, ExchangeError>;

    async fn ticker_24h(&self, symbol: &str) -> Result<Ticker24h, ExchangeError>;

    /// Validates a MARKET order without sending it to the matching engine.
    async fn test_order(
        &self,
        symbol: &str,
        side: Side,
        quantity: Decimal,
        client_order_id: &str,
    ) -> Result<serde_json::Value, ExchangeError>;

    /// Places a MARKET order and returns the raw FULL response.
    async fn market_order(
        &self,
        symbol: &str,
        side: Side,
        quantity: Decimal,
        client_order_id: &str,
    ) -> Result<serde_json::Value, ExchangeError>;
}
