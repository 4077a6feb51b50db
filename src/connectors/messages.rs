// src/connectors/messages.rs
//! REST payloads from https://api.binance.com/api/v3/*.
//! Only the fields the bot reads are mapped; serde ignores the rest.
use rust_decimal::Decimal;
use serde::Deserialize;

/// GET /api/v3/exchangeInfo
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeInfo {
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub base_asset: String,
    pub quote_asset: String,
    pub quote_asset_precision: u32,
    #[serde(default)]
    pub filters: Vec<SymbolFilter>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "filterType")]
pub enum SymbolFilter {
    #[serde(rename = "PRICE_FILTER")]
    Price {
        #[serde(rename = "tickSize")]
        tick_size: Decimal,
    },
    #[serde(rename = "LOT_SIZE")]
    LotSize {
        #[serde(rename = "stepSize")]
        step_size: Decimal,
    },
    #[serde(rename = "MIN_NOTIONAL")]
    MinNotional {
        #[serde(rename = "minNotional")]
        min_notional: Decimal,
    },
    /// Successor of MIN_NOTIONAL on most spot markets.
    #[serde(rename = "NOTIONAL")]
    Notional {
        #[serde(rename = "minNotional")]
        min_notional: Decimal,
    },
    #[serde(other)]
    Other,
}

/// GET /api/v3/depth. Levels are `[price, qty]` string pairs.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderBookDepth {
    pub bids: Vec<(Decimal, Decimal)>,
    pub asks: Vec<(Decimal, Decimal)>,
}

/// GET /api/v3/ticker/24hr
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24h {
    pub symbol: String,
    pub price_change_percent: Decimal,
}

/// POST /api/v3/order (FULL response type)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub symbol: String,
    pub order_id: u64,
    #[serde(default)]
    pub client_order_id: String,
    pub status: String,
    #[serde(default)]
    pub fills: Vec<OrderFill>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFill {
    pub price: Decimal,
    pub qty: Decimal,
    #[serde(default)]
    pub commission: Option<Decimal>,
    #[serde(default)]
    pub commission_asset: Option<String>,
}

/// Error body Binance attaches to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_symbol_filters_and_skips_unknown_ones() {
        let json = r#"{
            "symbols": [{
                "symbol": "ETHBTC",
                "status": "TRADING",
                "baseAsset": "ETH",
                "quoteAsset": "BTC",
                "quoteAssetPrecision": 8,
                "filters": [
                    {"filterType": "PRICE_FILTER", "minPrice": "0.00000100", "maxPrice": "100000.00000000", "tickSize": "0.00000100"},
                    {"filterType": "PERCENT_PRICE", "multiplierUp": "5", "multiplierDown": "0.2", "avgPriceMins": 5},
                    {"filterType": "LOT_SIZE", "minQty": "0.00100000", "maxQty": "100000.00000000", "stepSize": "0.00100000"},
                    {"filterType": "MIN_NOTIONAL", "minNotional": "0.00010000", "applyToMarket": true, "avgPriceMins": 5},
                    {"filterType": "MAX_NUM_ORDERS", "maxNumOrders": 200}
                ]
            }]
        }"#;

        let info: ExchangeInfo = serde_json::from_str(json).unwrap();
        let eth = &info.symbols[0];
        assert_eq!(eth.base_asset, "ETH");
        assert_eq!(eth.quote_asset_precision, 8);
        assert_eq!(eth.filters.len(), 5);
        assert_eq!(
            eth.filters[2],
            SymbolFilter::LotSize {
                step_size: dec!(0.001)
            }
        );
        assert_eq!(eth.filters[4], SymbolFilter::Other);
    }

    #[test]
    fn parses_order_ack_with_fills() {
        let json = r#"{
            "symbol": "ADABTC",
            "orderId": 194439891,
            "orderListId": -1,
            "clientOrderId": "jfsd09eijfsdkl",
            "transactTime": 1596984553336,
            "price": "0.00000000",
            "origQty": "10.00000000",
            "executedQty": "10.00000000",
            "cummulativeQuoteQty": "0.00012380",
            "status": "FILLED",
            "type": "MARKET",
            "side": "SELL",
            "fills": [
                {"price": "0.00001238", "qty": "10.00000000", "commission": "0.00004701", "commissionAsset": "BNB", "tradeId": 40016638}
            ]
        }"#;

        let ack: OrderAck = serde_json::from_str(json).unwrap();
        assert_eq!(ack.status, "FILLED");
        assert_eq!(ack.fills[0].price, dec!(0.00001238));
        assert_eq!(ack.fills[0].commission_asset.as_deref(), Some("BNB"));
    }

    #[test]
    fn parses_depth_levels() {
        let json = r#"{"lastUpdateId": 1027024, "bids": [["4.00000000", "431.00000000"]], "asks": [["4.00000200", "12.00000000"]]}"#;
        let depth: OrderBookDepth = serde_json::from_str(json).unwrap();
        assert_eq!(depth.bids[0].0, dec!(4));
        assert_eq!(depth.asks[0], (dec!(4.000002), dec!(12)));
    }
}
