// src/connectors/binance.rs
use crate::config::ApiConfig;
use crate::connectors::messages::{ApiErrorBody, ExchangeInfo, OrderBookDepth, Ticker24h};
use crate::connectors::traits::ExchangeClient;
use crate::error::ExchangeError;
use crate::types::Side;
use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client, Method, Response};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use sha2::Sha256;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

type HmacSha256 = Hmac<Sha256>;

pub struct BinanceClient {
    api_key: String,
    secret_key: String,
    http_client: Client,
    base_rest_url: Url,
}

impl BinanceClient {
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            api_key: config.api_key.clone(),
            secret_key: config.secret_key.clone(),
            http_client,
            base_rest_url: Url::parse(&config.base_url)?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ExchangeError> {
        self.base_rest_url
            .join(path)
            .map_err(|e| ExchangeError::Decode(format!("bad endpoint {}: {}", path, e)))
    }

    fn sign_and_build_query(&self, params: Vec<(&str, String)>) -> Result<String, ExchangeError> {
        let mut params = params;
        let timestamp = Utc::now().timestamp_millis().to_string();
        params.push(("timestamp", timestamp));

        let query_string = serde_urlencoded::to_string(&params)
            .map_err(|e| ExchangeError::Signing(e.to_string()))?;

        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .map_err(|e| ExchangeError::Signing(format!("invalid secret key length: {}", e)))?;
        mac.update(query_string.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(format!("{}&signature={}", query_string, signature))
    }

    async fn send_public_request<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(&str, String)>,
    ) -> Result<T, ExchangeError> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut().extend_pairs(params.iter());
        debug!("GET {}", url);

        let response = self.http_client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn send_signed_request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: Vec<(&str, String)>,
    ) -> Result<T, ExchangeError> {
        let mut url = self.endpoint(path)?;
        url.set_query(Some(&self.sign_and_build_query(params)?));

        let response = self
            .http_client
            .request(method, url)
            .header("X-MBX-APIKEY", &self.api_key)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Maps Binance's `{code, msg}` error body onto [`ExchangeError::Api`].
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ExchangeError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(err) => ExchangeError::Api {
                    status: status.as_u16(),
                    code: err.code,
                    msg: err.msg,
                },
                Err(_) => ExchangeError::Api {
                    status: status.as_u16(),
                    code: -1,
                    msg: body,
                },
            });
        }

        serde_json::from_str(&body).map_err(|e| ExchangeError::Decode(e.to_string()))
    }

    fn market_order_params(
        symbol: &str,
        side: Side,
        quantity: Decimal,
        client_order_id: &str,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("symbol", symbol.to_string()),
            ("side", side.as_str().to_string()),
            ("type", "MARKET".to_string()),
            ("quantity", quantity.normalize().to_string()),
            ("newClientOrderId", client_order_id.to_string()),
            ("newOrderRespType", "FULL".to_string()),
        ]
    }
}

#[async_trait]
impl ExchangeClient for BinanceClient {
    async fn exchange_info(&self, symbol: &str) -> Result<ExchangeInfo, ExchangeError> {
        self.send_public_request("/api/v3/exchangeInfo", vec![("symbol", symbol.to_string())])
            .await
    }

    async fn order_book(&self, symbol: &str, limit: u16) -> Result<OrderBookDepth, ExchangeError> {
        self.send_public_request(
            "/api/v3/depth",
            vec![("symbol", symbol.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    async fn ticker_24h(&self, symbol: &str) -> Result<Ticker24h, ExchangeError> {
        self.send_public_request("/api/v3/ticker/24hr", vec![("symbol", symbol.to_string())])
            .await
    }

    async fn test_order(
        &self,
        symbol: &str,
        side: Side,
        quantity: Decimal,
        client_order_id: &str,
    ) -> Result<serde_json::Value, ExchangeError> {
        info!("🧪 Sending TEST Order: {} {} {}", side.as_str(), quantity, symbol);
        let params = Self::market_order_params(symbol, side, quantity, client_order_id);
        self.send_signed_request(Method::POST, "/api/v3/order/test", params)
            .await
    }

    async fn market_order(
        &self,
        symbol: &str,
        side: Side,
        quantity: Decimal,
        client_order_id: &str,
    ) -> Result<serde_json::Value, ExchangeError> {
        info!("🚀 Sending Order: {} {} {} MARKET", side.as_str(), quantity, symbol);
        let params = Self::market_order_params(symbol, side, quantity, client_order_id);
        self.send_signed_request(Method::POST, "/api/v3/order", params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn client() -> BinanceClient {
        BinanceClient::new(&ApiConfig {
            api_key: "key".to_string(),
            secret_key: "secret".to_string(),
            base_url: "https://api.binance.com".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn signed_query_appends_timestamp_and_hex_signature() {
        let query = client()
            .sign_and_build_query(vec![("symbol", "ETHBTC".to_string())])
            .unwrap();

        assert!(query.starts_with("symbol=ETHBTC&timestamp="));
        let (payload, signature) = query.split_once("&signature=").unwrap();
        assert_eq!(signature.len(), 64);

        let mut mac = HmacSha256::new_from_slice(b"secret").unwrap();
        mac.update(payload.as_bytes());
        assert_eq!(signature, hex::encode(mac.finalize().into_bytes()));
    }

    #[test]
    fn market_order_params_strip_trailing_zeros() {
        let params =
            BinanceClient::market_order_params("ETHBTC", Side::Sell, dec!(0.04000), "dca-1");
        assert!(params.contains(&("quantity", "0.04".to_string())));
        assert!(params.contains(&("side", "SELL".to_string())));
        assert!(params.contains(&("type", "MARKET".to_string())));
    }

    #[test]
    fn endpoints_join_onto_base_url() {
        let url = client().endpoint("/api/v3/depth").unwrap();
        assert_eq!(url.as_str(), "https://api.binance.com/api/v3/depth");
    }
}
