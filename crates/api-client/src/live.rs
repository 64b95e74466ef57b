use std::collections::BTreeMap;

use async_trait::async_trait;
use configuration::Settings;
use core_types::OrderRequest;
use serde_json::Value;

use crate::auth::sign_request;
use crate::error::ApiError;
use crate::responses::{ApiErrorResponse, OrderAck, OrderResponse};
use crate::ExchangeClient;

const BASE_URL: &str = "https://fapi.binance.com";

/// A concrete implementation of the `ExchangeClient` for the Binance
/// USDT-M futures API.
#[derive(Clone)]
pub struct BinanceClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: String,
}

impl BinanceClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
            api_key: settings.api_key.clone(),
            api_secret: settings.api_secret.clone(),
        }
    }

    async fn post_signed(
        &self,
        path: &str,
        params: &mut BTreeMap<&'static str, String>,
    ) -> Result<String, ApiError> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        params.insert("timestamp", timestamp.to_string());

        let query_string =
            serde_qs::to_string(params).map_err(|e| ApiError::Encoding(e.to_string()))?;
        let signature = sign_request(&self.api_secret, &query_string);

        let url = format!(
            "{}{}?{}&signature={}",
            self.base_url, path, query_string, signature
        );

        let response = self
            .client
            .post(&url)
            .header("X-MBX-APIKEY", &self.api_key)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            Ok(text)
        } else {
            let api_error: ApiErrorResponse = serde_json::from_str(&text).map_err(|e| {
                ApiError::Deserialization(format!(
                    "Failed to deserialize error response: {}. Original text: {}",
                    e, text
                ))
            })?;
            Err(ApiError::Exchange {
                code: api_error.code,
                message: api_error.msg,
            })
        }
    }
}

/// Flattens an order into the query parameters of `POST /fapi/v1/order`.
/// Optional fields are omitted entirely rather than sent empty.
fn order_params(order: &OrderRequest) -> BTreeMap<&'static str, String> {
    let mut params = BTreeMap::new();
    params.insert("symbol", order.symbol.clone());
    params.insert("side", order.side.as_str().to_string());
    params.insert("type", order.order_type.as_str().to_string());
    params.insert("quantity", order.quantity.to_string());
    if let Some(price) = order.price {
        params.insert("price", price.to_string());
    }
    if let Some(stop_price) = order.stop_price {
        params.insert("stopPrice", stop_price.to_string());
    }
    if let Some(tif) = order.time_in_force {
        params.insert("timeInForce", tif.as_str().to_string());
    }
    if order.reduce_only {
        params.insert("reduceOnly", "true".to_string());
    }
    if let Some(working_type) = order.working_type {
        params.insert("workingType", working_type.as_str().to_string());
    }
    if let Some(ref client_order_id) = order.client_order_id {
        params.insert("newClientOrderId", client_order_id.clone());
    }
    params
}

#[async_trait]
impl ExchangeClient for BinanceClient {
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck, ApiError> {
        let mut params = order_params(order);
        let text = self.post_signed("/fapi/v1/order", &mut params).await?;

        let raw: Value = serde_json::from_str(&text)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        let response: OrderResponse = serde_json::from_value(raw.clone())
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;

        Ok(OrderAck {
            order_id: response.order_id.to_string(),
            status: response.status,
            raw,
        })
    }

    fn is_dry_run(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{OrderSide, TimeInForce, WorkingType};
    use rust_decimal_macros::dec;

    #[test]
    fn market_order_params_carry_only_required_fields() {
        let order = OrderRequest::market("BTCUSDT", OrderSide::Buy, dec!(0.01));
        let params = order_params(&order);

        assert_eq!(params.get("symbol"), Some(&"BTCUSDT".to_string()));
        assert_eq!(params.get("side"), Some(&"BUY".to_string()));
        assert_eq!(params.get("type"), Some(&"MARKET".to_string()));
        assert_eq!(params.get("quantity"), Some(&"0.01".to_string()));
        assert!(!params.contains_key("price"));
        assert!(!params.contains_key("stopPrice"));
        assert!(!params.contains_key("reduceOnly"));
        assert!(!params.contains_key("timeInForce"));
    }

    #[test]
    fn stop_limit_params_include_trigger_and_protections() {
        let order = OrderRequest::stop("ETHUSDT", OrderSide::Sell, dec!(0.5), dec!(2450), dec!(2500))
            .with_time_in_force(TimeInForce::Gtc)
            .with_working_type(WorkingType::ContractPrice)
            .with_reduce_only()
            .with_client_order_id("OCO-1a2b3c4d-SL");
        let params = order_params(&order);

        assert_eq!(params.get("type"), Some(&"STOP".to_string()));
        assert_eq!(params.get("price"), Some(&"2450".to_string()));
        assert_eq!(params.get("stopPrice"), Some(&"2500".to_string()));
        assert_eq!(params.get("timeInForce"), Some(&"GTC".to_string()));
        assert_eq!(params.get("reduceOnly"), Some(&"true".to_string()));
        assert_eq!(params.get("workingType"), Some(&"CONTRACT_PRICE".to_string()));
        assert_eq!(params.get("newClientOrderId"), Some(&"OCO-1a2b3c4d-SL".to_string()));
    }
}
