use serde::Deserialize;
use serde_json::Value;

// Using `#[serde(rename_all = "camelCase")]` to automatically map from JSON camelCase to Rust snake_case.

/// The response from a successful `POST /fapi/v1/order` request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: i64,
    pub client_order_id: String,
    pub status: String,
    pub symbol: String,
    // There are more fields, but these are the most important for us.
}

/// Represents an error response from the Binance API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub code: i32,
    pub msg: String,
}

/// The exchange's acknowledgement of an accepted order, normalized across
/// the live and simulated clients. `raw` carries the full response body for
/// callers that need fields beyond the id and status.
#[derive(Debug, Clone)]
pub struct OrderAck {
    pub order_id: String,
    pub status: String,
    pub raw: Value,
}
