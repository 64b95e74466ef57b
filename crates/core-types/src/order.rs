use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{OrderSide, OrderType, TimeInForce, WorkingType};
use crate::error::CoreError;

fn is_false(value: &bool) -> bool {
    !*value
}

/// A single futures order as submitted to the exchange. Serializes to the
/// exchange's camelCase parameter names; unset fields are omitted entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub quantity: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub reduce_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_type: Option<WorkingType>,
    #[serde(rename = "newClientOrderId", skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
}

impl OrderRequest {
    fn base(symbol: impl Into<String>, side: OrderSide, order_type: OrderType, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type,
            quantity,
            price: None,
            stop_price: None,
            time_in_force: None,
            reduce_only: false,
            working_type: None,
            client_order_id: None,
        }
    }

    pub fn market(symbol: impl Into<String>, side: OrderSide, quantity: Decimal) -> Self {
        Self::base(symbol, side, OrderType::Market, quantity)
    }

    /// A GTC limit order.
    pub fn limit(symbol: impl Into<String>, side: OrderSide, quantity: Decimal, price: Decimal) -> Self {
        let mut order = Self::base(symbol, side, OrderType::Limit, quantity);
        order.price = Some(price);
        order.time_in_force = Some(TimeInForce::Gtc);
        order
    }

    /// A stop-limit order: `STOP` with a limit price and a trigger price.
    pub fn stop(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        limit_price: Decimal,
        stop_price: Decimal,
    ) -> Self {
        let mut order = Self::base(symbol, side, OrderType::Stop, quantity);
        order.price = Some(limit_price);
        order.stop_price = Some(stop_price);
        order
    }

    /// A stop-market order: trigger only, fills at market once touched.
    pub fn stop_market(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        stop_price: Decimal,
    ) -> Self {
        let mut order = Self::base(symbol, side, OrderType::StopMarket, quantity);
        order.stop_price = Some(stop_price);
        order
    }

    pub fn take_profit(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        let mut order = Self::base(symbol, side, OrderType::TakeProfit, quantity);
        order.price = Some(price);
        order
    }

    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = Some(time_in_force);
        self
    }

    pub fn with_working_type(mut self, working_type: WorkingType) -> Self {
        self.working_type = Some(working_type);
        self
    }

    pub fn with_reduce_only(mut self) -> Self {
        self.reduce_only = true;
        self
    }

    pub fn with_client_order_id(mut self, client_order_id: impl Into<String>) -> Self {
        self.client_order_id = Some(client_order_id.into());
        self
    }

    /// Checks the structural invariants of the order shape.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.quantity <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "quantity".to_string(),
                "must be > 0".to_string(),
            ));
        }
        match self.order_type {
            OrderType::Market => {}
            OrderType::Limit | OrderType::TakeProfit => {
                if self.price.is_none() {
                    return Err(CoreError::InvalidInput(
                        "price".to_string(),
                        format!("required for {} orders", self.order_type),
                    ));
                }
            }
            OrderType::Stop => {
                if self.price.is_none() {
                    return Err(CoreError::InvalidInput(
                        "price".to_string(),
                        "required for STOP orders".to_string(),
                    ));
                }
                if self.stop_price.is_none() {
                    return Err(CoreError::InvalidInput(
                        "stopPrice".to_string(),
                        "required for STOP orders".to_string(),
                    ));
                }
            }
            OrderType::StopMarket => {
                if self.stop_price.is_none() {
                    return Err(CoreError::InvalidInput(
                        "stopPrice".to_string(),
                        "required for STOP_MARKET orders".to_string(),
                    ));
                }
                if self.price.is_some() {
                    return Err(CoreError::InvalidInput(
                        "price".to_string(),
                        "not accepted for STOP_MARKET orders".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// A copy safe for retry logging: the client order id is stripped so
    /// repeated log lines cannot be replayed against the idempotency key.
    pub fn redacted(&self) -> Self {
        Self {
            client_order_id: None,
            ..self.clone()
        }
    }
}
