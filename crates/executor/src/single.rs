use api_client::OrderAck;
use core_types::{
    validate_price, validate_quantity, validate_side, validate_symbol, validate_time_in_force,
    CoreError, OrderRequest, OrderSide, TimeInForce, WorkingType,
};
use journal::AuditEvent;
use rust_decimal::Decimal;

use crate::error::ExecutorError;
use crate::OrderExecutor;

impl OrderExecutor {
    /// Places a MARKET order from raw CLI inputs.
    pub async fn place_market(
        &self,
        symbol: &str,
        side: &str,
        quantity: &str,
    ) -> Result<OrderAck, ExecutorError> {
        let (symbol, side, quantity) = match market_inputs(symbol, side, quantity) {
            Ok(parsed) => parsed,
            Err(e) => return Err(self.validation_failed(None, e)),
        };

        let order = OrderRequest::market(&symbol, side, quantity);
        let base = AuditEvent::new("place_order")
            .order_type("MARKET")
            .symbol(&symbol)
            .side(side.as_str())
            .qty(quantity);

        match self.submit_with_retry(&order).await {
            Ok(ack) => {
                self.journal.info(base.result("ok").order_id(&ack.order_id));
                Ok(ack)
            }
            Err(e) => {
                self.journal.error(base.result("error").error(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Places a GTC LIMIT order from raw CLI inputs.
    pub async fn place_limit(
        &self,
        symbol: &str,
        side: &str,
        quantity: &str,
        price: &str,
    ) -> Result<OrderAck, ExecutorError> {
        let (symbol, side, quantity, price) = match limit_inputs(symbol, side, quantity, price) {
            Ok(parsed) => parsed,
            Err(e) => return Err(self.validation_failed(Some("LIMIT"), e)),
        };

        let order = OrderRequest::limit(&symbol, side, quantity, price);
        let base = AuditEvent::new("place_order")
            .order_type("LIMIT")
            .symbol(&symbol)
            .side(side.as_str())
            .qty(quantity)
            .price(price)
            .tif(TimeInForce::Gtc.as_str());

        match self.submit_with_retry(&order).await {
            Ok(ack) => {
                self.journal.info(base.result("ok").order_id(&ack.order_id));
                Ok(ack)
            }
            Err(e) => {
                self.journal.error(base.result("error").error(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Places a stop-limit order: a `STOP` with a trigger price and a
    /// limit price, triggered on the contract price.
    pub async fn place_stop_limit(
        &self,
        symbol: &str,
        side: &str,
        quantity: &str,
        stop_price: &str,
        limit_price: &str,
        time_in_force: &str,
    ) -> Result<OrderAck, ExecutorError> {
        let (symbol, side, quantity, stop_price, limit_price, tif) =
            match stop_limit_inputs(symbol, side, quantity, stop_price, limit_price, time_in_force)
            {
                Ok(parsed) => parsed,
                Err(e) => return Err(self.validation_failed(Some("STOP_LIMIT"), e)),
            };

        let order = OrderRequest::stop(&symbol, side, quantity, limit_price, stop_price)
            .with_time_in_force(tif)
            .with_working_type(WorkingType::ContractPrice);
        let base = AuditEvent::new("place_order")
            .order_type("STOP_LIMIT")
            .symbol(&symbol)
            .side(side.as_str())
            .qty(quantity)
            .stop_price(stop_price)
            .limit_price(limit_price)
            .tif(tif.as_str());

        match self.submit_with_retry(&order).await {
            Ok(ack) => {
                self.journal.info(base.result("ok").order_id(&ack.order_id));
                Ok(ack)
            }
            Err(e) => {
                self.journal.error(base.result("error").error(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Journals a rejected input and wraps it in the crate error. `kind`
    /// tags the event with the order type being validated, when one is
    /// known at that point.
    pub(crate) fn validation_failed(&self, kind: Option<&str>, e: CoreError) -> ExecutorError {
        let mut event = AuditEvent::new("validate");
        if let Some(kind) = kind {
            event = event.order_type(kind);
        }
        self.journal.error(event.error(e.to_string()));
        ExecutorError::Validation(e)
    }
}

fn market_inputs(
    symbol: &str,
    side: &str,
    quantity: &str,
) -> Result<(String, OrderSide, Decimal), CoreError> {
    Ok((
        validate_symbol(symbol)?,
        validate_side(side)?,
        validate_quantity(quantity)?,
    ))
}

fn limit_inputs(
    symbol: &str,
    side: &str,
    quantity: &str,
    price: &str,
) -> Result<(String, OrderSide, Decimal, Decimal), CoreError> {
    Ok((
        validate_symbol(symbol)?,
        validate_side(side)?,
        validate_quantity(quantity)?,
        validate_price("price", price)?,
    ))
}

#[allow(clippy::type_complexity)]
fn stop_limit_inputs(
    symbol: &str,
    side: &str,
    quantity: &str,
    stop_price: &str,
    limit_price: &str,
    time_in_force: &str,
) -> Result<(String, OrderSide, Decimal, Decimal, Decimal, TimeInForce), CoreError> {
    let symbol = validate_symbol(symbol)?;
    let side = validate_side(side)?;
    let quantity = validate_quantity(quantity)?;
    let stop_price = validate_price("stopPrice", stop_price)?;
    let limit_price = validate_price("limitPrice", limit_price)?;
    let tif = validate_time_in_force(time_in_force)?;

    // A SELL stop triggers on the way down, so its limit must sit at or
    // below the trigger. The BUY case mirrors it.
    match side {
        OrderSide::Sell if stop_price < limit_price => Err(CoreError::InvalidInput(
            "stopPrice".to_string(),
            "must be >= limitPrice for a SELL stop-limit".to_string(),
        )),
        OrderSide::Buy if stop_price > limit_price => Err(CoreError::InvalidInput(
            "stopPrice".to_string(),
            "must be <= limitPrice for a BUY stop-limit".to_string(),
        )),
        _ => Ok((symbol, side, quantity, stop_price, limit_price, tif)),
    }
}
