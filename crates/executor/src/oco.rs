use api_client::ApiError;
use core_types::{
    validate_price, validate_quantity, validate_side, validate_symbol, CoreError, LinkId,
    OrderRequest, OrderSide, TimeInForce, WorkingType,
};
use journal::AuditEvent;
use rust_decimal::Decimal;

use crate::error::ExecutorError;
use crate::OrderExecutor;

/// Raw inputs for an emulated OCO pair, as collected from the CLI. `side`
/// is the exit side shared by both legs.
#[derive(Debug, Clone)]
pub struct OcoParams {
    pub symbol: String,
    pub side: String,
    pub quantity: String,
    pub take_profit: String,
    pub stop_price: String,
    pub stop_limit_price: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OcoReport {
    pub link_id: LinkId,
    pub tp_order_id: String,
    pub sl_order_id: String,
}

struct ParsedOco {
    symbol: String,
    side: OrderSide,
    quantity: Decimal,
    take_profit: Decimal,
    stop_trigger: Decimal,
    stop_limit: Option<Decimal>,
}

fn parse(params: &OcoParams) -> Result<ParsedOco, CoreError> {
    Ok(ParsedOco {
        symbol: validate_symbol(&params.symbol)?,
        side: validate_side(&params.side)?,
        quantity: validate_quantity(&params.quantity)?,
        take_profit: validate_price("takeProfit", &params.take_profit)?,
        stop_trigger: validate_price("stopPrice", &params.stop_price)?,
        stop_limit: params
            .stop_limit_price
            .as_deref()
            .map(|raw| validate_price("stopLimitPrice", raw))
            .transpose()?,
    })
}

fn pair_event(parsed: &ParsedOco) -> AuditEvent {
    AuditEvent::new("place_oco")
        .symbol(&parsed.symbol)
        .side(parsed.side.as_str())
        .qty(parsed.quantity)
        .take_profit(parsed.take_profit)
        .stop_price(parsed.stop_trigger)
        .maybe_stop_limit_price(parsed.stop_limit)
}

impl OrderExecutor {
    /// Places an emulated OCO pair: a reduce-only take-profit and
    /// stop-loss on the same side, tagged with one link id. If either leg
    /// fails the pair is reported as failed; an already-placed first leg
    /// stays working on the exchange, since nothing cancels siblings.
    pub async fn place_oco(&self, params: &OcoParams) -> Result<OcoReport, ExecutorError> {
        let parsed = match parse(params) {
            Ok(parsed) => parsed,
            Err(e) => return Err(self.validation_failed(Some("OCO"), e)),
        };
        let link_id = LinkId::oco();

        let tp_order = OrderRequest::take_profit(
            &parsed.symbol,
            parsed.side,
            parsed.quantity,
            parsed.take_profit,
        )
        .with_reduce_only()
        .with_time_in_force(TimeInForce::Gtc)
        .with_working_type(WorkingType::ContractPrice)
        .with_client_order_id(link_id.leg("TP"));

        let tp_ack = match self.submit_with_retry(&tp_order).await {
            Ok(ack) => ack,
            Err(e) => return Err(self.pair_failed(&parsed, e)),
        };

        let sl_order = match parsed.stop_limit {
            Some(stop_limit) => OrderRequest::stop(
                &parsed.symbol,
                parsed.side,
                parsed.quantity,
                stop_limit,
                parsed.stop_trigger,
            )
            .with_time_in_force(TimeInForce::Gtc),
            None => OrderRequest::stop_market(
                &parsed.symbol,
                parsed.side,
                parsed.quantity,
                parsed.stop_trigger,
            ),
        }
        .with_reduce_only()
        .with_working_type(WorkingType::ContractPrice)
        .with_client_order_id(link_id.leg("SL"));

        let sl_ack = match self.submit_with_retry(&sl_order).await {
            Ok(ack) => ack,
            Err(e) => return Err(self.pair_failed(&parsed, e)),
        };

        self.journal.info(
            pair_event(&parsed)
                .result("ok")
                .link_id(link_id.as_str())
                .tp_order_id(&tp_ack.order_id)
                .sl_order_id(&sl_ack.order_id),
        );

        Ok(OcoReport {
            link_id,
            tp_order_id: tp_ack.order_id,
            sl_order_id: sl_ack.order_id,
        })
    }

    fn pair_failed(&self, parsed: &ParsedOco, e: ApiError) -> ExecutorError {
        self.journal
            .error(pair_event(parsed).result("error").error(e.to_string()));
        e.into()
    }
}
