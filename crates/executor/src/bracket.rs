use core_types::{
    validate_price, validate_quantity, validate_side, validate_symbol, CoreError, LinkId,
    OrderRequest, OrderSide, TimeInForce, WorkingType,
};
use journal::AuditEvent;
use rust_decimal::Decimal;

use crate::error::ExecutorError;
use crate::OrderExecutor;

/// Entry order flavor for a bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Market,
    Limit,
}

impl EntryKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Market => "MARKET",
            EntryKind::Limit => "LIMIT",
        }
    }
}

/// Raw inputs for a bracket placement, as collected from the CLI.
#[derive(Debug, Clone)]
pub struct BracketParams {
    pub symbol: String,
    pub side: String,
    pub quantity: String,
    pub entry_kind: String,
    pub entry_price: Option<String>,
    pub take_profit: String,
    pub stop_price: String,
    pub stop_limit_price: Option<String>,
}

/// Outcome of one non-fatal exit leg.
#[derive(Debug, Clone)]
pub enum LegResult {
    Placed { order_id: String },
    Failed { error: String },
}

impl LegResult {
    pub fn order_id(&self) -> Option<&str> {
        match self {
            LegResult::Placed { order_id } => Some(order_id),
            LegResult::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BracketReport {
    pub link_id: LinkId,
    pub entry_kind: EntryKind,
    pub entry_order_id: String,
    pub take_profit: LegResult,
    pub stop_loss: LegResult,
}

struct ParsedBracket {
    symbol: String,
    entry_side: OrderSide,
    quantity: Decimal,
    entry_kind: EntryKind,
    /// Some iff `entry_kind` is `Limit`.
    entry_price: Option<Decimal>,
    take_profit: Decimal,
    stop_trigger: Decimal,
    stop_limit: Option<Decimal>,
}

fn parse(params: &BracketParams) -> Result<ParsedBracket, CoreError> {
    let symbol = validate_symbol(&params.symbol)?;
    let entry_side = validate_side(&params.side)?;
    let quantity = validate_quantity(&params.quantity)?;

    let entry_kind = match params.entry_kind.trim().to_uppercase().as_str() {
        "MARKET" => EntryKind::Market,
        "LIMIT" => EntryKind::Limit,
        _ => {
            return Err(CoreError::InvalidInput(
                "entryType".to_string(),
                "must be MARKET or LIMIT".to_string(),
            ));
        }
    };
    let entry_price = match entry_kind {
        EntryKind::Limit => match params.entry_price.as_deref() {
            Some(raw) => Some(validate_price("price", raw)?),
            None => {
                return Err(CoreError::InvalidInput(
                    "price".to_string(),
                    "required when entryType=LIMIT".to_string(),
                ));
            }
        },
        EntryKind::Market => None,
    };

    let take_profit = validate_price("takeProfit", &params.take_profit)?;
    let stop_trigger = validate_price("stopPrice", &params.stop_price)?;
    let stop_limit = params
        .stop_limit_price
        .as_deref()
        .map(|raw| validate_price("stopLimitPrice", raw))
        .transpose()?;

    Ok(ParsedBracket {
        symbol,
        entry_side,
        quantity,
        entry_kind,
        entry_price,
        take_profit,
        stop_trigger,
        stop_limit,
    })
}

impl OrderExecutor {
    /// Places a bracket: an entry order plus a reduce-only take-profit and
    /// stop-loss on the opposite side, all tagged with one link id.
    ///
    /// An entry failure aborts the bracket. Exit legs are best-effort:
    /// each is attempted regardless of the other's outcome, and failures
    /// are reported in the returned legs rather than as errors. The legs
    /// are plain sibling orders; filling one does not cancel the other.
    pub async fn place_bracket(
        &self,
        params: &BracketParams,
    ) -> Result<BracketReport, ExecutorError> {
        let parsed = match parse(params) {
            Ok(parsed) => parsed,
            Err(e) => return Err(self.validation_failed(Some("BRACKET"), e)),
        };
        let exit_side = parsed.entry_side.opposite();
        let link_id = LinkId::bracket();

        let entry_order = match parsed.entry_price {
            Some(price) => {
                OrderRequest::limit(&parsed.symbol, parsed.entry_side, parsed.quantity, price)
            }
            None => OrderRequest::market(&parsed.symbol, parsed.entry_side, parsed.quantity),
        }
        .with_client_order_id(link_id.leg("ENTRY"));

        let entry_base = AuditEvent::new("place_entry")
            .order_type(parsed.entry_kind.label())
            .symbol(&parsed.symbol)
            .side(parsed.entry_side.as_str())
            .qty(parsed.quantity)
            .maybe_price(parsed.entry_price)
            .link_id(link_id.as_str());

        let entry_ack = match self.submit_with_retry(&entry_order).await {
            Ok(ack) => {
                self.journal
                    .info(entry_base.order_id(&ack.order_id).result("ok"));
                ack
            }
            Err(e) => {
                self.journal
                    .error(entry_base.result("error").error(e.to_string()));
                return Err(e.into());
            }
        };

        let tp_order = OrderRequest::take_profit(
            &parsed.symbol,
            exit_side,
            parsed.quantity,
            parsed.take_profit,
        )
        .with_reduce_only()
        .with_time_in_force(TimeInForce::Gtc)
        .with_working_type(WorkingType::ContractPrice)
        .with_client_order_id(link_id.leg("TP"));

        let tp_base = AuditEvent::new("place_exit_tp")
            .symbol(&parsed.symbol)
            .side(exit_side.as_str())
            .qty(parsed.quantity)
            .price(parsed.take_profit)
            .link_id(link_id.as_str());

        let take_profit = match self.submit_with_retry(&tp_order).await {
            Ok(ack) => {
                self.journal
                    .info(tp_base.order_id(&ack.order_id).result("ok"));
                LegResult::Placed {
                    order_id: ack.order_id,
                }
            }
            Err(e) => {
                let error = e.to_string();
                self.journal.error(tp_base.result("error").error(&error));
                LegResult::Failed { error }
            }
        };

        let sl_order = match parsed.stop_limit {
            Some(stop_limit) => OrderRequest::stop(
                &parsed.symbol,
                exit_side,
                parsed.quantity,
                stop_limit,
                parsed.stop_trigger,
            )
            .with_time_in_force(TimeInForce::Gtc),
            None => OrderRequest::stop_market(
                &parsed.symbol,
                exit_side,
                parsed.quantity,
                parsed.stop_trigger,
            ),
        }
        .with_reduce_only()
        .with_working_type(WorkingType::ContractPrice)
        .with_client_order_id(link_id.leg("SL"));

        let sl_base = AuditEvent::new("place_exit_sl")
            .symbol(&parsed.symbol)
            .side(exit_side.as_str())
            .qty(parsed.quantity)
            .stop_price(parsed.stop_trigger)
            .maybe_stop_limit_price(parsed.stop_limit)
            .link_id(link_id.as_str());

        let stop_loss = match self.submit_with_retry(&sl_order).await {
            Ok(ack) => {
                self.journal
                    .info(sl_base.order_id(&ack.order_id).result("ok"));
                LegResult::Placed {
                    order_id: ack.order_id,
                }
            }
            Err(e) => {
                let error = e.to_string();
                self.journal.error(sl_base.result("error").error(&error));
                LegResult::Failed { error }
            }
        };

        Ok(BracketReport {
            link_id,
            entry_kind: parsed.entry_kind,
            entry_order_id: entry_ack.order_id,
            take_profit,
            stop_loss,
        })
    }
}
