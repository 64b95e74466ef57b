use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity of an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Info,
    Error,
}

/// The payload of one audit record. Every field except `action` is
/// optional and omitted from the wire form when unset; the builder methods
/// populate exactly the fields an action needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub action: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_limit_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tif: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slice_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_slices: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_qty: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slice_qty: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executed_qty: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_sec: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slices: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transient: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Full request payload, as logged by the dry-run client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<Value>,
    /// Redacted request payload, as logged by the retry engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub req: Option<Value>,
}

impl AuditEvent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn order_type(mut self, order_type: impl Into<String>) -> Self {
        self.order_type = Some(order_type.into());
        self
    }

    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn side(mut self, side: impl Into<String>) -> Self {
        self.side = Some(side.into());
        self
    }

    pub fn qty(mut self, qty: Decimal) -> Self {
        self.qty = Some(qty);
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn maybe_price(mut self, price: Option<Decimal>) -> Self {
        self.price = price;
        self
    }

    pub fn stop_price(mut self, stop_price: Decimal) -> Self {
        self.stop_price = Some(stop_price);
        self
    }

    pub fn limit_price(mut self, limit_price: Decimal) -> Self {
        self.limit_price = Some(limit_price);
        self
    }

    pub fn maybe_stop_limit_price(mut self, stop_limit_price: Option<Decimal>) -> Self {
        self.stop_limit_price = stop_limit_price;
        self
    }

    pub fn take_profit(mut self, take_profit: Decimal) -> Self {
        self.take_profit = Some(take_profit);
        self
    }

    pub fn tif(mut self, tif: impl Into<String>) -> Self {
        self.tif = Some(tif.into());
        self
    }

    pub fn order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn tp_order_id(mut self, tp_order_id: impl Into<String>) -> Self {
        self.tp_order_id = Some(tp_order_id.into());
        self
    }

    pub fn sl_order_id(mut self, sl_order_id: impl Into<String>) -> Self {
        self.sl_order_id = Some(sl_order_id.into());
        self
    }

    pub fn link_id(mut self, link_id: impl Into<String>) -> Self {
        self.link_id = Some(link_id.into());
        self
    }

    pub fn result(mut self, result: impl Into<String>) -> Self {
        self.result = Some(result.into());
        self
    }

    pub fn slice_index(mut self, slice_index: u32) -> Self {
        self.slice_index = Some(slice_index);
        self
    }

    pub fn total_slices(mut self, total_slices: u32) -> Self {
        self.total_slices = Some(total_slices);
        self
    }

    pub fn total_qty(mut self, total_qty: Decimal) -> Self {
        self.total_qty = Some(total_qty);
        self
    }

    pub fn slice_qty(mut self, slice_qty: Decimal) -> Self {
        self.slice_qty = Some(slice_qty);
        self
    }

    pub fn executed_qty(mut self, executed_qty: Decimal) -> Self {
        self.executed_qty = Some(executed_qty);
        self
    }

    pub fn interval_sec(mut self, interval_sec: u64) -> Self {
        self.interval_sec = Some(interval_sec);
        self
    }

    pub fn slices(mut self, slices: u32) -> Self {
        self.slices = Some(slices);
        self
    }

    pub fn attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }

    pub fn transient(mut self, transient: bool) -> Self {
        self.transient = Some(transient);
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn request(mut self, request: Value) -> Self {
        self.request = Some(request);
        self
    }

    pub fn req(mut self, req: Value) -> Self {
        self.req = Some(req);
        self
    }
}

/// A single journal line: timestamp, severity, and the flattened event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// ISO-8601 UTC at second precision with a literal trailing `Z`.
    pub ts: String,
    pub level: Level,
    #[serde(flatten)]
    pub event: AuditEvent,
}

impl Record {
    pub fn new(level: Level, event: AuditEvent) -> Self {
        Self {
            ts: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            level,
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn unset_fields_are_omitted_from_the_wire_form() {
        let event = AuditEvent::new("place_order")
            .order_type("MARKET")
            .symbol("BTCUSDT")
            .result("ok");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["action"], "place_order");
        assert_eq!(json["type"], "MARKET");
        assert!(json.get("price").is_none());
        assert!(json.get("linkId").is_none());
        assert!(json.get("transient").is_none());
    }

    #[test]
    fn record_flattens_the_event_next_to_ts_and_level() {
        let record = Record::new(Level::Error, AuditEvent::new("validate").error("bad symbol"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["level"], "ERROR");
        assert_eq!(json["action"], "validate");
        assert_eq!(json["error"], "bad symbol");
    }

    #[test]
    fn timestamps_are_second_precision_utc() {
        let record = Record::new(Level::Info, AuditEvent::new("twap_start"));
        assert_eq!(record.ts.len(), "2024-01-01T00:00:00Z".len());
        assert!(record.ts.ends_with('Z'));
        assert!(chrono::NaiveDateTime::parse_from_str(&record.ts, "%Y-%m-%dT%H:%M:%SZ").is_ok());
    }

    #[test]
    fn decimals_round_trip_through_json() {
        let qty = Decimal::from_str("0.333333333333").unwrap();
        let record = Record::new(Level::Info, AuditEvent::new("twap_slice").qty(qty));
        let line = serde_json::to_string(&record).unwrap();
        let back: Record = serde_json::from_str(&line).unwrap();
        assert_eq!(back.event.qty, Some(qty));
    }
}
