use std::sync::Arc;

use async_trait::async_trait;
use core_types::OrderRequest;
use journal::{AuditEvent, Journal};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::responses::OrderAck;
use crate::ExchangeClient;

/// Dry-run implementation of the `ExchangeClient`. Nothing leaves the
/// process: every order is acknowledged with a synthetic `SIM-` id and the
/// full request is written to the audit journal.
pub struct SimulatedClient {
    journal: Arc<dyn Journal>,
}

impl SimulatedClient {
    pub fn new(journal: Arc<dyn Journal>) -> Self {
        Self { journal }
    }
}

#[async_trait]
impl ExchangeClient for SimulatedClient {
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck, ApiError> {
        let order_id = format!("SIM-{}", &Uuid::new_v4().simple().to_string()[..8]);
        let request: Value = serde_json::to_value(order).unwrap_or_default();

        self.journal.info(
            AuditEvent::new("place_order")
                .mode("dryrun")
                .order_id(&order_id)
                .request(request.clone()),
        );

        Ok(OrderAck {
            order_id: order_id.clone(),
            status: "ACK".to_string(),
            raw: json!({
                "orderId": order_id,
                "status": "ACK",
                "dryrun": true,
                "request": request,
            }),
        })
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}
