use std::time::Duration;

use api_client::{ApiError, OrderAck};
use configuration::Settings;
use core_types::OrderRequest;
use journal::AuditEvent;
use serde_json::Value;
use tokio::time::sleep;
use tracing::warn;

use crate::OrderExecutor;

/// Backoff settings for transient submission failures. The delay before
/// retry `n` is `base_delay * 2^n` (0.5s, 1s, 2s, ... at the defaults).
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay: Duration::from_millis(settings.retry_base_delay_ms),
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

impl OrderExecutor {
    /// Submits `order`, retrying transient failures with exponential
    /// backoff. Each failed attempt is journaled as `order_attempt_failed`
    /// and each retry is announced as `retry_attempt`. Terminal errors and
    /// exhausted retries surface the last error to the caller.
    pub async fn submit_with_retry(&self, order: &OrderRequest) -> Result<OrderAck, ApiError> {
        let req = redacted_value(order);
        let mut attempt: u32 = 0;
        loop {
            if attempt > 0 {
                self.journal
                    .info(AuditEvent::new("retry_attempt").attempt(attempt).req(req.clone()));
            }
            match self.client.submit_order(order).await {
                Ok(ack) => return Ok(ack),
                Err(e) => {
                    let transient = e.is_transient();
                    self.journal.error(
                        AuditEvent::new("order_attempt_failed")
                            .attempt(attempt)
                            .transient(transient)
                            .error(e.to_string())
                            .req(req.clone()),
                    );
                    warn!(attempt, transient, error = %e, "order attempt failed");
                    if attempt >= self.policy.max_retries || !transient {
                        return Err(e);
                    }
                    sleep(self.policy.delay_for(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// The order as journaled alongside attempt records. The client order id
/// is stripped so correlation tokens appear only in the `linkId` field of
/// the strategy-level records.
fn redacted_value(order: &OrderRequest) -> Value {
    serde_json::to_value(order.redacted()).unwrap_or_default()
}
