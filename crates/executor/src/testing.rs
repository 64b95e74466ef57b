use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use api_client::{ApiError, ExchangeClient, OrderAck};
use async_trait::async_trait;
use core_types::OrderRequest;
use journal::MemoryJournal;
use serde_json::json;

use crate::{OrderExecutor, RetryPolicy};

/// One scripted outcome for a `ScriptedClient` submission.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Succeed,
    FailTransient,
    FailTerminal,
}

/// Exchange client that replays a script of outcomes and records every
/// submitted order. Once the script runs out, submissions succeed.
pub struct ScriptedClient {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<OrderRequest>>,
}

impl ScriptedClient {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn request(&self, index: usize) -> OrderRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl ExchangeClient for ScriptedClient {
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck, ApiError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(order.clone());
            requests.len()
        };
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Step::Succeed);

        match step {
            Step::Succeed => {
                let order_id = format!("ORD-{call}");
                Ok(OrderAck {
                    order_id: order_id.clone(),
                    status: "NEW".to_string(),
                    raw: json!({"orderId": order_id, "status": "NEW"}),
                })
            }
            Step::FailTransient => Err(ApiError::Exchange {
                code: -1001,
                message: "Internal error; unable to process your request. Please try again."
                    .to_string(),
            }),
            Step::FailTerminal => Err(ApiError::Exchange {
                code: -2019,
                message: "Margin is insufficient.".to_string(),
            }),
        }
    }

    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Builds an executor wired to a scripted client and an in-memory journal.
pub fn executor_with(
    steps: Vec<Step>,
    policy: RetryPolicy,
) -> (OrderExecutor, Arc<ScriptedClient>, Arc<MemoryJournal>) {
    let client = Arc::new(ScriptedClient::new(steps));
    let journal = Arc::new(MemoryJournal::new());
    let executor = OrderExecutor::new(client.clone(), journal.clone(), policy);
    (executor, client, journal)
}

/// A policy with millisecond backoff so retry tests stay fast.
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        base_delay: std::time::Duration::from_millis(5),
    }
}
