use std::sync::Arc;

use async_trait::async_trait;
use configuration::{ExecutionMode, Settings};
use core_types::OrderRequest;
use journal::Journal;

mod auth;
pub mod error;
pub mod live;
pub mod responses;
pub mod simulated;

// --- Public API ---
pub use error::ApiError;
pub use live::BinanceClient;
pub use responses::{ApiErrorResponse, OrderAck, OrderResponse};
pub use simulated::SimulatedClient;

/// The generic, abstract interface for submitting orders to an exchange.
/// This trait is the contract the executor works against, allowing the
/// underlying implementation (live or simulated) to be swapped out.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Submits a single order and returns the exchange's acknowledgement.
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck, ApiError>;

    /// Whether this client simulates fills instead of reaching Binance.
    fn is_dry_run(&self) -> bool;
}

/// Builds the client matching the configured execution mode.
pub fn build_client(settings: &Settings, journal: Arc<dyn Journal>) -> Arc<dyn ExchangeClient> {
    match settings.mode {
        ExecutionMode::Live => Arc::new(BinanceClient::new(settings)),
        ExecutionMode::Dryrun => Arc::new(SimulatedClient::new(journal)),
    }
}
