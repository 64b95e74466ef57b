//! # Azimuth Executor Crate
//!
//! This crate provides the order placement strategies: single orders
//! (market, limit, stop-limit), bracket entries with paired exits, an
//! emulated OCO pair, and paced TWAP execution. All of them funnel through
//! one retrying submission path and record every attempt and outcome in
//! the audit journal.
//!
//! ## Architectural Principles
//!
//! - **Client Abstraction:** Strategies talk to the exchange only through
//!   the `ExchangeClient` trait, so the same code paths run against the
//!   live Binance API and the dry-run simulator.
//! - **Journal Before Report:** Every placement writes its audit record
//!   before the result is surfaced to the caller. A failed leg is a logged
//!   outcome, not an exception path that skips bookkeeping.
//!
//! ## Public API
//!
//! - `OrderExecutor`: The entry point owning the client, journal, and
//!   retry policy.
//! - `RetryPolicy`: Exponential backoff settings for transient failures.
//! - `BracketParams` / `OcoParams` / `TwapParams`: Validated inputs for
//!   the multi-leg strategies, parsed from raw CLI strings.
//! - `ExecutorError`: The specific error types that can be returned from
//!   this crate.

use std::sync::Arc;

use api_client::ExchangeClient;
use journal::Journal;

// Declare the modules that constitute this crate.
pub mod bracket;
pub mod error;
pub mod oco;
pub mod retry;
pub mod single;
pub mod twap;

#[cfg(test)]
mod testing;

// Re-export the key components to provide a clean, public-facing API.
pub use bracket::{BracketParams, BracketReport, EntryKind, LegResult};
pub use error::ExecutorError;
pub use oco::{OcoParams, OcoReport};
pub use retry::RetryPolicy;
pub use twap::{TwapParams, TwapReport};

/// Places orders through an exchange client, retrying transient failures
/// and journaling every attempt and outcome.
pub struct OrderExecutor {
    client: Arc<dyn ExchangeClient>,
    journal: Arc<dyn Journal>,
    policy: RetryPolicy,
}

impl OrderExecutor {
    pub fn new(
        client: Arc<dyn ExchangeClient>,
        journal: Arc<dyn Journal>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            client,
            journal,
            policy,
        }
    }
}
