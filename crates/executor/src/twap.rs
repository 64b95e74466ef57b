use std::time::Duration;

use core_types::{
    validate_quantity, validate_side, validate_symbol, CoreError, LinkId, OrderRequest, OrderSide,
};
use journal::AuditEvent;
use rust_decimal::Decimal;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::ExecutorError;
use crate::OrderExecutor;

/// Raw inputs for a TWAP execution, as collected from the CLI.
#[derive(Debug, Clone)]
pub struct TwapParams {
    pub symbol: String,
    pub side: String,
    pub quantity: String,
    pub slices: u32,
    pub interval_sec: u64,
}

#[derive(Debug, Clone)]
pub struct TwapReport {
    pub link_id: LinkId,
    pub total_qty: Decimal,
    pub executed_qty: Decimal,
    pub slices: u32,
    pub filled_slices: u32,
    pub cancelled: bool,
}

struct TwapPlan {
    symbol: String,
    side: OrderSide,
    total_qty: Decimal,
    slices: u32,
    interval: Duration,
}

impl TwapPlan {
    fn slice_qty(&self) -> Decimal {
        self.total_qty / Decimal::from(self.slices)
    }

    /// Quantity for the 1-based slice `index`. The last slice takes the
    /// remainder so the executed total lands exactly on the target.
    fn qty_for(&self, index: u32, executed: Decimal) -> Decimal {
        if index == self.slices {
            self.total_qty - executed
        } else {
            self.slice_qty()
        }
    }
}

fn parse(params: &TwapParams) -> Result<TwapPlan, CoreError> {
    let symbol = validate_symbol(&params.symbol)?;
    let side = validate_side(&params.side)?;
    let total_qty = validate_quantity(&params.quantity)?;
    if params.slices < 1 {
        return Err(CoreError::InvalidInput(
            "slices".to_string(),
            "must be >= 1".to_string(),
        ));
    }
    if params.interval_sec < 1 {
        return Err(CoreError::InvalidInput(
            "intervalSec".to_string(),
            "must be >= 1".to_string(),
        ));
    }
    Ok(TwapPlan {
        symbol,
        side,
        total_qty,
        slices: params.slices,
        interval: Duration::from_secs(params.interval_sec),
    })
}

impl OrderExecutor {
    /// Executes a total quantity as evenly paced market-order slices. A
    /// failed slice is journaled and skipped; its quantity rolls into the
    /// final remainder slice. Cancelling `cancel` stops the run at the
    /// next inter-slice wait; already-placed slices stand.
    pub async fn place_twap(
        &self,
        params: &TwapParams,
        cancel: CancellationToken,
    ) -> Result<TwapReport, ExecutorError> {
        let plan = match parse(params) {
            Ok(plan) => plan,
            Err(e) => return Err(self.validation_failed(Some("TWAP"), e)),
        };
        let link_id = LinkId::twap();

        self.journal.info(
            AuditEvent::new("twap_start")
                .symbol(&plan.symbol)
                .side(plan.side.as_str())
                .total_qty(plan.total_qty)
                .slices(plan.slices)
                .slice_qty(plan.slice_qty())
                .interval_sec(params.interval_sec)
                .link_id(link_id.as_str()),
        );
        info!(
            symbol = %plan.symbol,
            side = %plan.side,
            total_qty = %plan.total_qty,
            slices = plan.slices,
            link_id = %link_id,
            "starting TWAP"
        );

        let mut executed_qty = Decimal::ZERO;
        let mut filled_slices = 0u32;
        let mut cancelled = false;

        for index in 1..=plan.slices {
            let qty = plan.qty_for(index, executed_qty);
            if qty <= Decimal::ZERO {
                debug!(slice = index, "skipping empty slice");
                continue;
            }

            let order = OrderRequest::market(&plan.symbol, plan.side, qty)
                .with_client_order_id(link_id.slice(index));
            let slice_base = AuditEvent::new("twap_slice")
                .symbol(&plan.symbol)
                .side(plan.side.as_str())
                .slice_index(index)
                .total_slices(plan.slices)
                .qty(qty)
                .link_id(link_id.as_str());

            match self.submit_with_retry(&order).await {
                Ok(ack) => {
                    executed_qty += qty;
                    filled_slices += 1;
                    self.journal.info(
                        slice_base
                            .executed_qty(executed_qty)
                            .order_id(&ack.order_id)
                            .result("ok"),
                    );
                    info!(
                        slice = index,
                        total = plan.slices,
                        qty = %qty,
                        order_id = %ack.order_id,
                        "TWAP slice placed"
                    );
                }
                Err(e) => {
                    self.journal
                        .error(slice_base.result("error").error(e.to_string()));
                    warn!(slice = index, total = plan.slices, error = %e, "TWAP slice failed");
                    continue;
                }
            }

            if index < plan.slices {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        self.journal.info(
                            AuditEvent::new("twap_cancelled")
                                .symbol(&plan.symbol)
                                .side(plan.side.as_str())
                                .executed_qty(executed_qty)
                                .link_id(link_id.as_str()),
                        );
                        warn!(executed_qty = %executed_qty, link_id = %link_id, "TWAP cancelled");
                        cancelled = true;
                        break;
                    }
                    _ = sleep(plan.interval) => {}
                }
            }
        }

        self.journal.info(
            AuditEvent::new("twap_complete")
                .symbol(&plan.symbol)
                .side(plan.side.as_str())
                .total_qty(plan.total_qty)
                .executed_qty(executed_qty)
                .slices(plan.slices)
                .link_id(link_id.as_str())
                .result("ok"),
        );

        Ok(TwapReport {
            link_id,
            total_qty: plan.total_qty,
            executed_qty,
            slices: plan.slices,
            filled_slices,
            cancelled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{executor_with, fast_policy, Step};
    use rust_decimal_macros::dec;
    use std::time::Instant;

    fn plan(total: Decimal, slices: u32) -> TwapPlan {
        TwapPlan {
            symbol: "BTCUSDT".to_string(),
            side: OrderSide::Buy,
            total_qty: total,
            slices,
            interval: Duration::from_secs(1),
        }
    }

    fn params(slices: u32, interval_sec: u64) -> TwapParams {
        TwapParams {
            symbol: "BTCUSDT".to_string(),
            side: "BUY".to_string(),
            quantity: "0.3".to_string(),
            slices,
            interval_sec,
        }
    }

    #[test]
    fn last_slice_takes_the_remainder() {
        let plan = plan(dec!(1), 3);
        let slice = plan.slice_qty();
        let executed = slice + slice;
        let last = plan.qty_for(3, executed);
        assert_eq!(executed + last, dec!(1));
        assert!(last > Decimal::ZERO);
    }

    #[test]
    fn even_totals_split_exactly() {
        let plan = plan(dec!(0.3), 3);
        assert_eq!(plan.slice_qty(), dec!(0.1));
        assert_eq!(plan.qty_for(3, dec!(0.2)), dec!(0.1));
    }

    #[tokio::test]
    async fn single_slice_runs_without_waiting() {
        let (executor, client, journal) = executor_with(vec![], fast_policy());

        let started = Instant::now();
        let report = executor
            .place_twap(&params(1, 10), CancellationToken::new())
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(client.calls(), 1);
        assert_eq!(report.executed_qty, dec!(0.3));
        assert_eq!(report.filled_slices, 1);
        assert!(!report.cancelled);
        assert_eq!(
            journal.actions(),
            vec!["twap_start", "twap_slice", "twap_complete"]
        );
    }

    #[tokio::test]
    async fn paces_slices_and_sweeps_the_remainder() {
        let (executor, client, journal) = executor_with(vec![], fast_policy());

        let started = Instant::now();
        let report = executor
            .place_twap(&params(3, 1), CancellationToken::new())
            .await
            .unwrap();

        // Two inter-slice waits, none after the last slice.
        assert!(started.elapsed() >= Duration::from_secs(2));
        assert_eq!(client.calls(), 3);
        assert_eq!(client.request(0).quantity, dec!(0.1));
        assert_eq!(client.request(2).quantity, dec!(0.1));
        assert_eq!(report.executed_qty, dec!(0.3));
        assert_eq!(report.filled_slices, 3);

        let records = journal.records();
        let start = &records[0].event;
        assert_eq!(start.action, "twap_start");
        assert_eq!(start.slice_qty, Some(dec!(0.1)));
        assert_eq!(start.interval_sec, Some(1));

        let second_slice = &records[2].event;
        assert_eq!(second_slice.slice_index, Some(2));
        assert_eq!(second_slice.total_slices, Some(3));
        assert_eq!(second_slice.executed_qty, Some(dec!(0.2)));
        assert_eq!(
            client.request(1).client_order_id.as_deref(),
            Some(report.link_id.slice(2).as_str())
        );

        let complete = records.last().unwrap();
        assert_eq!(complete.event.action, "twap_complete");
        assert_eq!(complete.event.executed_qty, Some(dec!(0.3)));
    }

    #[tokio::test]
    async fn failed_middle_slice_still_submits_the_rest() {
        let (executor, client, journal) = executor_with(
            vec![Step::Succeed, Step::FailTerminal, Step::Succeed],
            fast_policy(),
        );

        let report = executor
            .place_twap(&params(3, 1), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(client.calls(), 3);
        assert_eq!(client.request(0).quantity, dec!(0.1));
        assert_eq!(client.request(1).quantity, dec!(0.1));
        // The failed slice's quantity rides along in the remainder.
        assert_eq!(client.request(2).quantity, dec!(0.2));
        assert_eq!(report.executed_qty, dec!(0.3));
        assert_eq!(report.filled_slices, 2);

        let errors: Vec<_> = journal
            .records()
            .into_iter()
            .filter(|r| r.event.result.as_deref() == Some("error"))
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].event.slice_index, Some(2));
    }

    #[tokio::test]
    async fn failed_slice_rolls_into_the_final_remainder() {
        let (executor, client, journal) =
            executor_with(vec![Step::FailTerminal, Step::Succeed], fast_policy());

        let report = executor
            .place_twap(&params(2, 1), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(client.calls(), 2);
        assert_eq!(client.request(0).quantity, dec!(0.15));
        // Nothing executed yet, so the last slice carries the full total.
        assert_eq!(client.request(1).quantity, dec!(0.3));
        assert_eq!(report.executed_qty, dec!(0.3));
        assert_eq!(report.filled_slices, 1);

        let records = journal.records();
        let failed = records
            .iter()
            .find(|r| r.event.action == "twap_slice" && r.event.result.as_deref() == Some("error"))
            .unwrap();
        assert!(failed.event.executed_qty.is_none());
        assert_eq!(records.last().unwrap().event.action, "twap_complete");
    }

    #[tokio::test]
    async fn cancellation_stops_at_the_next_wait() {
        let (executor, client, journal) = executor_with(vec![], fast_policy());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = executor.place_twap(&params(3, 60), cancel).await.unwrap();

        assert_eq!(client.calls(), 1);
        assert!(report.cancelled);
        assert_eq!(report.filled_slices, 1);
        assert_eq!(report.executed_qty, dec!(0.1));

        let actions = journal.actions();
        assert_eq!(
            actions,
            vec!["twap_start", "twap_slice", "twap_cancelled", "twap_complete"]
        );
        let cancelled = journal
            .records()
            .into_iter()
            .find(|r| r.event.action == "twap_cancelled")
            .unwrap();
        assert_eq!(cancelled.event.executed_qty, Some(dec!(0.1)));
    }

    #[tokio::test]
    async fn rejects_zero_slices() {
        let (executor, client, journal) = executor_with(vec![], fast_policy());

        let err = executor
            .place_twap(&params(0, 10), CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ExecutorError::Validation(_)));
        assert_eq!(client.calls(), 0);
        let event = &journal.records()[0].event;
        assert_eq!(event.action, "validate");
        assert_eq!(event.order_type.as_deref(), Some("TWAP"));
        assert_eq!(
            event.error.as_deref(),
            Some("Invalid input for slices: must be >= 1")
        );
    }

    #[tokio::test]
    async fn rejects_zero_interval() {
        let (executor, _, journal) = executor_with(vec![], fast_policy());

        executor
            .place_twap(&params(3, 0), CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(
            journal.records()[0].event.error.as_deref(),
            Some("Invalid input for intervalSec: must be >= 1")
        );
    }
}
