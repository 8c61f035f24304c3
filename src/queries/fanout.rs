//! Fire-all-then-join-all over a market list.
//!
//! Every per-market future is created before any is polled to completion and
//! all of them run concurrently on the calling task. Results come back in
//! input order, whatever order the responses arrive in.

use std::future::Future;

use futures::future::join_all;

use crate::error::AggregationError;
use crate::models::{ensure_distinct, MarketId, MarketOutcome};

pub(crate) type MarketResult<T> = std::result::Result<T, AggregationError>;

/// Run `query` for every market concurrently and wait for all to settle.
///
/// The i-th result belongs to `markets[i]`.
pub(crate) async fn fan_out<T, F, Fut>(
    markets: &[MarketId],
    query: F,
) -> MarketResult<Vec<MarketResult<T>>>
where
    F: FnMut(&MarketId) -> Fut,
    Fut: Future<Output = MarketResult<T>>,
{
    ensure_distinct(markets)?;
    Ok(join_all(markets.iter().map(query)).await)
}

/// All-or-nothing merge: the first failure in input order wins.
pub(crate) fn fail_fast<T>(results: Vec<MarketResult<T>>) -> MarketResult<Vec<T>> {
    results.into_iter().collect()
}

/// Keep every market, flagging the failed ones.
pub(crate) fn tag<T>(markets: &[MarketId], results: Vec<MarketResult<T>>) -> Vec<MarketOutcome<T>> {
    markets
        .iter()
        .zip(results)
        .map(|(market, result)| match result {
            Ok(value) => MarketOutcome::Ok(value),
            Err(e) => MarketOutcome::Failed {
                market: market.clone(),
                reason: e.to_string(),
            },
        })
        .collect()
}
