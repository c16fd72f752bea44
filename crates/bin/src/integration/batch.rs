//! Batch earnings runs over many tickers.
//!
//! Tickers are independent: each gets its own [`TickerContext`] and the only
//! shared state is the rate-limited source.

use futures::stream::{self, StreamExt};
use hobart::{FactsSource, TickerContext};
use hobart_earnings::{EarningsError, EarningsSeries, NormalizerConfig};
use indicatif::ProgressBar;

/// Default number of tickers in flight.
pub(crate) const DEFAULT_CONCURRENCY: usize = 4;

/// Outcome for one ticker.
#[derive(Debug)]
pub(crate) struct BatchOutcome {
    pub(crate) ticker: String,
    pub(crate) result: Result<EarningsSeries, EarningsError>,
}

/// Run the earnings pipeline for every ticker, at most `concurrency` at once.
///
/// Outcomes are returned in input order.
pub(crate) async fn run_batch<S: FactsSource + Sync>(
    source: &S,
    tickers: &[String],
    concept: &str,
    normalizer: NormalizerConfig,
    concurrency: usize,
    progress: Option<&ProgressBar>,
) -> Vec<BatchOutcome> {
    let mut outcomes: Vec<(usize, BatchOutcome)> = stream::iter(tickers.iter().enumerate())
        .map(|(index, ticker)| {
            let ctx = TickerContext::new(ticker)
                .with_concept(concept)
                .with_normalizer(normalizer);
            async move {
                let result = ctx.earnings(source).await;
                (
                    index,
                    BatchOutcome {
                        ticker: ctx.ticker().to_string(),
                        result,
                    },
                )
            }
        })
        .buffer_unordered(concurrency.max(1))
        .inspect(|(_, outcome)| {
            if let Some(pb) = progress {
                if let Err(e) = &outcome.result {
                    pb.suspend(|| eprintln!("Warning: {}", e));
                }
                pb.set_message(outcome.ticker.clone());
                pb.inc(1);
            }
        })
        .collect()
        .await;

    outcomes.sort_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}
