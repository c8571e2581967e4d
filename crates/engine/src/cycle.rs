use std::sync::Arc;

use async_trait::async_trait;
use scraper::traits::SignalSource;
use storage::SignalLog;
use tracing::{info, warn};

use crate::dispatch::Dispatcher;
use crate::retry::{FetchKind, Retrier};
use crate::scheduler::CycleRunner;

/// One full scrape cycle: market data first, then chat signals, each behind
/// the retry wrapper. The two sub-fetches are independent; one failing never
/// blocks the other.
pub struct SignalCycle {
    source: Arc<dyn SignalSource>,
    retrier: Retrier,
    dispatcher: Dispatcher,
    signal_log: Option<SignalLog>,
    signal_limit: usize,
}

impl SignalCycle {
    pub fn new(
        source: Arc<dyn SignalSource>,
        retrier: Retrier,
        dispatcher: Dispatcher,
        signal_limit: usize,
    ) -> Self {
        Self {
            source,
            retrier,
            dispatcher,
            signal_log: None,
            signal_limit,
        }
    }

    /// Also append every dispatched chat signal to this activity log.
    pub fn with_signal_log(mut self, log: SignalLog) -> Self {
        self.signal_log = Some(log);
        self
    }
}

#[async_trait]
impl CycleRunner for SignalCycle {
    async fn run_cycle(&self, first_run: bool) {
        info!("Scrape cycle started (first_run: {})", first_run);

        let source = self.source.clone();
        let market = self
            .retrier
            .run(FetchKind::MarketData, || {
                let source = source.clone();
                async move { source.fetch_market_data().await }
            })
            .await;
        self.dispatcher.dispatch_market_data(&market, !first_run).await;

        let source = self.source.clone();
        let limit = self.signal_limit;
        let signals = self
            .retrier
            .run(FetchKind::ChatSignals, || {
                let source = source.clone();
                async move { source.fetch_signals(limit).await }
            })
            .await;

        if let Some(ref log) = self.signal_log {
            if let Err(e) = log.append(&signals).await {
                warn!("Failed to append signals to the activity log: {}", e);
            }
        }

        self.dispatcher.dispatch_signals(&signals, !first_run).await;

        info!(
            "Scrape cycle finished: {} market items, {} chat signals",
            market.len(),
            signals.len()
        );
    }
}
