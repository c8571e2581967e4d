use std::sync::Arc;

use common::models::{MarketDatum, Signal};
use common::notify::Notifier;
use tracing::warn;

use crate::pacer::Pacer;

pub const NO_SIGNALS_MESSAGE: &str = "⚠️ No signals available right now.";
pub const NO_MARKET_DATA_MESSAGE: &str = "ℹ️ No market data detected this cycle.";

/// Formats per-item messages and forwards them through the notifier, with a
/// pacing pause after every item. Send failures are logged and dropped.
pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
    pacer: Pacer,
}

impl Dispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, pacer: Pacer) -> Self {
        Self { notifier, pacer }
    }

    /// `report_empty` is false on the first cycle after activation so a
    /// quiet dashboard does not greet the user with a warning.
    pub async fn dispatch_market_data(&self, data: &[MarketDatum], report_empty: bool) {
        if data.is_empty() {
            if report_empty {
                self.send(NO_MARKET_DATA_MESSAGE).await;
            }
            return;
        }

        for datum in data {
            self.send(&market_message(datum)).await;
            self.pacer.pause().await;
        }
    }

    pub async fn dispatch_signals(&self, signals: &[Signal], report_empty: bool) {
        if signals.is_empty() {
            if report_empty {
                self.send(NO_SIGNALS_MESSAGE).await;
            }
            return;
        }

        for signal in signals {
            self.send(&signal_message(signal)).await;
            self.pacer.pause().await;
        }
    }

    async fn send(&self, text: &str) {
        if let Err(e) = self.notifier.send(text).await {
            warn!("Failed to send notification: {}", e);
        }
    }
}

pub fn market_message(datum: &MarketDatum) -> String {
    format!("📊 *Asset:* {}\n📌 *Decision:* {}", datum.asset, datum.decision)
}

pub fn signal_message(signal: &Signal) -> String {
    format!(
        "📢 *{} signal* ({})\n📈 *Asset:* {}\n💬 {}",
        signal.decision, signal.strength, signal.asset, signal.raw
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::{Direction, Strength, TradeSide, UNKNOWN_ASSET};

    use crate::testing::RecordingNotifier;

    fn datum(asset: &str, decision: TradeSide) -> MarketDatum {
        MarketDatum { asset: asset.to_string(), decision }
    }

    fn signal(decision: Direction, strength: Strength, raw: &str) -> Signal {
        Signal {
            asset: UNKNOWN_ASSET.to_string(),
            decision,
            strength,
            raw: raw.to_string(),
        }
    }

    #[test]
    fn test_market_message_carries_asset_and_decision() {
        let text = market_message(&datum("EURUSD", TradeSide::Buy));
        assert!(text.contains("EURUSD"));
        assert!(text.contains("BUY"));
    }

    #[test]
    fn test_signal_message_carries_decision_strength_and_raw_line() {
        let text = signal_message(&signal(Direction::Down, Strength::Strong, "strong sell here"));
        assert!(text.contains("DOWN"));
        assert!(text.contains("Strong"));
        assert!(text.contains("strong sell here"));
    }

    #[tokio::test]
    async fn test_items_are_sent_in_order() {
        let recorder = Arc::new(RecordingNotifier::new());
        let dispatcher = Dispatcher::new(recorder.clone(), Pacer::disabled());

        dispatcher
            .dispatch_market_data(
                &[datum("AUDUSD", TradeSide::Sell), datum("EURUSD", TradeSide::Buy)],
                true,
            )
            .await;

        let transcript = recorder.transcript();
        assert_eq!(transcript.len(), 2);
        assert!(transcript[0].contains("AUDUSD"));
        assert!(transcript[1].contains("EURUSD"));
    }

    #[tokio::test]
    async fn test_empty_results_are_reported_when_asked() {
        let recorder = Arc::new(RecordingNotifier::new());
        let dispatcher = Dispatcher::new(recorder.clone(), Pacer::disabled());

        dispatcher.dispatch_market_data(&[], true).await;
        dispatcher.dispatch_signals(&[], true).await;

        let transcript = recorder.transcript();
        assert_eq!(transcript, [NO_MARKET_DATA_MESSAGE, NO_SIGNALS_MESSAGE]);
    }

    #[tokio::test]
    async fn test_empty_results_are_suppressed_on_the_first_cycle() {
        let recorder = Arc::new(RecordingNotifier::new());
        let dispatcher = Dispatcher::new(recorder.clone(), Pacer::disabled());

        dispatcher.dispatch_market_data(&[], false).await;
        dispatcher.dispatch_signals(&[], false).await;

        assert!(recorder.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_send_failures_are_swallowed() {
        let recorder = Arc::new(RecordingNotifier::failing());
        let dispatcher = Dispatcher::new(recorder.clone(), Pacer::disabled());

        // Must simply return; a failing transport never panics or errors.
        dispatcher
            .dispatch_signals(&[signal(Direction::Up, Strength::Normal, "buy")], true)
            .await;

        assert!(recorder.transcript().is_empty());
    }
}
