//! Shared test doubles for the engine crate.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use common::models::{MarketDatum, Signal};
use common::notify::Notifier;
use mockall::mock;
use scraper::ScrapeError;
use scraper::traits::SignalSource;

mock! {
    pub Notify {}

    #[async_trait]
    impl Notifier for Notify {
        async fn send(&self, text: &str) -> anyhow::Result<()>;
        async fn send_artifact(&self, path: &Path, caption: &str) -> anyhow::Result<()>;
    }
}

mock! {
    pub Source {}

    #[async_trait]
    impl SignalSource for Source {
        async fn fetch_market_data(&self) -> Result<Vec<MarketDatum>, ScrapeError>;
        async fn fetch_signals(&self, limit: usize) -> Result<Vec<Signal>, ScrapeError>;
    }
}

/// Collects every sent message in order; used where tests assert on the
/// transcript rather than on call counts.
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<String>>,
    pub fail_sends: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self { sent: Mutex::new(Vec::new()), fail_sends: false }
    }

    pub fn failing() -> Self {
        Self { sent: Mutex::new(Vec::new()), fail_sends: true }
    }

    pub fn transcript(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> anyhow::Result<()> {
        if self.fail_sends {
            anyhow::bail!("transport down");
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn send_artifact(&self, _path: &Path, caption: &str) -> anyhow::Result<()> {
        if self.fail_sends {
            anyhow::bail!("transport down");
        }
        self.sent.lock().unwrap().push(format!("artifact:{}", caption));
        Ok(())
    }
}
