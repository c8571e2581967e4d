use std::fmt;
use std::future::Future;
use std::sync::Arc;

use common::notify::Notifier;
use scraper::ScrapeError;
use tracing::{error, info, warn};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Which sub-fetch a retry loop is driving. Only used for wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    MarketData,
    ChatSignals,
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchKind::MarketData => write!(f, "market data"),
            FetchKind::ChatSignals => write!(f, "chat signals"),
        }
    }
}

/// Runs a fallible fetch up to `max_attempts` times, narrating progress
/// through the notifier. Exhaustion yields an empty vector, so downstream
/// an exhausted fetch and a legitimately empty page look the same.
pub struct Retrier {
    notifier: Arc<dyn Notifier>,
    max_attempts: u32,
}

impl Retrier {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier, max_attempts: DEFAULT_MAX_ATTEMPTS }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub async fn run<T, F, Fut>(&self, kind: FetchKind, operation: F) -> Vec<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Vec<T>, ScrapeError>>,
    {
        for attempt in 1..=self.max_attempts {
            match operation().await {
                Ok(items) => {
                    if attempt > 1 {
                        info!("Fetching {} succeeded on retry #{}", kind, attempt);
                        self.notify(&format!("✅ Fetching {} succeeded on retry #{}.", kind, attempt))
                            .await;
                    }
                    return items;
                }
                Err(e) => {
                    error!(
                        "Fetching {} failed on attempt {}/{}: {}",
                        kind, attempt, self.max_attempts, e
                    );
                    if attempt < self.max_attempts {
                        self.notify(&format!(
                            "⚠️ Fetching {} failed on attempt #{}, retrying...",
                            kind, attempt
                        ))
                        .await;
                    } else {
                        self.notify(&format!(
                            "❌ Fetching {} failed after {} attempts, giving up for this cycle.",
                            kind, self.max_attempts
                        ))
                        .await;
                    }
                }
            }
        }

        Vec::new()
    }

    async fn notify(&self, text: &str) {
        if let Err(e) = self.notifier.send(text).await {
            warn!("Failed to send retry notification: {}", e);
        }
    }
}
