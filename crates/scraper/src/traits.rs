use async_trait::async_trait;
use common::models::{MarketDatum, Signal};

use crate::error::ScrapeError;

/// The fetch seam between the engine and the dashboard. Each call drives a
/// complete login-and-scrape attempt underneath; the retry wrapper upstream
/// decides how many attempts a cycle gets.
#[async_trait]
pub trait SignalSource: Send + Sync {
    async fn fetch_market_data(&self) -> Result<Vec<MarketDatum>, ScrapeError>;

    async fn fetch_signals(&self, limit: usize) -> Result<Vec<Signal>, ScrapeError>;
}
