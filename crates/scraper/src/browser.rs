use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScrapeError;

/// Launches one fresh browser process per scrape attempt. Sessions are
/// never pooled or reused across attempts.
#[async_trait]
pub trait Browser: Send + Sync {
    type Session: BrowserSession;

    async fn launch(&self) -> Result<Self::Session, ScrapeError>;
}

/// One live browser tab. Implementations classify their own failures:
/// navigation deadlines map to `NavigationTimeout`, everything else to
/// `Unexpected`.
#[async_trait]
pub trait BrowserSession: Send {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), ScrapeError>;

    /// Probe whether a selector currently resolves to an element.
    async fn find_field(&mut self, selector: &str) -> Result<bool, ScrapeError>;

    async fn type_text(&mut self, selector: &str, text: &str) -> Result<(), ScrapeError>;

    async fn click(&mut self, selector: &str) -> Result<(), ScrapeError>;

    /// Wait for the page load triggered by the last interaction.
    async fn wait_for_navigation(&mut self, timeout: Duration) -> Result<(), ScrapeError>;

    /// Capture the current viewport as a PNG at `path`.
    async fn screenshot(&mut self, path: &Path) -> Result<(), ScrapeError>;

    /// The page's visible text content, as the user would read it.
    async fn extract_text(&mut self) -> Result<String, ScrapeError>;

    async fn close(&mut self) -> Result<(), ScrapeError>;
}
