use std::path::Path;

use async_trait::async_trait;

/// Outbound notification channel shared by every service. Callers treat
/// delivery as best-effort: failures are logged at the call site, never
/// propagated into the scrape flow.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> anyhow::Result<()>;

    /// Deliver a file from disk (checkpoint screenshots) with a caption.
    async fn send_artifact(&self, path: &Path, caption: &str) -> anyhow::Result<()>;
}
