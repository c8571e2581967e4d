use std::path::Path;

use async_trait::async_trait;
use common::notify::Notifier;
use tracing::info;

/// Fallback notifier used when no Telegram chat is configured. Messages
/// land in the process log so the bot can run dry.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, text: &str) -> anyhow::Result<()> {
        info!("[notify] {}", text);
        Ok(())
    }

    async fn send_artifact(&self, path: &Path, caption: &str) -> anyhow::Result<()> {
        info!("[notify] artifact {} ({})", path.display(), caption);
        Ok(())
    }
}
