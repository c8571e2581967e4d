use std::path::{Path, PathBuf};

use chrono::Utc;
use common::models::Signal;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Append-only activity log, one line per dispatched chat signal. The file
/// is plain text so it can be tailed next to the bot.
pub struct SignalLog {
    path: PathBuf,
}

impl SignalLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one line per signal, all stamped with the same capture time.
    pub async fn append(&self, signals: &[Signal]) -> anyhow::Result<()> {
        if signals.is_empty() {
            return Ok(());
        }

        let stamp = Utc::now().to_rfc3339();
        let mut block = String::new();
        for signal in signals {
            block.push_str(&format!(
                "[{}] ({}) Asset: {}, Decision: {}, Raw: {}\n",
                stamp, signal.strength, signal.asset, signal.decision, signal.raw
            ));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(block.as_bytes()).await?;

        debug!("Appended {} signals to {}", signals.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::{Direction, Strength, UNKNOWN_ASSET};

    fn sample(decision: Direction, raw: &str) -> Signal {
        Signal {
            asset: UNKNOWN_ASSET.to_string(),
            decision,
            strength: Strength::Normal,
            raw: raw.to_string(),
        }
    }

    #[tokio::test]
    async fn test_append_writes_one_line_per_signal() {
        let path = std::env::temp_dir().join(format!("signal_log_test_{}.txt", std::process::id()));
        std::fs::remove_file(&path).ok();

        let log = SignalLog::new(&path);
        log.append(&[
            sample(Direction::Up, "strong buy now"),
            sample(Direction::Down, "sell quickly"),
        ])
        .await
        .unwrap();
        log.append(&[sample(Direction::Up, "another call")]).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines.len(), 3, "two appends should accumulate three lines");
        assert!(lines[0].contains("Decision: UP"));
        assert!(lines[0].contains("Raw: strong buy now"));
        assert!(lines[1].contains("Decision: DOWN"));
        assert!(lines[2].contains("Raw: another call"));

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_append_with_no_signals_does_not_create_the_file() {
        let path = std::env::temp_dir().join(format!("signal_log_empty_test_{}.txt", std::process::id()));
        std::fs::remove_file(&path).ok();

        let log = SignalLog::new(&path);
        log.append(&[]).await.unwrap();

        assert!(!path.exists(), "empty appends should leave no file behind");
    }
}
