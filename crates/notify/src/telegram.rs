use std::env;
use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use common::notify::Notifier;
use teloxide::payloads::{SendMessageSetters, SendPhotoSetters};
use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode};
use tracing::info;

/// Delivers messages and checkpoint screenshots to one Telegram chat.
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    pub fn new(token: &str, chat_id: i64) -> Self {
        Self {
            bot: Bot::new(token),
            chat_id: ChatId(chat_id),
        }
    }

    /// Builds the notifier from TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID. The
    /// caller decides whether missing config is fatal or means running
    /// log-only.
    pub fn from_env() -> anyhow::Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN not set in .env")?;
        let chat_id = env::var("TELEGRAM_CHAT_ID")
            .context("TELEGRAM_CHAT_ID not set in .env")?
            .parse::<i64>()
            .context("TELEGRAM_CHAT_ID must be a number")?;

        info!("Telegram notifier configured for chat {}", chat_id);
        Ok(Self::new(&token, chat_id))
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> anyhow::Result<()> {
        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Markdown)
            .await
            .context("Failed to send Telegram message")?;
        Ok(())
    }

    async fn send_artifact(&self, path: &Path, caption: &str) -> anyhow::Result<()> {
        self.bot
            .send_photo(self.chat_id, InputFile::file(path.to_path_buf()))
            .caption(caption.to_string())
            .await
            .context("Failed to send Telegram photo")?;
        Ok(())
    }
}
