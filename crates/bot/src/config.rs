use std::env;
use std::time::Duration;

use anyhow::Context;

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub login_url: String,
    pub email: String,
    pub password: String,
    pub interval: Duration,
    pub decision_delay: Duration,
    pub signal_limit: usize,
    pub nav_timeout: Duration,
    pub artifact_dir: String,
    pub chat_log_path: String,
}

impl BotConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let login_url =
            env::var("DASHBOARD_LOGIN_URL").context("DASHBOARD_LOGIN_URL not set in .env")?;

        // Blank credentials are allowed; the session manager skips the fill
        // and lets login verification decide what that means.
        let email = env::var("DASHBOARD_EMAIL").unwrap_or_default();
        let password = env::var("DASHBOARD_PASSWORD").unwrap_or_default();

        let interval_minutes = parse_or("SIGNAL_INTERVAL_MINUTES", 5)?.max(1);
        let delay_seconds = parse_or("DECISION_DELAY_SECONDS", 30)?;
        let signal_limit = parse_or("SIGNAL_LIMIT", 5)?;
        let nav_timeout_seconds = parse_or("NAV_TIMEOUT_SECONDS", 180)?;

        Ok(Self {
            login_url,
            email,
            password,
            interval: Duration::from_secs(interval_minutes * 60),
            decision_delay: Duration::from_secs(delay_seconds),
            signal_limit: signal_limit as usize,
            nav_timeout: Duration::from_secs(nav_timeout_seconds),
            artifact_dir: env::var("ARTIFACT_DIR").unwrap_or_else(|_| "artifacts".to_string()),
            chat_log_path: env::var("CHAT_LOG_PATH").unwrap_or_else(|_| "chat-log.txt".to_string()),
        })
    }
}

fn parse_or(key: &str, default: u64) -> anyhow::Result<u64> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("{} must be a non-negative integer, got '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}
