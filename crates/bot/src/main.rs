use std::sync::Arc;

use dotenvy::dotenv;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use common::logger;
use common::notify::Notifier;
use engine::cycle::SignalCycle;
use engine::dispatch::Dispatcher;
use engine::pacer::Pacer;
use engine::retry::Retrier;
use engine::scheduler::Scheduler;
use notify::{LogNotifier, TelegramNotifier};
use scraper::remote::ChromeBrowser;
use scraper::session::{LoginConfig, SessionManager};
use storage::{ArtifactStore, SignalLog};

use crate::commands::Command;
use crate::config::BotConfig;

mod commands;
mod config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::setup_logger();
    dotenv().ok();
    debug!("Signal bot starting up...");

    let config = BotConfig::from_env()?;

    // Telegram is optional; without it every notification goes to the log.
    let notifier: Arc<dyn Notifier> = match TelegramNotifier::from_env() {
        Ok(telegram) => Arc::new(telegram),
        Err(e) => {
            warn!("Telegram not configured ({}), running log-only", e);
            Arc::new(LogNotifier)
        }
    };

    let browser = ChromeBrowser::discover()?;
    let artifacts = ArtifactStore::new(&config.artifact_dir)?;
    let login = LoginConfig {
        login_url: config.login_url.clone(),
        email: config.email.clone(),
        password: config.password.clone(),
        nav_timeout: config.nav_timeout,
    };
    let session = SessionManager::new(browser, login, artifacts).with_notifier(notifier.clone());

    let cycle = SignalCycle::new(
        Arc::new(session),
        Retrier::new(notifier.clone()),
        Dispatcher::new(notifier.clone(), Pacer::new(config.decision_delay)),
        config.signal_limit,
    )
    .with_signal_log(SignalLog::new(&config.chat_log_path));

    let scheduler = Scheduler::new(Arc::new(cycle), config.interval, notifier.clone());

    let (command_tx, command_rx) = mpsc::channel::<Command>(8);
    tokio::spawn(commands::run_command_loop(command_rx, scheduler.clone()));

    command_tx.send(Command::Activate).await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping...");

    command_tx.send(Command::Deactivate).await?;
    scheduler.wait_until_idle().await;

    info!("Signal bot stopped.");
    Ok(())
}
