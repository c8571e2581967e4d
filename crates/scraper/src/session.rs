use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::models::{MarketDatum, Signal};
use common::notify::Notifier;
use storage::ArtifactStore;
use tracing::{debug, info, warn};

use crate::browser::{Browser, BrowserSession};
use crate::error::ScrapeError;
use crate::extract::extract_signals;
use crate::scan::scan_market;
use crate::traits::SignalSource;

pub const EMAIL_SELECTOR: &str = "#email";
pub const PASSWORD_SELECTOR: &str = "#password";
pub const SUBMIT_SELECTOR: &str = "button[type=\"submit\"]";

/// How long to wait for a post-submit page load before assuming the site
/// completed the login in place.
const SUBMIT_NAV_TIMEOUT: Duration = Duration::from_secs(30);

/// Credentials and target for the login flow. Blank credentials are legal:
/// the fill step is skipped and verification decides what that means.
#[derive(Debug, Clone)]
pub struct LoginConfig {
    pub login_url: String,
    pub email: String,
    pub password: String,
    pub nav_timeout: Duration,
}

/// Named points in a scrape attempt where a screenshot is captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checkpoint {
    NavigationTimeout,
    LoginFailed,
    LoginSuccess,
    Unexpected,
    NoAssets,
    Asset(String),
}

impl Checkpoint {
    /// File stem of the screenshot under the artifact directory.
    pub fn name(&self) -> String {
        match self {
            Checkpoint::NavigationTimeout => "error_timeout".to_string(),
            Checkpoint::LoginFailed => "error_login".to_string(),
            Checkpoint::LoginSuccess => "login_success".to_string(),
            Checkpoint::Unexpected => "error_unexpected".to_string(),
            Checkpoint::NoAssets => "error_no_assets".to_string(),
            Checkpoint::Asset(symbol) => format!("asset_{}", symbol),
        }
    }

    fn caption(&self) -> String {
        match self {
            Checkpoint::NavigationTimeout => "Navigation timed out before the dashboard loaded".to_string(),
            Checkpoint::LoginFailed => "Login failed: form still present after submit".to_string(),
            Checkpoint::LoginSuccess => "Logged in, dashboard reachable".to_string(),
            Checkpoint::Unexpected => "Unexpected failure during the scrape attempt".to_string(),
            Checkpoint::NoAssets => "No tradable assets visible on the dashboard".to_string(),
            Checkpoint::Asset(symbol) => format!("Detected asset {}", symbol),
        }
    }
}

/// What to do with the page once the attempt is authenticated.
enum FetchJob {
    MarketScan,
    ChatSignals(usize),
}

enum FetchOutcome {
    Market(Vec<MarketDatum>),
    Signals(Vec<Signal>),
}

/// One login-and-fetch try: the live session plus the checkpoints captured
/// so far. Finished only through `release`, which closes the browser.
struct ScrapeAttempt<S: BrowserSession> {
    session: S,
    checkpoints: Vec<String>,
}

impl<S: BrowserSession> ScrapeAttempt<S> {
    fn new(session: S) -> Self {
        Self { session, checkpoints: Vec::new() }
    }

    fn record(&mut self, checkpoint: &Checkpoint) {
        self.checkpoints.push(checkpoint.name());
    }

    async fn release(mut self) {
        if let Err(e) = self.session.close().await {
            warn!("Failed to close browser session: {}", e);
        }
        debug!("Attempt released, checkpoints captured: {:?}", self.checkpoints);
    }
}

/// Drives one fresh browser session per attempt through the login flow and
/// then runs a fetch against the authenticated page. The session is released
/// on every exit path; the run guard upstream ensures attempts never
/// overlap.
pub struct SessionManager<B: Browser> {
    browser: B,
    config: LoginConfig,
    artifacts: ArtifactStore,
    notifier: Option<Arc<dyn Notifier>>,
}

impl<B: Browser> SessionManager<B> {
    pub fn new(browser: B, config: LoginConfig, artifacts: ArtifactStore) -> Self {
        Self { browser, config, artifacts, notifier: None }
    }

    /// Forward every checkpoint screenshot through this notifier.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    async fn run_attempt(&self, job: FetchJob) -> Result<FetchOutcome, ScrapeError> {
        // A failed launch leaves nothing to release.
        let session = self.browser.launch().await?;
        let mut attempt = ScrapeAttempt::new(session);

        let result = self.drive(&mut attempt, job).await;

        if let Err(ScrapeError::Unexpected(ref e)) = result {
            warn!("Scrape attempt failed unexpectedly: {:#}", e);
            self.checkpoint(&mut attempt, Checkpoint::Unexpected).await;
        }

        attempt.release().await;
        result
    }

    /// The attempt itself: navigate, detect the login form, authenticate if
    /// needed, verify, then fetch.
    async fn drive(
        &self,
        attempt: &mut ScrapeAttempt<B::Session>,
        job: FetchJob,
    ) -> Result<FetchOutcome, ScrapeError> {
        let url = &self.config.login_url;
        debug!("Navigating to {}", url);

        match attempt.session.navigate(url, self.config.nav_timeout).await {
            Ok(()) => {}
            Err(e @ ScrapeError::NavigationTimeout { .. }) => {
                self.checkpoint(attempt, Checkpoint::NavigationTimeout).await;
                return Err(e);
            }
            Err(e) => return Err(e),
        }

        if attempt.session.find_field(EMAIL_SELECTOR).await? {
            self.fill_and_submit(attempt).await?;

            // The form surviving the submit means the site rejected us
            // (bad credentials, captcha, layout change).
            if attempt.session.find_field(EMAIL_SELECTOR).await? {
                self.checkpoint(attempt, Checkpoint::LoginFailed).await;
                return Err(ScrapeError::AuthenticationFailed);
            }
        } else {
            debug!("No login form found, session already authenticated");
        }

        self.checkpoint(attempt, Checkpoint::LoginSuccess).await;

        match job {
            FetchJob::MarketScan => {
                let text = attempt.session.extract_text().await?;
                let data = scan_market(&text);

                if data.is_empty() {
                    self.checkpoint(attempt, Checkpoint::NoAssets).await;
                    return Err(ScrapeError::NoDataFound);
                }
                for datum in &data {
                    self.checkpoint(attempt, Checkpoint::Asset(datum.asset.clone())).await;
                }

                info!("Dashboard scan found {} assets", data.len());
                Ok(FetchOutcome::Market(data))
            }
            FetchJob::ChatSignals(limit) => {
                let text = attempt.session.extract_text().await?;
                let signals = extract_signals(&text, limit);

                info!("Extracted {} chat signals (limit {})", signals.len(), limit);
                Ok(FetchOutcome::Signals(signals))
            }
        }
    }

    async fn fill_and_submit(&self, attempt: &mut ScrapeAttempt<B::Session>) -> Result<(), ScrapeError> {
        if self.config.email.is_empty() || self.config.password.is_empty() {
            warn!("Login form present but no credentials configured, skipping fill");
            return Ok(());
        }

        info!("Login form detected, submitting credentials");
        attempt.session.type_text(EMAIL_SELECTOR, &self.config.email).await?;
        attempt.session.type_text(PASSWORD_SELECTOR, &self.config.password).await?;
        attempt.session.click(SUBMIT_SELECTOR).await?;

        // Some deployments log in via AJAX with no page load at all; a
        // failed wait is not a failed login.
        if let Err(e) = attempt.session.wait_for_navigation(SUBMIT_NAV_TIMEOUT).await {
            warn!("Post-submit navigation wait failed, continuing: {}", e);
        }

        Ok(())
    }

    /// Screenshot the page for a checkpoint and forward it through the
    /// notifier when one is configured. Never fails the attempt.
    async fn checkpoint(&self, attempt: &mut ScrapeAttempt<B::Session>, checkpoint: Checkpoint) {
        let path = self.artifacts.path_for(&checkpoint.name());

        if let Err(e) = attempt.session.screenshot(&path).await {
            warn!("Failed to capture checkpoint {}: {}", checkpoint.name(), e);
            return;
        }
        attempt.record(&checkpoint);

        if let Some(ref notifier) = self.notifier {
            if let Err(e) = notifier.send_artifact(&path, &checkpoint.caption()).await {
                warn!("Failed to forward checkpoint {}: {}", checkpoint.name(), e);
            }
        }
    }
}

#[async_trait]
impl<B: Browser> SignalSource for SessionManager<B> {
    async fn fetch_market_data(&self) -> Result<Vec<MarketDatum>, ScrapeError> {
        match self.run_attempt(FetchJob::MarketScan).await? {
            FetchOutcome::Market(data) => Ok(data),
            FetchOutcome::Signals(_) => unreachable!("market scan job returned chat signals"),
        }
    }

    async fn fetch_signals(&self, limit: usize) -> Result<Vec<Signal>, ScrapeError> {
        match self.run_attempt(FetchJob::ChatSignals(limit)).await? {
            FetchOutcome::Signals(signals) => Ok(signals),
            FetchOutcome::Market(_) => unreachable!("chat signal job returned market data"),
        }
    }
}
