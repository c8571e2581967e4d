use std::path::Path;
use std::time::Duration;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::browser::{Browser, BrowserSession};
use crate::error::ScrapeError;

/// A fixed desktop UA so the dashboard serves its normal layout instead of
/// a headless or mobile variant.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Launches real headless Chrome/Chromium sessions over CDP, one process
/// per scrape attempt.
pub struct ChromeBrowser {
    executable: String,
}

impl ChromeBrowser {
    pub fn new(executable: impl Into<String>) -> Self {
        Self { executable: executable.into() }
    }

    /// Resolves the browser binary: `CHROME_EXECUTABLE` first, then `PATH`,
    /// then well-known install locations.
    pub fn discover() -> anyhow::Result<Self> {
        let executable = find_chrome_executable()
            .context("No Chrome/Chromium executable found; set CHROME_EXECUTABLE")?;
        debug!("Using browser executable {}", executable);
        Ok(Self::new(executable))
    }

    fn build_config(&self) -> anyhow::Result<BrowserConfig> {
        BrowserConfig::builder()
            .chrome_executable(&self.executable)
            .window_size(1366, 768)
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-gpu")
            .arg("--no-first-run")
            .arg("--mute-audio")
            .arg(format!("--user-agent={}", USER_AGENT))
            .build()
            .map_err(|e| anyhow!("Failed to build browser config: {}", e))
    }
}

pub fn find_chrome_executable() -> Option<String> {
    if let Ok(explicit) = std::env::var("CHROME_EXECUTABLE") {
        if Path::new(&explicit).exists() {
            return Some(explicit);
        }
        warn!("CHROME_EXECUTABLE points at {}, which does not exist", explicit);
    }

    let names = ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser", "chrome"];

    if let Ok(path_var) = std::env::var("PATH") {
        for dir in std::env::split_paths(&path_var) {
            for name in names {
                let candidate = dir.join(name);
                if candidate.exists() {
                    return Some(candidate.to_string_lossy().to_string());
                }
            }
        }
    }

    for candidate in [
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/usr/local/bin/chromium",
    ] {
        if Path::new(candidate).exists() {
            return Some(candidate.to_string());
        }
    }

    None
}

pub struct ChromeSession {
    browser: CdpBrowser,
    page: Page,
    events: JoinHandle<()>,
}

#[async_trait]
impl Browser for ChromeBrowser {
    type Session = ChromeSession;

    async fn launch(&self) -> Result<ChromeSession, ScrapeError> {
        let config = self.build_config()?;

        let (mut browser, mut handler) = CdpBrowser::launch(config)
            .await
            .map_err(|e| anyhow!("Failed to launch browser {}: {}", self.executable, e))?;

        // The CDP event stream must be drained for the session to make
        // progress at all.
        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler error: {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                if let Err(close_err) = browser.close().await {
                    warn!("Browser close after failed tab open also failed: {}", close_err);
                }
                events.abort();
                return Err(anyhow!("Failed to open scraping tab: {}", e).into());
            }
        };

        Ok(ChromeSession { browser, page, events })
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn navigate(&mut self, url: &str, nav_timeout: Duration) -> Result<(), ScrapeError> {
        match timeout(nav_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(anyhow!("Navigation to {} failed: {}", url, e).into()),
            Err(_) => Err(ScrapeError::NavigationTimeout {
                url: url.to_string(),
                timeout: nav_timeout,
            }),
        }
    }

    async fn find_field(&mut self, selector: &str) -> Result<bool, ScrapeError> {
        // chromiumoxide reports a missing node as an error; any failure to
        // resolve the selector counts as absence.
        Ok(self.page.find_element(selector).await.is_ok())
    }

    async fn type_text(&mut self, selector: &str, text: &str) -> Result<(), ScrapeError> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| anyhow!("Selector {} not found: {}", selector, e))?;
        element
            .click()
            .await
            .map_err(|e| anyhow!("Failed to focus {}: {}", selector, e))?;
        element
            .type_str(text)
            .await
            .map_err(|e| anyhow!("Failed to type into {}: {}", selector, e))?;
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> Result<(), ScrapeError> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| anyhow!("Selector {} not found: {}", selector, e))?;
        element
            .click()
            .await
            .map_err(|e| anyhow!("Failed to click {}: {}", selector, e))?;
        Ok(())
    }

    async fn wait_for_navigation(&mut self, wait: Duration) -> Result<(), ScrapeError> {
        match timeout(wait, self.page.wait_for_navigation()).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(anyhow!("Navigation wait failed: {}", e).into()),
            Err(_) => Err(anyhow!("Navigation wait timed out after {:?}", wait).into()),
        }
    }

    async fn screenshot(&mut self, path: &Path) -> Result<(), ScrapeError> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let bytes = self
            .page
            .screenshot(params)
            .await
            .map_err(|e| anyhow!("Screenshot capture failed: {}", e))?;

        tokio::fs::write(path, &bytes)
            .await
            .with_context(|| format!("Failed to write screenshot to {}", path.display()))?;
        Ok(())
    }

    async fn extract_text(&mut self) -> Result<String, ScrapeError> {
        let text = self
            .page
            .evaluate("document.body.innerText")
            .await
            .map_err(|e| anyhow!("Text extraction failed: {}", e))?
            .into_value::<String>()
            .map_err(|e| anyhow!("Page text was not a string: {}", e))?;
        Ok(text)
    }

    async fn close(&mut self) -> Result<(), ScrapeError> {
        let result = self.browser.close().await;
        self.events.abort();
        result.map_err(|e| anyhow!("Browser close failed: {}", e))?;
        Ok(())
    }
}
