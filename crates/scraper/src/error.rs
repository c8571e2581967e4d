use std::time::Duration;

use thiserror::Error;

/// Everything that can end a scrape attempt early. Every variant is caught
/// at the attempt boundary and counted against the retry budget; nothing
/// here escapes a cycle.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Navigation to {url} timed out after {timeout:?}")]
    NavigationTimeout { url: String, timeout: Duration },

    #[error("Login rejected: form still present after submitting credentials")]
    AuthenticationFailed,

    #[error("No tradable assets detected on the dashboard")]
    NoDataFound,

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}
