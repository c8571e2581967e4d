use std::time::Duration;

use tokio::time::sleep;

/// Fixed pause inserted after each dispatched item so downstream consumers
/// (humans, rate-limited chats) can keep up. A zero delay disables pacing,
/// which is how tests run.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn disabled() -> Self {
        Self { delay: Duration::ZERO }
    }

    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_pause_sleeps_for_the_configured_delay() {
        let before = tokio::time::Instant::now();
        Pacer::new(Duration::from_secs(30)).pause().await;
        assert_eq!(before.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_pacer_returns_immediately() {
        let before = tokio::time::Instant::now();
        Pacer::disabled().pause().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }
}
