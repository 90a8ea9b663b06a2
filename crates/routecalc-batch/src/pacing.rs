//! Fixed-delay pacing between provider calls and between batch writes.

use std::time::Duration;

use routecalc_core::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    call_delay: Duration,
    batch_delay: Duration,
}

impl Pacer {
    #[must_use]
    pub fn new(call_delay_ms: u64, batch_delay_ms: u64) -> Self {
        Self {
            call_delay: Duration::from_millis(call_delay_ms),
            batch_delay: Duration::from_millis(batch_delay_ms),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.call_delay_ms, config.batch_delay_ms)
    }

    /// No delays at all.
    #[must_use]
    pub fn unpaced() -> Self {
        Self::new(0, 0)
    }

    /// Sleeps after a provider call, whatever its outcome.
    pub async fn after_call(&self) {
        sleep_nonzero(self.call_delay).await;
    }

    /// Sleeps between two batch writes.
    pub async fn between_batches(&self) {
        sleep_nonzero(self.batch_delay).await;
    }
}

async fn sleep_nonzero(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
