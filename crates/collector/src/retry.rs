//! Bounded retry with exponential backoff

use crate::{CollectorError, Result};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How often and how patiently transient failures are retried
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    pub multiplier: Duration,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            multiplier: Duration::from_secs(1),
            min_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// A policy that never waits, for tests
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            multiplier: Duration::ZERO,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before the attempt following failed attempt number `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        let raw = self.multiplier.saturating_mul(factor);
        raw.clamp(self.min_delay, self.max_delay.max(self.min_delay))
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) if attempt >= max_attempts => {
                    return Err(CollectorError::RetriesExhausted {
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    let delay = self.delay_after(attempt);
                    warn!(
                        request = what,
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
