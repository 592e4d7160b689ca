//! Bounded exponential backoff for throttling-class backend failures

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::{Error, Result};

/// Retry policy applied around search backend calls.
///
/// Only throttling-class errors are retried; everything else propagates
/// immediately. The backoff sleeps on the tokio timer, so a waiting query
/// never blocks a runtime thread.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with explicit bounds
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay applied before retry `attempt` (0-indexed): `base_delay * 2^attempt`
    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }

    /// Run `op`, retrying throttled attempts with exponential backoff.
    ///
    /// Exhausting every attempt on a throttle surfaces as a terminal
    /// `Error::BackendUnavailable`.
    pub async fn run<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut failed_attempts = 0u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_throttling() => {
                    failed_attempts += 1;
                    if failed_attempts >= self.max_attempts {
                        return Err(Error::BackendUnavailable(format!(
                            "throttled after {} attempts: {err}",
                            self.max_attempts
                        )));
                    }
                    let delay = self.delay_for(failed_attempts - 1);
                    warn!(
                        attempt = failed_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "backend throttled, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
