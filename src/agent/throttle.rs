//! Post-call throttling against the agent service
//!
//! Some agent tasks pause after each call so bursts of jobs do not hammer
//! the hosted service. The pause is policy, so it is injected per task.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait CallThrottle: Send + Sync {
    /// Runs after a call completes, successful or not
    async fn after_call(&self);
}

/// No pause
pub struct NoThrottle;

#[async_trait]
impl CallThrottle for NoThrottle {
    async fn after_call(&self) {}
}

/// Fixed pause after every call
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl CallThrottle for FixedDelay {
    async fn after_call(&self) {
        if self.delay.is_zero() {
            return;
        }
        debug!(delay_ms = self.delay.as_millis() as u64, "Throttling after agent call");
        tokio::time::sleep(self.delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_waits() {
        let throttle = FixedDelay::new(Duration::from_secs(10));
        let start = Instant::now();
        throttle.after_call().await;
        assert!(start.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_zero_delay_returns_immediately() {
        let start = Instant::now();
        FixedDelay::new(Duration::ZERO).after_call().await;
        NoThrottle.after_call().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
