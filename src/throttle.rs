// src/throttle.rs
//! Pacing between search results and between keyword/country queries.

use std::time::Duration;

#[async_trait::async_trait]
pub trait Throttle: Send + Sync {
    /// After each processed result.
    async fn after_result(&self);
    /// After each (keyword, country) query.
    async fn after_keyword(&self);
}

#[derive(Debug, Clone, Copy)]
pub struct FixedDelayThrottle {
    pub result_delay: Duration,
    pub keyword_delay: Duration,
}

impl FixedDelayThrottle {
    pub fn new(result_delay: Duration, keyword_delay: Duration) -> Self {
        Self {
            result_delay,
            keyword_delay,
        }
    }
}

#[async_trait::async_trait]
impl Throttle for FixedDelayThrottle {
    async fn after_result(&self) {
        if !self.result_delay.is_zero() {
            tokio::time::sleep(self.result_delay).await;
        }
    }

    async fn after_keyword(&self) {
        if !self.keyword_delay.is_zero() {
            tracing::debug!(target: "scrape", delay_ms = self.keyword_delay.as_millis() as u64, "keyword pause");
            tokio::time::sleep(self.keyword_delay).await;
        }
    }
}

/// No pauses. Tests only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopThrottle;

#[async_trait::async_trait]
impl Throttle for NoopThrottle {
    async fn after_result(&self) {}
    async fn after_keyword(&self) {}
}
