//! Periodic rate-limit counter sweep.
//!
//! Drops counters that have gone idle and clears penalties that have run
//! out, keeping the counter table proportional to recently active users.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use farmgate_auth::SlidingWindowLimiter;
use farmgate_core::config::rate_limit::RateLimitConfig;
use farmgate_core::AppResult;

use crate::task::SweepTask;

/// Sweeps idle rate-limit counters on the configured cleanup interval.
#[derive(Debug)]
pub struct RateLimitSweep {
    limiter: Arc<SlidingWindowLimiter>,
    interval: Duration,
}

impl RateLimitSweep {
    pub fn new(limiter: Arc<SlidingWindowLimiter>, config: &RateLimitConfig) -> Self {
        Self {
            limiter,
            interval: Duration::from_secs(config.cleanup_interval_minutes * 60),
        }
    }
}

#[async_trait]
impl SweepTask for RateLimitSweep {
    fn name(&self) -> &str {
        "rate_limit_cleanup"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn sweep(&self) -> AppResult<u64> {
        Ok(self.limiter.sweep())
    }
}
