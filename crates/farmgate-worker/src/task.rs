//! The sweep task abstraction.

use std::time::Duration;

use async_trait::async_trait;

use farmgate_core::AppResult;

/// A periodic maintenance sweep.
///
/// Implementations do one bounded pass per invocation and report how
/// many entries they removed. A failed pass is logged by the runner and
/// retried at the next tick; it never stops the schedule.
#[async_trait]
pub trait SweepTask: Send + Sync + std::fmt::Debug + 'static {
    /// Task name, used in log lines.
    fn name(&self) -> &str;

    /// How often the sweep runs.
    fn interval(&self) -> Duration;

    /// Run one sweep pass, returning the number of entries removed.
    async fn sweep(&self) -> AppResult<u64>;
}
