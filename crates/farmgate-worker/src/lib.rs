//! # farmgate-worker
//!
//! Background sweepers for the security pipeline: periodic tasks that
//! drop expired sessions and idle rate limit counters so the in-memory
//! tables stay bounded regardless of request traffic.
//!
//! A [`SweepTask`] names a sweep and its cadence; the [`SweepRunner`]
//! drives each task on a tokio interval and stops it through a watch
//! channel, so shutdown is deterministic and awaitable.

pub mod runner;
pub mod task;
pub mod tasks;

pub use runner::SweepRunner;
pub use task::SweepTask;
pub use tasks::{RateLimitSweep, SessionSweep};
