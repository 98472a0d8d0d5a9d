//! Built-in sweep task implementations.

pub mod ratelimit;
pub mod session;

pub use ratelimit::RateLimitSweep;
pub use session::SessionSweep;
