//! Sliding-window rate limiting with a blocking penalty.

pub mod limiter;

pub use limiter::{RateLimit, RateLimitKind, RateLimitStatus, SlidingWindowLimiter};
