//! # farmgate-auth
//!
//! The Farmgate request-security pipeline: API key validation, session
//! lifecycle, sliding-window rate limiting, role-based authorization,
//! and the security gate that composes them into one admission decision
//! per request.
//!
//! ## Modules
//!
//! - `apikey` — credential fingerprinting, key store adapter, validator
//! - `session` — session store and lifecycle manager
//! - `ratelimit` — sliding-window limiter with blocking penalty
//! - `rbac` — role table and permission enforcement
//! - `gate` — the orchestrating security gate and its decision type
//!
//! Periodic sweeping of expired sessions and idle rate limit counters
//! is driven by the `farmgate-worker` crate.

pub mod apikey;
pub mod gate;
pub mod ratelimit;
pub mod rbac;
pub mod session;

pub use apikey::{ApiKeyDenial, ApiKeyOutcome, ApiKeyValidator, KeyStore, MemoryKeyStore};
pub use gate::{AccessDecision, SecurityGate, SecurityStatus};
pub use ratelimit::{RateLimit, RateLimitKind, RateLimitStatus, SlidingWindowLimiter};
pub use rbac::{AuthzOutcome, RbacEnforcer, RoleTable};
pub use session::{SessionDenial, SessionManager, SessionOutcome, SessionStats, SessionStore};
