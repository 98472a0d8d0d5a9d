//! # Farmgate
//!
//! Request security for a farm record-keeping backend. Composes API key
//! authentication, sliding-expiration sessions, sliding-window rate
//! limiting, and role-based authorization into one admission decision
//! per request.
//!
//! [`SecurityPipeline`] wires every component from [`AppConfig`] and runs
//! the background sweepers; the component crates stay usable on their own
//! for embedders that need the parts.

pub mod pipeline;
pub mod telemetry;

pub use pipeline::SecurityPipeline;
pub use telemetry::init_logging;

pub use farmgate_auth::{
    AccessDecision, ApiKeyDenial, ApiKeyOutcome, ApiKeyValidator, AuthzOutcome, KeyStore,
    MemoryKeyStore, RateLimit, RateLimitKind, RateLimitStatus, RbacEnforcer, RoleTable,
    SecurityGate, SecurityStatus, SessionDenial, SessionManager, SessionOutcome, SessionStats,
    SessionStore, SlidingWindowLimiter,
};
pub use farmgate_cache::MemoryCacheProvider;
pub use farmgate_core::config::AppConfig;
pub use farmgate_core::error::ErrorKind;
pub use farmgate_core::traits::CacheProvider;
pub use farmgate_core::{AppError, AppResult};
pub use farmgate_entity::{ApiKeyRecord, Permission, SecurityContext, Session, User};
