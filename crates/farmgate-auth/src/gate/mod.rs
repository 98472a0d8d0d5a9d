//! The security gate — composes validator, sessions, rate limiting, and
//! RBAC into one admission decision per request.

pub mod decision;
pub mod service;

pub use decision::{AccessDecision, SecurityStatus};
pub use service::SecurityGate;
