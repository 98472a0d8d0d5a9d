//! # farmgate-entity
//!
//! Domain entity models for the Farmgate security pipeline: API key
//! records, users, sessions, permissions, and the request-scoped
//! security context.

pub mod api_key;
pub mod context;
pub mod permission;
pub mod session;
pub mod user;

pub use api_key::ApiKeyRecord;
pub use context::SecurityContext;
pub use permission::Permission;
pub use session::Session;
pub use user::User;
