//! Session lifecycle — concurrent store and sliding-expiration manager.

pub mod manager;
pub mod store;

pub use manager::{SessionDenial, SessionManager, SessionOutcome};
pub use store::{SessionStats, SessionStore};
