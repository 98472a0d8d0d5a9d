//! Role-based access control — permission table and enforcement.

pub mod enforcer;
pub mod table;

pub use enforcer::{AuthzOutcome, RbacEnforcer};
pub use table::RoleTable;
