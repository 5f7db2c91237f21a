//! Access gating: the single policy point for role checks.
//!
//! Permission is role-level only. Every mutating service operation asks
//! this function before touching the repository; scattering ad hoc role
//! string comparisons across call sites is exactly what this exists to
//! prevent.

use crate::db::Database;
use crate::error::Result;

/// The one role gating mutations today. The contract is general: any named
/// role can be required.
pub const ADMIN_ROLE: &str = "admin";

/// Whether the user holds the required role.
///
/// A user with zero roles (or an unknown id) simply lacks every role; that
/// is `Ok(false)`, not an error.
pub fn permits(db: &Database, user_id: i64, required_role: &str) -> Result<bool> {
    let roles = db.roles_of(user_id)?;
    Ok(roles.iter().any(|r| r.name == required_role))
}
