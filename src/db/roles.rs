//! Role definitions and user↔role membership.

use super::Database;
use crate::error::{Error, Result};
use crate::types::Role;
use rusqlite::params;
use std::collections::HashSet;

impl Database {
    /// Create a new role.
    pub fn create_role(&self, name: &str) -> Result<Role> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::empty_field("role name"));
        }

        self.with_conn(|conn| {
            let taken: bool = conn
                .query_row(
                    "SELECT 1 FROM roles WHERE name = ?1",
                    params![name],
                    |_| Ok(true),
                )
                .unwrap_or(false);

            if taken {
                return Err(Error::invalid_value("role name", "already exists"));
            }

            conn.execute("INSERT INTO roles (name) VALUES (?1)", params![name])?;

            Ok(Role {
                id: conn.last_insert_rowid(),
                name: name.to_string(),
            })
        })
    }

    /// Assign a role to a user. Idempotent: assigning an already-held role
    /// is a no-op.
    pub fn assign_role(&self, user_id: i64, role_id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let user_exists: bool = conn
                .query_row(
                    "SELECT 1 FROM usuarios WHERE id = ?1",
                    params![user_id],
                    |_| Ok(true),
                )
                .unwrap_or(false);
            if !user_exists {
                return Err(Error::user_not_found(user_id));
            }

            let role_exists: bool = conn
                .query_row("SELECT 1 FROM roles WHERE id = ?1", params![role_id], |_| {
                    Ok(true)
                })
                .unwrap_or(false);
            if !role_exists {
                return Err(Error::role_not_found(role_id));
            }

            conn.execute(
                "INSERT OR IGNORE INTO user_roles (user_id, role_id) VALUES (?1, ?2)",
                params![user_id, role_id],
            )?;

            Ok(())
        })
    }

    /// Roles held by a user. Empty for a user with no roles or an unknown
    /// id, never an error.
    pub fn roles_of(&self, user_id: i64) -> Result<HashSet<Role>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT r.id, r.name FROM roles r
                 INNER JOIN user_roles ur ON r.id = ur.role_id
                 WHERE ur.user_id = ?1",
            )?;

            let roles = stmt
                .query_map(params![user_id], |row| {
                    Ok(Role {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<HashSet<_>, _>>()?;

            Ok(roles)
        })
    }

    /// All role definitions.
    pub fn all_roles(&self) -> Result<HashSet<Role>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, name FROM roles")?;

            let roles = stmt
                .query_map([], |row| {
                    Ok(Role {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<HashSet<_>, _>>()?;

            Ok(roles)
        })
    }

    /// Look up a role by name.
    pub fn get_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        self.with_conn(|conn| {
            let result = conn.query_row(
                "SELECT id, name FROM roles WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Role {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            );

            match result {
                Ok(role) => Ok(Some(role)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }
}
