//! User accounts and credential verification.
//!
//! The `password` column only ever holds Argon2 PHC strings. Plaintext
//! passwords exist transiently in call arguments and are hashed before any
//! store write.

use super::Database;
use crate::auth::password::{hash_password, verify_password};
use crate::config::AuthConfig;
use crate::error::{Error, Result};
use crate::types::User;
use rusqlite::{Connection, params};

fn get_user_internal(conn: &Connection, user_id: i64) -> Result<Option<User>> {
    let mut stmt =
        conn.prepare("SELECT id, username, password FROM usuarios WHERE id = ?1")?;

    let result = stmt.query_row(params![user_id], |row| {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
        })
    });

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Database {
    /// Create a new user with a freshly salted hash of the password.
    pub fn create_user(
        &self,
        username: &str,
        password: &str,
        auth: &AuthConfig,
    ) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::empty_field("username"));
        }

        // CPU-bound; done before the connection is touched.
        let password_hash = hash_password(password, auth)?;

        self.with_conn(|conn| {
            let taken: bool = conn
                .query_row(
                    "SELECT 1 FROM usuarios WHERE username = ?1",
                    params![username],
                    |_| Ok(true),
                )
                .unwrap_or(false);

            if taken {
                return Err(Error::invalid_value("username", "already taken"));
            }

            conn.execute(
                "INSERT INTO usuarios (username, password) VALUES (?1, ?2)",
                params![username, &password_hash],
            )?;

            Ok(User {
                id: conn.last_insert_rowid(),
                username: username.to_string(),
                password_hash,
            })
        })
    }

    /// Check a username/password pair against the stored credential.
    ///
    /// Returns false for an unknown username and for a wrong password; the
    /// caller cannot tell the two apart.
    pub fn verify(&self, username: &str, password: &str) -> Result<bool> {
        let stored = self.with_conn(|conn| {
            let result = conn.query_row(
                "SELECT password FROM usuarios WHERE username = ?1",
                params![username],
                |row| row.get::<_, String>(0),
            );

            match result {
                Ok(hash) => Ok(Some(hash)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })?;

        match stored {
            Some(hash) => Ok(verify_password(password, &hash)?),
            None => Ok(false),
        }
    }

    /// Replace a user's username and password in one statement.
    pub fn update_credentials(
        &self,
        user_id: i64,
        new_username: &str,
        new_password: &str,
        auth: &AuthConfig,
    ) -> Result<User> {
        let new_username = new_username.trim();
        if new_username.is_empty() {
            return Err(Error::empty_field("username"));
        }

        let password_hash = hash_password(new_password, auth)?;

        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE usuarios SET username = ?1, password = ?2 WHERE id = ?3",
                params![new_username, &password_hash, user_id],
            )?;

            if updated == 0 {
                return Err(Error::user_not_found(user_id));
            }

            Ok(User {
                id: user_id,
                username: new_username.to_string(),
                password_hash,
            })
        })
    }

    /// Delete a user and their role memberships.
    ///
    /// Membership rows are removed explicitly in the same transaction; the
    /// schema has no cascade. Tasks are not user-owned and are untouched.
    pub fn delete_user(&self, user_id: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "DELETE FROM user_roles WHERE user_id = ?1",
                params![user_id],
            )?;

            let deleted = tx.execute("DELETE FROM usuarios WHERE id = ?1", params![user_id])?;
            if deleted == 0 {
                return Err(Error::user_not_found(user_id));
            }

            tx.commit()?;
            Ok(())
        })
    }

    /// Get a user by id.
    pub fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        self.with_conn(|conn| get_user_internal(conn, user_id))
    }

    /// Get a user by username.
    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, username, password FROM usuarios WHERE username = ?1")?;

            let result = stmt.query_row(params![username], |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    password_hash: row.get(2)?,
                })
            });

            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// List all users, id ascending.
    pub fn list_users(&self) -> Result<Vec<User>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, username, password FROM usuarios ORDER BY id")?;

            let users = stmt
                .query_map([], |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(users)
        })
    }
}
