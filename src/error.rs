//! Structured error types for service and store operations.

use thiserror::Error;

/// Error taxonomy for the task tracker core.
///
/// `Validation` and `PermissionDenied` are detected before any mutating
/// store call ever happens. `NotFound` on update/delete is an expected
/// outcome, not a crash condition. `Store` failures are surfaced verbatim
/// and never retried here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("store error: {0}")]
    Store(String),
}

impl Error {
    // Convenience constructors

    pub fn invalid_value(field: &str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn empty_field(field: &str) -> Self {
        Error::Validation {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        }
    }

    pub fn missing_role(role: &str) -> Self {
        Error::PermissionDenied(format!("requires role '{}'", role))
    }

    pub fn not_authenticated() -> Self {
        Error::PermissionDenied("not authenticated".to_string())
    }

    pub fn invalid_credentials() -> Self {
        // One undifferentiated outcome for bad username or bad password,
        // so account existence never leaks.
        Error::PermissionDenied("invalid credentials".to_string())
    }

    pub fn user_not_found(id: i64) -> Self {
        Error::NotFound { entity: "user", id }
    }

    pub fn role_not_found(id: i64) -> Self {
        Error::NotFound { entity: "role", id }
    }

    pub fn task_not_found(id: i64) -> Self {
        Error::NotFound { entity: "task", id }
    }

    pub fn project_not_found(id: i64) -> Self {
        Error::NotFound {
            entity: "project",
            id,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Error::PermissionDenied(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Store(err.to_string())
    }
}

impl From<refinery::Error> for Error {
    fn from(err: refinery::Error) -> Self {
        Error::Store(err.to_string())
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
