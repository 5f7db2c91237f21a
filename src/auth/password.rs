//! Password hashing with Argon2id.
//!
//! Hashes are PHC strings: algorithm, version, work factors, and salt are
//! all embedded, so verification needs no configuration. Hashing is
//! deliberately slow; the work factors come from [`AuthConfig`] so
//! deployments can tune cost without a rebuild.

use crate::config::AuthConfig;
use crate::error::Error;
use argon2::{
    Argon2, ParamsBuilder, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Error type for password hashing operations.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("failed to verify password: {0}")]
    Verify(String),

    #[error("invalid password hash format: {0}")]
    InvalidHash(String),
}

impl From<PasswordError> for Error {
    fn from(err: PasswordError) -> Self {
        // A hash that will not parse means the stored credential row is
        // corrupt; report it as a store-level failure.
        Error::Store(err.to_string())
    }
}

/// Hash a plaintext password with a fresh random salt.
///
/// Returns a PHC string like
/// `$argon2id$v=19$m=65536,t=3,p=4$...$...`.
pub fn hash_password(password: &str, auth: &AuthConfig) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(auth.memory_kib)
        .t_cost(auth.iterations)
        .p_cost(auth.parallelism)
        .build()
        .map_err(|e| PasswordError::Hash(format!("invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// A wrong password is `Ok(false)`; only a malformed hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

    // Work factors are read from the hash itself.
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e.to_string())),
    }
}
