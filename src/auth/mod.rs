//! Credential hashing and role-based access gating.

pub mod guard;
pub mod password;
