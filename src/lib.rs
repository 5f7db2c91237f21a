//! Taskdesk core library.
//!
//! Credential verification, role-based access gating, and task persistence
//! over a SQLite store. The presentation layer (the CLI binary) consumes
//! `TaskService` and renders the plain data it returns.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod service;
pub mod types;
