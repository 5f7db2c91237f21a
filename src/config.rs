//! Configuration loading and management.
//!
//! Store location and hash work factors are injected configuration: loaded
//! once at startup and passed by reference to the components that need
//! them. Nothing in the core reads a global.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

/// Relational store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from(".taskdesk/taskdesk.db")
}

/// Password hashing work factors (Argon2id).
///
/// Hashing is deliberately CPU-bound; these knobs trade verification
/// latency against offline brute-force resistance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,

    /// Number of passes over memory.
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

fn default_memory_kib() -> u32 {
    65536 // 64 MiB
}

fn default_iterations() -> u32 {
    3
}

fn default_parallelism() -> u32 {
    4
}

impl AuthConfig {
    /// Cheap parameters for tests, where hash latency is pure overhead.
    pub fn fast_insecure() -> Self {
        Self {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from the default location, falling back to
    /// defaults with environment overrides.
    pub fn load_or_default() -> Self {
        if let Ok(config) = Self::load(".taskdesk/config.yaml") {
            return config;
        }

        let mut config = Self::default();

        if let Ok(db_path) = std::env::var("TASKDESK_DB_PATH") {
            config.store.db_path = PathBuf::from(db_path);
        }

        if let Ok(mem) = std::env::var("TASKDESK_HASH_MEMORY_KIB") {
            if let Ok(mem) = mem.parse() {
                config.auth.memory_kib = mem;
            }
        }

        if let Ok(iters) = std::env::var("TASKDESK_HASH_ITERATIONS") {
            if let Ok(iters) = iters.parse() {
                config.auth.iterations = iters;
            }
        }

        config
    }

    /// Ensure the database directory exists.
    pub fn ensure_db_dir(&self) -> Result<()> {
        if let Some(parent) = self.store.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}
