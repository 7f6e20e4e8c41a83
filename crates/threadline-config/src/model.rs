// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model.
//!
//! Every table rejects unknown keys so a typo fails at startup instead of
//! silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Root of `threadline.toml`. Every section may be omitted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ThreadlineConfig {
    /// Process-level settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Response token space and pool behavior.
    #[serde(default)]
    pub tokens: TokenConfig,

    /// Ledger and directory database.
    #[serde(default)]
    pub storage: StorageConfig,

    /// System phone numbers seeded into storage at startup.
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumberConfig>,
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Response token space and pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TokenConfig {
    /// Lowest token value handed out (inclusive).
    #[serde(default = "default_min_value")]
    pub min_value: u32,

    /// Upper bound of token values (exclusive).
    #[serde(default = "default_max_value")]
    pub max_value: u32,

    /// Values never handed out.
    #[serde(default = "default_blacklist")]
    pub blacklist: Vec<u32>,

    /// Size of each numeric chunk scanned on refill.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,

    /// Days a token stays bound to its conversation before it may be reissued.
    #[serde(default = "default_reuse_window_days")]
    pub reuse_window_days: u32,

    /// Cached candidates the pool may reject before allocation fails.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Seconds an issued token is withheld from refills while its ledger row
    /// is being written.
    #[serde(default = "default_reservation_ttl_secs")]
    pub reservation_ttl_secs: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            min_value: default_min_value(),
            max_value: default_max_value(),
            blacklist: default_blacklist(),
            chunk_size: default_chunk_size(),
            reuse_window_days: default_reuse_window_days(),
            max_attempts: default_max_attempts(),
            reservation_ttl_secs: default_reservation_ttl_secs(),
        }
    }
}

fn default_min_value() -> u32 {
    100
}

fn default_max_value() -> u32 {
    99_000
}

fn default_blacklist() -> Vec<u32> {
    vec![666, 911]
}

fn default_chunk_size() -> u32 {
    100
}

fn default_reuse_window_days() -> u32 {
    10
}

fn default_max_attempts() -> u32 {
    1000
}

fn default_reservation_ttl_secs() -> u64 {
    300
}

/// `[storage]`: the SQLite file holding people, numbers and the token ledger.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Defaults to `threadline/threadline.db` under the XDG data dir.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Write-ahead logging, so lookups never wait on the writer.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("threadline").join("threadline.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "threadline.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// A system phone number declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PhoneNumberConfig {
    /// The number, in any formatting; normalized before storage.
    pub number: String,

    /// Person who owns conversations on this number.
    #[serde(default)]
    pub owner_person_id: Option<String>,

    /// Forward routed messages to the owner's mobile.
    #[serde(default)]
    pub forwarding_enabled: bool,

    /// Workflow type launched for every received message.
    #[serde(default)]
    pub received_workflow_type_id: Option<String>,
}
