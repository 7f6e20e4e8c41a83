// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading.
//!
//! Files are merged system first, then user, then local, and `THREADLINE_*`
//! environment variables win over all of them.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ThreadlineConfig;

/// Config sections addressable from environment variables.
const ENV_SECTIONS: &[&str] = &["engine", "tokens", "storage"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/threadline/threadline.toml` (system-wide)
/// 3. `~/.config/threadline/threadline.toml` (user XDG config)
/// 4. `./threadline.toml` (local directory)
/// 5. `THREADLINE_*` environment variables
pub fn load_config() -> Result<ThreadlineConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<ThreadlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ThreadlineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ThreadlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ThreadlineConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Candidate config files in merge order. Missing files are skipped by the
/// loader.
pub fn config_files() -> Vec<PathBuf> {
    let mut files = vec![PathBuf::from("/etc/threadline/threadline.toml")];
    if let Some(dir) = dirs::config_dir() {
        files.push(dir.join("threadline").join("threadline.toml"));
    }
    let local = std::env::current_dir()
        .map(|d| d.join("threadline.toml"))
        .unwrap_or_else(|_| PathBuf::from("threadline.toml"));
    files.push(local);
    files
}

/// The full layered Figment: defaults, every config file, then env.
pub fn build_figment() -> Figment {
    config_files()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(ThreadlineConfig::default())),
            |figment, file| figment.merge(Toml::file(file)),
        )
        .merge(env_provider())
}

/// Map a lowercased, prefix-stripped env key to its dotted config path.
///
/// Only the section separator becomes a dot, so
/// `tokens_reuse_window_days` maps to `tokens.reuse_window_days` rather than
/// `tokens.reuse.window.days`.
pub(crate) fn env_key_to_path(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

fn env_provider() -> Env {
    Env::prefixed("THREADLINE_").map(|key| env_key_to_path(key.as_str()).into())
}
