// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Threadline configuration.
//!
//! Strict TOML models, layered loading with env overrides, semantic
//! validation, and miette diagnostics with "did you mean" suggestions for
//! mistyped keys.
//!
//! # Usage
//!
//! ```no_run
//! use threadline_config::load_and_validate;
//!
//! let Ok(config) = load_and_validate() else {
//!     std::process::exit(1);
//! };
//! println!("reuse window: {} days", config.tokens.reuse_window_days);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::ThreadlineConfig;

/// Load configuration from the standard locations and validate it.
pub fn load_and_validate() -> Result<ThreadlineConfig, Vec<ConfigError>> {
    checked(loader::load_config(), || {
        loader::config_files()
            .into_iter()
            .filter_map(|path| read_source(&path))
            .collect()
    })
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<ThreadlineConfig, Vec<ConfigError>> {
    tracing::debug!(path = %path.display(), "loading configuration file");
    checked(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<ThreadlineConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Validate a loaded config, or turn the load error into diagnostics.
///
/// Sources are only read on the error path, to attach spans.
fn checked(
    loaded: Result<ThreadlineConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<ThreadlineConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| diagnostic::figment_to_config_errors(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

fn read_source(path: &Path) -> Option<(String, String)> {
    std::fs::read_to_string(path)
        .ok()
        .map(|content| (path.display().to_string(), content))
}
