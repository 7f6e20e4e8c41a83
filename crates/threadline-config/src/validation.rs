// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.
//!
//! Token bounds keep every issued token at 3 to 5 digits, which is what the
//! reply scanner in `threadline-core` recognizes.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::ThreadlineConfig;

/// Smallest token value with three digits.
const TOKEN_FLOOR: u32 = 100;

/// Exclusive upper bound keeping tokens at five digits or fewer.
const TOKEN_CEILING: u32 = 100_000;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Check every semantic constraint and report all violations at once.
pub fn validate_config(config: &ThreadlineConfig) -> Result<(), Vec<ConfigError>> {
    let mut problems = Vec::new();
    check_engine(config, &mut problems);
    check_tokens(config, &mut problems);
    check_storage(config, &mut problems);
    check_phone_numbers(config, &mut problems);

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems
            .into_iter()
            .map(|message| ConfigError::Validation { message })
            .collect())
    }
}

fn check_engine(config: &ThreadlineConfig, problems: &mut Vec<String>) {
    let level = config.engine.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        problems.push(format!(
            "engine.log_level `{}` must be one of {}",
            config.engine.log_level,
            LOG_LEVELS.join(", ")
        ));
    }
}

fn check_tokens(config: &ThreadlineConfig, problems: &mut Vec<String>) {
    let t = &config.tokens;

    if t.min_value < TOKEN_FLOOR {
        problems.push(format!(
            "tokens.min_value must be at least {TOKEN_FLOOR}, got {}",
            t.min_value
        ));
    }
    if t.max_value > TOKEN_CEILING {
        problems.push(format!(
            "tokens.max_value must be at most {TOKEN_CEILING}, got {}",
            t.max_value
        ));
    }
    if t.min_value >= t.max_value {
        problems.push(format!(
            "tokens.min_value ({}) must be less than tokens.max_value ({})",
            t.min_value, t.max_value
        ));
    }

    let positive = [
        ("chunk_size", u64::from(t.chunk_size)),
        ("max_attempts", u64::from(t.max_attempts)),
        ("reuse_window_days", u64::from(t.reuse_window_days)),
    ];
    for (key, value) in positive {
        if value == 0 {
            problems.push(format!("tokens.{key} must be greater than 0"));
        }
    }

    let range = t.min_value..t.max_value;
    for value in t.blacklist.iter().filter(|v| !range.contains(v)) {
        problems.push(format!(
            "tokens.blacklist entry {value} is outside {}..{}",
            t.min_value, t.max_value
        ));
    }
}

fn check_storage(config: &ThreadlineConfig, problems: &mut Vec<String>) {
    if config.storage.database_path.trim().is_empty() {
        problems.push("storage.database_path must not be empty".to_string());
    }
}

/// Numbers are compared after normalization, so `+1 555 0100` and
/// `15550100` collide.
fn check_phone_numbers(config: &ThreadlineConfig, problems: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for (i, phone) in config.phone_numbers.iter().enumerate() {
        let normalized = threadline_core::normalize_number(&phone.number);
        if normalized.is_empty() {
            problems.push(format!("phone_numbers[{i}].number must not be empty"));
        } else if !seen.insert(normalized) {
            problems.push(format!(
                "duplicate phone number `{}` in [[phone_numbers]] array",
                phone.number
            ));
        }
    }
}
