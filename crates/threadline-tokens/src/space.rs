// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The numeric space response tokens are drawn from.

use std::collections::BTreeSet;

use threadline_config::model::TokenConfig;
use threadline_core::token::{LEXICAL_MAX, LEXICAL_MIN};
use threadline_core::{ResponseToken, ThreadlineError};

/// Bounds, blacklist and chunking of the response token space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpace {
    min: u32,
    max: u32,
    blacklist: BTreeSet<u32>,
    chunk_size: u32,
}

impl TokenSpace {
    /// Build a space of `min..max` (max exclusive) scanned `chunk_size` at a time.
    pub fn new(
        min: u32,
        max: u32,
        blacklist: impl IntoIterator<Item = u32>,
        chunk_size: u32,
    ) -> Result<Self, ThreadlineError> {
        if min < LEXICAL_MIN || max > LEXICAL_MAX + 1 || min >= max {
            return Err(ThreadlineError::Config(format!(
                "token range {min}..{max} must lie within {LEXICAL_MIN}..={LEXICAL_MAX}"
            )));
        }
        if chunk_size == 0 {
            return Err(ThreadlineError::Config(
                "token chunk size must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            min,
            max,
            blacklist: blacklist.into_iter().collect(),
            chunk_size,
        })
    }

    pub fn from_config(config: &TokenConfig) -> Result<Self, ThreadlineError> {
        Self::new(
            config.min_value,
            config.max_value,
            config.blacklist.iter().copied(),
            config.chunk_size,
        )
    }

    /// Whether `token` may ever be handed out.
    pub fn contains(&self, token: ResponseToken) -> bool {
        let value = token.value();
        (self.min..self.max).contains(&value) && !self.blacklist.contains(&value)
    }

    /// Number of tokens that may be handed out.
    pub fn capacity(&self) -> usize {
        let blacklisted = self.blacklist.range(self.min..self.max).count();
        (self.max - self.min) as usize - blacklisted
    }

    /// Non-blacklisted tokens of each chunk, lowest chunk first.
    ///
    /// Chunks that are entirely blacklisted are skipped.
    pub fn chunks(&self) -> impl Iterator<Item = Vec<ResponseToken>> + '_ {
        (self.min..self.max)
            .step_by(self.chunk_size as usize)
            .map(move |start| {
                let end = start.saturating_add(self.chunk_size).min(self.max);
                (start..end)
                    .filter(|v| !self.blacklist.contains(v))
                    .filter_map(|v| ResponseToken::new(v).ok())
                    .collect::<Vec<_>>()
            })
            .filter(|chunk| !chunk.is_empty())
    }
}

impl Default for TokenSpace {
    fn default() -> Self {
        Self {
            min: 100,
            max: 99_000,
            blacklist: BTreeSet::from([666, 911]),
            chunk_size: 100,
        }
    }
}
