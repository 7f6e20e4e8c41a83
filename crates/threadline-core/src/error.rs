// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Threadline correlation engine.

use thiserror::Error;

/// The primary error type used across all Threadline collaborator traits and engine operations.
///
/// Expected business outcomes (unknown system number, unresolvable token,
/// ambiguous reply) are *not* errors: they are encoded in
/// [`CorrelationState`](crate::types::CorrelationState). Only system-level
/// failures surface through this type.
#[derive(Debug, Error)]
pub enum ThreadlineError {
    /// Configuration errors (invalid TOML, out-of-range token bounds).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An external collaborator (directory, workflow engine, forwarder) failed.
    #[error("collaborator `{name}` failed: {message}")]
    Collaborator {
        name: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No response token could be allocated.
    ///
    /// `attempts` is the number of cached candidates that were rejected by the
    /// ledger before giving up; `0` means a full scan of the numeric space found
    /// no free token at all.
    #[error("response token pool exhausted after {attempts} attempts")]
    TokenPoolExhausted { attempts: u32 },

    /// Text that does not parse as an in-range response token.
    #[error("invalid response token `{0}`")]
    InvalidToken(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ThreadlineError {
    /// Shorthand for a collaborator failure without an underlying source.
    pub fn collaborator(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Collaborator {
            name: name.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error means the token space is used up (or the ledger
    /// rejected every candidate), as opposed to an I/O failure.
    pub fn is_exhaustion(&self) -> bool {
        matches!(self, Self::TokenPoolExhausted { .. })
    }
}
