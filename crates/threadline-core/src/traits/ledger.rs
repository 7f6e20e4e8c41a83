// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only view over persisted response token assignments.

use async_trait::async_trait;

use crate::error::ThreadlineError;
use crate::token::ResponseToken;
use crate::traits::collaborator::Collaborator;
use crate::types::LedgerEntry;

/// The durable record of which tokens belong to which communication.
///
/// The engine only reads the ledger. Rows are written by the persistence
/// collaborator that records a routed [`CorrelationResult`](crate::CorrelationResult).
#[async_trait]
pub trait TokenLedger: Collaborator {
    /// Whether `token` was assigned within the last `within_days` days.
    async fn is_active(
        &self,
        token: ResponseToken,
        within_days: u32,
    ) -> Result<bool, ThreadlineError>;

    /// The most recent assignment of `token`, regardless of age.
    ///
    /// Ties on assignment time are broken by most recent creation.
    async fn find_most_recent_by_token(
        &self,
        token: ResponseToken,
    ) -> Result<Option<LedgerEntry>, ThreadlineError>;

    /// The subset of `candidates` active within `within_days`.
    ///
    /// Used by the token pool to filter a whole refill chunk. The default asks
    /// [`is_active`](Self::is_active) once per candidate; backends that can
    /// answer in a single query should override it.
    async fn active_among(
        &self,
        candidates: &[ResponseToken],
        within_days: u32,
    ) -> Result<Vec<ResponseToken>, ThreadlineError> {
        let mut active = Vec::new();
        for &token in candidates {
            if self.is_active(token, within_days).await? {
                active.push(token);
            }
        }
        Ok(active)
    }
}
