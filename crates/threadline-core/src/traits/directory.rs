// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Directory lookups for people and registered system phone numbers.

use async_trait::async_trait;

use crate::error::ThreadlineError;
use crate::traits::collaborator::Collaborator;
use crate::types::{Person, PersonId, SystemPhoneNumber};

/// Resolves SMS numbers to participants.
#[async_trait]
pub trait PersonDirectory: Collaborator {
    /// Resolve the person who owns `number` (already normalized).
    ///
    /// Must always yield a usable participant: when nobody matches, the
    /// directory creates (or reuses) an anonymous placeholder for the number.
    /// Errors are reserved for backend failures.
    async fn resolve_by_sms_number(&self, number: &str) -> Result<Person, ThreadlineError>;

    /// Load a person by id, e.g. the assigned owner of a system number.
    async fn find_by_id(&self, id: &PersonId) -> Result<Option<Person>, ThreadlineError>;
}

/// Looks up the numbers the organization can receive SMS on.
#[async_trait]
pub trait SystemPhoneNumberDirectory: Collaborator {
    /// Find the registered number matching `number` (already normalized).
    async fn find_by_number(
        &self,
        number: &str,
    ) -> Result<Option<SystemPhoneNumber>, ThreadlineError>;
}
