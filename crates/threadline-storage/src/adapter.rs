// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementations of the collaborator traits.
//!
//! Each adapter wraps a [`Database`] handle and delegates to the typed query
//! modules. All three can share one database.

use async_trait::async_trait;
use tracing::{debug, info};

use threadline_core::{
    Collaborator, LedgerEntry, Person, PersonDirectory, PersonId, ResponseToken,
    SystemPhoneNumber, SystemPhoneNumberDirectory, ThreadlineError, TokenLedger,
    normalize_number,
};

use crate::database::Database;
use crate::queries;

/// Token ledger backed by `communication_recipients`.
pub struct SqliteTokenLedger {
    db: Database,
}

impl SqliteTokenLedger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl Collaborator for SqliteTokenLedger {
    fn name(&self) -> &str {
        "sqlite-ledger"
    }
}

#[async_trait]
impl TokenLedger for SqliteTokenLedger {
    async fn is_active(
        &self,
        token: ResponseToken,
        within_days: u32,
    ) -> Result<bool, ThreadlineError> {
        queries::ledger::is_active(&self.db, token, within_days).await
    }

    async fn find_most_recent_by_token(
        &self,
        token: ResponseToken,
    ) -> Result<Option<LedgerEntry>, ThreadlineError> {
        queries::ledger::find_most_recent_by_token(&self.db, token).await
    }

    async fn active_among(
        &self,
        candidates: &[ResponseToken],
        within_days: u32,
    ) -> Result<Vec<ResponseToken>, ThreadlineError> {
        let active = queries::ledger::active_among(&self.db, candidates, within_days).await?;
        debug!(
            candidates = candidates.len(),
            active = active.len(),
            "ledger chunk scan"
        );
        Ok(active)
    }
}

/// Person directory over `people` and `person_phone_numbers`.
pub struct SqlitePersonDirectory {
    db: Database,
}

impl SqlitePersonDirectory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Register a known person reachable at `numbers` (any formatting).
    pub async fn upsert(&self, person: &Person, numbers: &[&str]) -> Result<(), ThreadlineError> {
        let numbers: Vec<String> = numbers.iter().map(|n| normalize_number(n)).collect();
        queries::people::upsert_person(&self.db, person, &numbers).await
    }
}

impl Collaborator for SqlitePersonDirectory {
    fn name(&self) -> &str {
        "sqlite-people"
    }
}

#[async_trait]
impl PersonDirectory for SqlitePersonDirectory {
    async fn resolve_by_sms_number(&self, number: &str) -> Result<Person, ThreadlineError> {
        let number = normalize_number(number);
        let (person, created) = queries::people::resolve_or_create(&self.db, &number).await?;
        if created {
            info!(person = %person.id, number = %number, "created placeholder person for unknown sender");
        }
        Ok(person)
    }

    async fn find_by_id(&self, id: &PersonId) -> Result<Option<Person>, ThreadlineError> {
        queries::people::find_by_id(&self.db, id).await
    }
}

/// System phone number directory over `system_phone_numbers`.
pub struct SqliteSystemPhoneNumberDirectory {
    db: Database,
}

impl SqliteSystemPhoneNumberDirectory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl Collaborator for SqliteSystemPhoneNumberDirectory {
    fn name(&self) -> &str {
        "sqlite-system-numbers"
    }
}

#[async_trait]
impl SystemPhoneNumberDirectory for SqliteSystemPhoneNumberDirectory {
    async fn find_by_number(
        &self,
        number: &str,
    ) -> Result<Option<SystemPhoneNumber>, ThreadlineError> {
        queries::phone_numbers::find_by_number(&self.db, &normalize_number(number)).await
    }
}
