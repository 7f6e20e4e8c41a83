// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory token ledger for deterministic testing.
//!
//! `MockTokenLedger` stores assignments with an explicit timestamp so tests
//! can place a token inside or outside the reuse window without waiting.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use threadline_core::{
    CommunicationId, Collaborator, CorrelationResult, CorrelationState, LedgerEntry, PersonId,
    ResponseToken, ThreadlineError, TokenLedger,
};

#[derive(Debug, Clone)]
struct Assignment {
    entry: LedgerEntry,
    assigned_at: DateTime<Utc>,
}

/// A mock ledger with call counters and an injectable failure mode.
pub struct MockTokenLedger {
    assignments: Mutex<Vec<Assignment>>,
    failing: AtomicBool,
    is_active_calls: AtomicUsize,
    lookups: AtomicUsize,
}

impl MockTokenLedger {
    pub fn new() -> Self {
        Self {
            assignments: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            is_active_calls: AtomicUsize::new(0),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Record an assignment made now.
    pub async fn assign(
        &self,
        token: ResponseToken,
        communication: impl Into<String>,
        sender: impl Into<String>,
    ) {
        self.assign_at(token, communication, sender, Utc::now()).await;
    }

    /// Record an assignment made `days` days ago.
    pub async fn assign_days_ago(
        &self,
        token: ResponseToken,
        communication: impl Into<String>,
        sender: impl Into<String>,
        days: i64,
    ) {
        self.assign_at(token, communication, sender, Utc::now() - Duration::days(days))
            .await;
    }

    pub async fn assign_at(
        &self,
        token: ResponseToken,
        communication: impl Into<String>,
        sender: impl Into<String>,
        assigned_at: DateTime<Utc>,
    ) {
        self.assignments.lock().await.push(Assignment {
            entry: LedgerEntry {
                token,
                source_communication_id: CommunicationId(communication.into()),
                original_sender_person_id: PersonId(sender.into()),
            },
            assigned_at,
        });
    }

    /// Record a new-conversation result the way a persistence writer would.
    ///
    /// Returns the communication id, or `None` for results without a token.
    pub async fn record(&self, result: &CorrelationResult) -> Option<CommunicationId> {
        if result.state != CorrelationState::NewConversation {
            return None;
        }
        let token = result.token?;
        let sender = result.sender_person_id.clone()?;
        let communication = format!("comm-{}", uuid::Uuid::new_v4());
        self.assign(token, communication.clone(), sender.0).await;
        Some(CommunicationId(communication))
    }

    /// Make every subsequent call fail with a storage error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn assignment_count(&self) -> usize {
        self.assignments.lock().await.len()
    }

    pub fn is_active_calls(&self) -> usize {
        self.is_active_calls.load(Ordering::SeqCst)
    }

    pub fn lookup_calls(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), ThreadlineError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ThreadlineError::Storage {
                source: "mock ledger unavailable".into(),
            });
        }
        Ok(())
    }
}

impl Default for MockTokenLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Collaborator for MockTokenLedger {
    fn name(&self) -> &str {
        "mock-ledger"
    }
}

#[async_trait]
impl TokenLedger for MockTokenLedger {
    async fn is_active(
        &self,
        token: ResponseToken,
        within_days: u32,
    ) -> Result<bool, ThreadlineError> {
        self.is_active_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let cutoff = Utc::now() - Duration::days(i64::from(within_days));
        Ok(self
            .assignments
            .lock()
            .await
            .iter()
            .any(|a| a.entry.token == token && a.assigned_at > cutoff))
    }

    async fn find_most_recent_by_token(
        &self,
        token: ResponseToken,
    ) -> Result<Option<LedgerEntry>, ThreadlineError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        // Later pushes win ties.
        Ok(self
            .assignments
            .lock()
            .await
            .iter()
            .enumerate()
            .filter(|(_, a)| a.entry.token == token)
            .max_by_key(|(i, a)| (a.assigned_at, *i))
            .map(|(_, a)| a.entry.clone()))
    }
}
