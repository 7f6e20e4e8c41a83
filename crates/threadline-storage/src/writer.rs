// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence of correlation results.
//!
//! Recording a `NewConversation` result writes the recipient row carrying its
//! response token, which is what makes the token active in the ledger. The
//! engine itself never writes; this is the downstream writer.

use chrono::{DateTime, Utc};
use threadline_core::{
    CommunicationId, CorrelationResult, PersonId, SystemPhoneNumber, SystemPhoneNumberId,
    ThreadlineError, WorkflowTypeId, normalize_number,
};
use tracing::info;

use crate::database::Database;
use crate::queries;

/// Store `result` as a new communication and return its id.
pub async fn record_correlation(
    db: &Database,
    result: &CorrelationResult,
) -> Result<CommunicationId, ThreadlineError> {
    record_correlation_at(db, result, Utc::now()).await
}

/// Like [`record_correlation`] with an explicit assignment time.
pub async fn record_correlation_at(
    db: &Database,
    result: &CorrelationResult,
    at: DateTime<Utc>,
) -> Result<CommunicationId, ThreadlineError> {
    let id = uuid::Uuid::new_v4().to_string();
    queries::communications::insert_result(db, &id, result, at).await?;
    info!(
        communication = %id,
        state = %result.state,
        token = ?result.token.map(|t| t.to_string()),
        "correlation recorded"
    );
    Ok(CommunicationId(id))
}

/// Register a system phone number from its configured fields.
///
/// The number is normalized before storage. Re-registering an existing number
/// updates its owner and hooks in place.
pub async fn upsert_system_phone_number(
    db: &Database,
    number: &str,
    owner_person_id: Option<&str>,
    forwarding_enabled: bool,
    received_workflow_type_id: Option<&str>,
) -> Result<SystemPhoneNumberId, ThreadlineError> {
    let normalized = normalize_number(number);
    let system = SystemPhoneNumber {
        id: SystemPhoneNumberId(uuid::Uuid::new_v4().to_string()),
        e164_number: normalized,
        assigned_owner_person_id: owner_person_id.map(PersonId::from),
        is_forwarding_enabled: forwarding_enabled,
        received_workflow_type_id: received_workflow_type_id.map(WorkflowTypeId::from),
    };
    queries::phone_numbers::upsert_system_phone_number(db, &system).await
}
