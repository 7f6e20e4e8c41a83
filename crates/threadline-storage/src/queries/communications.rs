// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Communication and recipient rows.

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, params};
use threadline_core::{Attachment, CorrelationResult, ThreadlineError};

use crate::database::{Database, map_tr_err};
use crate::queries::ledger::SMS_MEDIUM;
use crate::queries::timestamp;

/// A stored communication, as read back for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunicationRow {
    pub id: String,
    pub correlation_state: String,
    pub sender_person_id: Option<String>,
    pub body: String,
    pub source_communication_id: Option<String>,
    pub attachments: Vec<Attachment>,
    pub created_at: String,
}

/// Insert `result` as communication `id`, plus a recipient row when it has a
/// target or a response token. The recipient row carries the token, so an
/// unowned number's conversation still occupies its token in the ledger.
pub async fn insert_result(
    db: &Database,
    id: &str,
    result: &CorrelationResult,
    created_at: DateTime<Utc>,
) -> Result<(), ThreadlineError> {
    let id = id.to_string();
    let result = result.clone();
    let created_at = timestamp(created_at);
    let attachments = serde_json::to_string(&result.attachments).map_err(|e| {
        ThreadlineError::Storage {
            source: Box::new(e),
        }
    })?;

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO communications (id, correlation_state, sender_person_id,
                    system_phone_number_id, from_number, to_number, body,
                    source_communication_id, attachments, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    id,
                    result.state.to_string(),
                    result.sender_person_id.as_ref().map(|p| p.0.clone()),
                    result.system_phone_number_id.as_ref().map(|s| s.0.clone()),
                    result.from_number,
                    result.to_number,
                    result.message,
                    result.source_communication_id.as_ref().map(|c| c.0.clone()),
                    attachments,
                    created_at,
                ],
            )?;
            // A token must reach the ledger even when nobody owns the number.
            if result.target_person_id.is_some() || result.token.is_some() {
                tx.execute(
                    "INSERT INTO communication_recipients
                        (communication_id, person_id, medium, response_code, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        id,
                        result.target_person_id.as_ref().map(|p| p.0.clone()),
                        SMS_MEDIUM,
                        result.token.map(|t| t.value()),
                        created_at,
                    ],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_communication(
    db: &Database,
    id: &str,
) -> Result<Option<CommunicationRow>, ThreadlineError> {
    let id = id.to_string();
    let row = db
        .connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, correlation_state, sender_person_id, body,
                        source_communication_id, attachments, created_at
                 FROM communications WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, Option<String>>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)?;

    row.map(
        |(id, correlation_state, sender_person_id, body, source_communication_id, attachments, created_at)| {
            let attachments = serde_json::from_str(&attachments).map_err(|e| {
                ThreadlineError::Storage {
                    source: Box::new(e),
                }
            })?;
            Ok(CommunicationRow {
                id,
                correlation_state,
                sender_person_id,
                body,
                source_communication_id,
                attachments,
                created_at,
            })
        },
    )
    .transpose()
}

/// Number of recipient rows carrying a response token.
pub async fn count_tokened_recipients(db: &Database) -> Result<u64, ThreadlineError> {
    db.connection()
        .call(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM communication_recipients WHERE response_code IS NOT NULL",
                [],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
        .await
        .map_err(map_tr_err)
}
