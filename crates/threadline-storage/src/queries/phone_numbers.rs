// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registered system phone numbers.

use rusqlite::{OptionalExtension, params};
use threadline_core::{
    PersonId, SystemPhoneNumber, SystemPhoneNumberId, ThreadlineError, WorkflowTypeId,
};

use crate::database::{Database, map_tr_err};

/// Insert or update a system phone number, keyed by its normalized number.
///
/// An existing row keeps its id.
pub async fn upsert_system_phone_number(
    db: &Database,
    number: &SystemPhoneNumber,
) -> Result<SystemPhoneNumberId, ThreadlineError> {
    let number = number.clone();
    db.connection()
        .call(move |conn| {
            let id: String = conn.query_row(
                "INSERT INTO system_phone_numbers
                    (id, number, owner_person_id, forwarding_enabled, received_workflow_type_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(number) DO UPDATE SET
                    owner_person_id = excluded.owner_person_id,
                    forwarding_enabled = excluded.forwarding_enabled,
                    received_workflow_type_id = excluded.received_workflow_type_id,
                    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 RETURNING id",
                params![
                    number.id.0,
                    number.e164_number,
                    number.assigned_owner_person_id.map(|p| p.0),
                    number.is_forwarding_enabled,
                    number.received_workflow_type_id.map(|w| w.0),
                ],
                |row| row.get(0),
            )?;
            Ok(SystemPhoneNumberId(id))
        })
        .await
        .map_err(map_tr_err)
}

pub async fn find_by_number(
    db: &Database,
    number: &str,
) -> Result<Option<SystemPhoneNumber>, ThreadlineError> {
    let number = number.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, number, owner_person_id, forwarding_enabled, received_workflow_type_id
                 FROM system_phone_numbers WHERE number = ?1",
                params![number],
                |row| {
                    Ok(SystemPhoneNumber {
                        id: SystemPhoneNumberId(row.get(0)?),
                        e164_number: row.get(1)?,
                        assigned_owner_person_id: row.get::<_, Option<String>>(2)?.map(PersonId),
                        is_forwarding_enabled: row.get(3)?,
                        received_workflow_type_id: row
                            .get::<_, Option<String>>(4)?
                            .map(WorkflowTypeId),
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}
