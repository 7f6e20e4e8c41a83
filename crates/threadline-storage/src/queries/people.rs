// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! People and their SMS numbers.

use rusqlite::{OptionalExtension, params};
use threadline_core::types::ANONYMOUS_DISPLAY_NAME;
use threadline_core::{Person, PersonId, ThreadlineError};

use crate::database::{Database, map_tr_err};

fn person_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        id: PersonId(row.get(0)?),
        display_name: row.get(1)?,
        is_anonymous: row.get(2)?,
    })
}

/// Insert or update a person and attach `numbers` (already normalized) to them.
pub async fn upsert_person(
    db: &Database,
    person: &Person,
    numbers: &[String],
) -> Result<(), ThreadlineError> {
    let person = person.clone();
    let numbers = numbers.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO people (id, display_name, is_anonymous) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                    display_name = excluded.display_name,
                    is_anonymous = excluded.is_anonymous",
                params![person.id.0, person.display_name, person.is_anonymous],
            )?;
            for number in &numbers {
                tx.execute(
                    "INSERT INTO person_phone_numbers (number, person_id) VALUES (?1, ?2)
                     ON CONFLICT(number) DO UPDATE SET person_id = excluded.person_id",
                    params![number, person.id.0],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// The person reachable at a normalized number, if any.
pub async fn find_by_number(db: &Database, number: &str) -> Result<Option<Person>, ThreadlineError> {
    let number = number.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT p.id, p.display_name, p.is_anonymous
                 FROM person_phone_numbers n JOIN people p ON p.id = n.person_id
                 WHERE n.number = ?1",
                params![number],
                person_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Resolve the person at a normalized number, creating an anonymous
/// placeholder on a miss. Lookup and insert run in one transaction.
///
/// Returns the person and whether it was created.
pub async fn resolve_or_create(
    db: &Database,
    number: &str,
) -> Result<(Person, bool), ThreadlineError> {
    let number = number.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let existing = tx
                .query_row(
                    "SELECT p.id, p.display_name, p.is_anonymous
                     FROM person_phone_numbers n JOIN people p ON p.id = n.person_id
                     WHERE n.number = ?1",
                    params![number],
                    person_from_row,
                )
                .optional()?;
            if let Some(person) = existing {
                return Ok((person, false));
            }

            let person = Person::anonymous(uuid::Uuid::new_v4().to_string());
            tx.execute(
                "INSERT INTO people (id, display_name, is_anonymous) VALUES (?1, ?2, 1)",
                params![person.id.0, ANONYMOUS_DISPLAY_NAME],
            )?;
            tx.execute(
                "INSERT INTO person_phone_numbers (number, person_id) VALUES (?1, ?2)",
                params![number, person.id.0],
            )?;
            tx.commit()?;
            Ok((person, true))
        })
        .await
        .map_err(map_tr_err)
}

pub async fn find_by_id(db: &Database, id: &PersonId) -> Result<Option<Person>, ThreadlineError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, display_name, is_anonymous FROM people WHERE id = ?1",
                params![id],
                person_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}
