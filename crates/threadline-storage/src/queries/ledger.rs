// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response token lookups over `communication_recipients`.
//!
//! Only `sms` rows take part: tokens are unique per medium.

use chrono::{Duration, Utc};
use rusqlite::{OptionalExtension, params, params_from_iter};
use threadline_core::{
    CommunicationId, LedgerEntry, PersonId, ResponseToken, ThreadlineError,
};

use crate::database::{Database, map_tr_err};
use crate::queries::timestamp;

pub const SMS_MEDIUM: &str = "sms";

fn cutoff(within_days: u32) -> String {
    timestamp(Utc::now() - Duration::days(i64::from(within_days)))
}

/// Whether `token` was assigned on or after `within_days` days ago.
pub async fn is_active(
    db: &Database,
    token: ResponseToken,
    within_days: u32,
) -> Result<bool, ThreadlineError> {
    let cutoff = cutoff(within_days);
    db.connection()
        .call(move |conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM communication_recipients
                     WHERE medium = ?1 AND response_code = ?2 AND created_at >= ?3
                     LIMIT 1",
                    params![SMS_MEDIUM, token.value(), cutoff],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
        .await
        .map_err(map_tr_err)
}

/// The subset of `candidates` assigned within the window, in one query.
pub async fn active_among(
    db: &Database,
    candidates: &[ResponseToken],
    within_days: u32,
) -> Result<Vec<ResponseToken>, ThreadlineError> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }
    let cutoff = cutoff(within_days);
    let values: Vec<u32> = candidates.iter().map(|t| t.value()).collect();

    let active: Vec<u32> = db
        .connection()
        .call(move |conn| {
            let placeholders = vec!["?"; values.len()].join(", ");
            let sql = format!(
                "SELECT DISTINCT response_code FROM communication_recipients
                 WHERE medium = ? AND created_at >= ? AND response_code IN ({placeholders})"
            );
            let mut stmt = conn.prepare(&sql)?;
            let params = [
                rusqlite::types::Value::Text(SMS_MEDIUM.to_string()),
                rusqlite::types::Value::Text(cutoff),
            ]
            .into_iter()
            .chain(values.iter().map(|v| rusqlite::types::Value::Integer(i64::from(*v))));
            let rows = stmt.query_map(params_from_iter(params), |row| row.get(0))?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)?;

    Ok(active
        .into_iter()
        .filter_map(|v| ResponseToken::new(v).ok())
        .collect())
}

/// The most recent assignment of `token`, regardless of age.
pub async fn find_most_recent_by_token(
    db: &Database,
    token: ResponseToken,
) -> Result<Option<LedgerEntry>, ThreadlineError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT r.communication_id, c.sender_person_id
                 FROM communication_recipients r
                 JOIN communications c ON c.id = r.communication_id
                 WHERE r.medium = ?1 AND r.response_code = ?2 AND c.sender_person_id IS NOT NULL
                 ORDER BY r.created_at DESC, r.id DESC
                 LIMIT 1",
                params![SMS_MEDIUM, token.value()],
                |row| {
                    Ok(LedgerEntry {
                        token,
                        source_communication_id: CommunicationId(row.get(0)?),
                        original_sender_person_id: PersonId(row.get(1)?),
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}
