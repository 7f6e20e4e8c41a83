// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema migrations, embedded from `migrations/` at compile time and applied
//! by [`Database::open`](crate::Database::open).

use threadline_core::ThreadlineError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply whatever the `refinery_schema_history` table says is missing.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), ThreadlineError> {
    let applied = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| ThreadlineError::Storage {
            source: Box::new(e),
        })?
        .applied_migrations()
        .len();
    if applied > 0 {
        tracing::info!(applied, "correlation schema migrated");
    }
    Ok(())
}
