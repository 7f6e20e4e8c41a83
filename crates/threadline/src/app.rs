// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring of the SQLite store, token pool and router for one CLI run.

use std::sync::Arc;

use threadline_config::ThreadlineConfig;
use threadline_core::ThreadlineError;
use threadline_router::MessageRouter;
use threadline_storage::{
    Database, SqlitePersonDirectory, SqliteSystemPhoneNumberDirectory, SqliteTokenLedger,
    upsert_system_phone_number,
};
use threadline_tokens::ResponseTokenPool;
use tracing::{debug, info};

use crate::hooks::{LoggingForwardingNotifier, LoggingWorkflowTrigger};

pub struct App {
    pub db: Database,
    pub ledger: Arc<SqliteTokenLedger>,
    pub people: Arc<SqlitePersonDirectory>,
    pub pool: Arc<ResponseTokenPool>,
    pub router: MessageRouter,
}

impl App {
    /// Open the database, seed configured phone numbers and build the router.
    pub async fn open(config: &ThreadlineConfig) -> Result<Self, ThreadlineError> {
        let db = Database::from_config(&config.storage).await?;
        seed_phone_numbers(&db, config).await?;

        let ledger = Arc::new(SqliteTokenLedger::new(db.clone()));
        let people = Arc::new(SqlitePersonDirectory::new(db.clone()));
        let numbers = Arc::new(SqliteSystemPhoneNumberDirectory::new(db.clone()));
        let pool = Arc::new(ResponseTokenPool::from_config(
            &config.tokens,
            ledger.clone(),
        )?);

        let router = MessageRouter::new(pool.clone(), ledger.clone(), people.clone(), numbers)
            .with_workflow_trigger(Arc::new(LoggingWorkflowTrigger))
            .with_forwarding_notifier(Arc::new(LoggingForwardingNotifier));

        Ok(Self {
            db,
            ledger,
            people,
            pool,
            router,
        })
    }

    pub async fn close(self) -> Result<(), ThreadlineError> {
        self.db.close().await
    }
}

async fn seed_phone_numbers(db: &Database, config: &ThreadlineConfig) -> Result<(), ThreadlineError> {
    for phone in &config.phone_numbers {
        let id = upsert_system_phone_number(
            db,
            &phone.number,
            phone.owner_person_id.as_deref(),
            phone.forwarding_enabled,
            phone.received_workflow_type_id.as_deref(),
        )
        .await?;
        debug!(number = %phone.number, id = %id, "system phone number registered");
    }
    if !config.phone_numbers.is_empty() {
        info!(count = config.phone_numbers.len(), "seeded system phone numbers from configuration");
    }
    Ok(())
}
