// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for Threadline.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, the SQLite token ledger and
//! directories, and the writer that records correlation results.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;
pub mod writer;

pub use adapter::{SqlitePersonDirectory, SqliteSystemPhoneNumberDirectory, SqliteTokenLedger};
pub use database::Database;
pub use writer::{record_correlation, record_correlation_at, upsert_system_phone_number};
