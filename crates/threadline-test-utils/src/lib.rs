// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Threadline integration tests.
//!
//! Provides mock collaborators and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without a database or carrier.
//!
//! # Components
//!
//! - [`MockTokenLedger`] - in-memory ledger with backdatable assignments
//! - [`MockPersonDirectory`] / [`MockSystemPhoneNumberDirectory`] - in-memory directories
//! - [`MockWorkflowTrigger`] / [`MockForwardingNotifier`] - recording, optionally failing hooks
//! - [`TestHarness`] - a wired [`MessageRouter`](threadline_router::MessageRouter) with a seeded pool

pub mod harness;
pub mod mock_directory;
pub mod mock_hooks;
pub mod mock_ledger;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_directory::{MockPersonDirectory, MockSystemPhoneNumberDirectory};
pub use mock_hooks::{Launch, MockForwardingNotifier, MockWorkflowTrigger};
pub use mock_ledger::MockTokenLedger;
