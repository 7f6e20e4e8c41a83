// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator contracts the engine consumes.
//!
//! Every collaborator extends [`Collaborator`] and uses `#[async_trait]` so it
//! can be held as `Arc<dyn Trait>`.

pub mod collaborator;
pub mod directory;
pub mod hooks;
pub mod ledger;

pub use collaborator::Collaborator;
pub use directory::{PersonDirectory, SystemPhoneNumberDirectory};
pub use hooks::{ForwardingNotifier, WorkflowTrigger};
pub use ledger::TokenLedger;
