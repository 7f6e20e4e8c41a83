// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation correlation and message routing for Threadline.
//!
//! This crate provides:
//! - [`ConversationResolver`]: pure classification of an inbound message into a correlation state
//! - [`MessageRouter`]: the per-message orchestration around the resolver, the token pool and
//!   the collaborator hooks
//! - [`SmsReceivedWorkflow`]: typed attributes for the "SMS received" workflow

pub mod recording;
pub mod resolver;
pub mod router;
pub mod workflow;

pub use resolver::{ConversationResolver, Decision, ResolverInput};
pub use router::MessageRouter;
pub use workflow::SmsReceivedWorkflow;
