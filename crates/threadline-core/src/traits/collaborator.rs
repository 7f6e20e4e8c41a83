// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait shared by every external collaborator.

/// Identity for a collaborator plugged into the engine.
///
/// The name shows up in log fields and in
/// [`ThreadlineError::Collaborator`](crate::ThreadlineError::Collaborator).
pub trait Collaborator: Send + Sync + 'static {
    /// Human-readable name of this collaborator instance.
    fn name(&self) -> &str;
}
