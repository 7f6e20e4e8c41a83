// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fire-and-forget side channels driven by a correlation outcome.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::ThreadlineError;
use crate::traits::collaborator::Collaborator;
use crate::types::{CorrelationResult, WorkflowTypeId};

/// Launches a workflow when a system number receives a message.
#[async_trait]
pub trait WorkflowTrigger: Collaborator {
    /// Start a workflow of `workflow_type_id` with string attributes.
    ///
    /// Failures are logged by the caller and never fail correlation.
    async fn launch(
        &self,
        workflow_type_id: &WorkflowTypeId,
        attributes: BTreeMap<String, String>,
    ) -> Result<(), ThreadlineError>;
}

/// Sends a copy of a routed message to the owner's mobile device.
#[async_trait]
pub trait ForwardingNotifier: Collaborator {
    /// Forward `result`. Only invoked for numbers with forwarding enabled.
    async fn forward(&self, result: &CorrelationResult) -> Result<(), ThreadlineError>;
}
