// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hooks wired by the CLI.
//!
//! The workflow engine and the carrier live outside this process, so the CLI
//! records what it would have launched or forwarded in the log.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::info;

use threadline_core::{
    Collaborator, CorrelationResult, ForwardingNotifier, ThreadlineError, WorkflowTrigger,
    WorkflowTypeId,
};

pub struct LoggingWorkflowTrigger;

impl Collaborator for LoggingWorkflowTrigger {
    fn name(&self) -> &str {
        "log-workflows"
    }
}

#[async_trait]
impl WorkflowTrigger for LoggingWorkflowTrigger {
    async fn launch(
        &self,
        workflow_type_id: &WorkflowTypeId,
        attributes: BTreeMap<String, String>,
    ) -> Result<(), ThreadlineError> {
        info!(
            workflow_type = %workflow_type_id,
            attributes = ?attributes,
            "workflow launch requested"
        );
        Ok(())
    }
}

pub struct LoggingForwardingNotifier;

impl Collaborator for LoggingForwardingNotifier {
    fn name(&self) -> &str {
        "log-forwarding"
    }
}

#[async_trait]
impl ForwardingNotifier for LoggingForwardingNotifier {
    async fn forward(&self, result: &CorrelationResult) -> Result<(), ThreadlineError> {
        info!(
            state = %result.state,
            target = ?result.target_person_id.as_ref().map(ToString::to_string),
            "forward to owner mobile requested"
        );
        Ok(())
    }
}
