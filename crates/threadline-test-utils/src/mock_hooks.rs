// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording workflow trigger and forwarding notifier.
//!
//! Both capture every call for assertion and can be switched into a failing
//! mode to exercise best-effort hook handling.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use threadline_core::{
    Collaborator, CorrelationResult, ForwardingNotifier, ThreadlineError, WorkflowTrigger,
    WorkflowTypeId,
};

/// A workflow launch captured by [`MockWorkflowTrigger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launch {
    pub workflow_type_id: WorkflowTypeId,
    pub attributes: BTreeMap<String, String>,
}

#[derive(Default)]
pub struct MockWorkflowTrigger {
    launches: Mutex<Vec<Launch>>,
    failing: AtomicBool,
}

impl MockWorkflowTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A trigger that records each launch and then fails it.
    pub fn failing() -> Self {
        let trigger = Self::default();
        trigger.failing.store(true, Ordering::SeqCst);
        trigger
    }

    pub async fn launches(&self) -> Vec<Launch> {
        self.launches.lock().await.clone()
    }
}

impl Collaborator for MockWorkflowTrigger {
    fn name(&self) -> &str {
        "mock-workflows"
    }
}

#[async_trait]
impl WorkflowTrigger for MockWorkflowTrigger {
    async fn launch(
        &self,
        workflow_type_id: &WorkflowTypeId,
        attributes: BTreeMap<String, String>,
    ) -> Result<(), ThreadlineError> {
        self.launches.lock().await.push(Launch {
            workflow_type_id: workflow_type_id.clone(),
            attributes,
        });
        if self.failing.load(Ordering::SeqCst) {
            return Err(ThreadlineError::collaborator(
                self.name(),
                "workflow engine rejected the launch",
            ));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MockForwardingNotifier {
    forwarded: Mutex<Vec<CorrelationResult>>,
    failing: AtomicBool,
}

impl MockForwardingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier that records each forward and then fails it.
    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.failing.store(true, Ordering::SeqCst);
        notifier
    }

    pub async fn forwarded(&self) -> Vec<CorrelationResult> {
        self.forwarded.lock().await.clone()
    }
}

impl Collaborator for MockForwardingNotifier {
    fn name(&self) -> &str {
        "mock-forwarding"
    }
}

#[async_trait]
impl ForwardingNotifier for MockForwardingNotifier {
    async fn forward(&self, result: &CorrelationResult) -> Result<(), ThreadlineError> {
        self.forwarded.lock().await.push(result.clone());
        if self.failing.load(Ordering::SeqCst) {
            return Err(ThreadlineError::collaborator(
                self.name(),
                "carrier refused the forward",
            ));
        }
        Ok(())
    }
}
