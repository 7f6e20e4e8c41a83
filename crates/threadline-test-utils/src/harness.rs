// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end correlation testing.
//!
//! `TestHarness` assembles a complete [`MessageRouter`] over in-memory mock
//! collaborators and a seeded token pool. `send()` drives one message through
//! the router and, like the production persistence writer, records new
//! conversations in the ledger so follow-up replies can resolve.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use threadline_config::model::TokenConfig;
use threadline_core::{
    CommunicationId, CorrelationResult, InboundMessage, Person, ThreadlineError,
};
use threadline_router::MessageRouter;
use threadline_tokens::{PoolSettings, ResponseTokenPool, TokenSpace};

use crate::mock_directory::{MockPersonDirectory, MockSystemPhoneNumberDirectory};
use crate::mock_hooks::{MockForwardingNotifier, MockWorkflowTrigger};
use crate::mock_ledger::MockTokenLedger;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    seed: u64,
    tokens: TokenConfig,
    failing_workflows: bool,
    failing_forwarding: bool,
    record_results: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            seed: 0x7468_7265_6164,
            tokens: TokenConfig::default(),
            failing_workflows: false,
            failing_forwarding: false,
            record_results: true,
        }
    }

    /// Seed for the token pool's shuffle.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Token space and pool settings.
    pub fn with_tokens(mut self, tokens: TokenConfig) -> Self {
        self.tokens = tokens;
        self
    }

    /// Make every workflow launch fail.
    pub fn with_failing_workflows(mut self) -> Self {
        self.failing_workflows = true;
        self
    }

    /// Make every forward fail.
    pub fn with_failing_forwarding(mut self) -> Self {
        self.failing_forwarding = true;
        self
    }

    /// Do not record new conversations in the ledger after `send()`.
    pub fn without_recording(mut self) -> Self {
        self.record_results = false;
        self
    }

    pub fn build(self) -> Result<TestHarness, ThreadlineError> {
        let ledger = Arc::new(MockTokenLedger::new());
        let people = Arc::new(MockPersonDirectory::new());
        let numbers = Arc::new(MockSystemPhoneNumberDirectory::new());
        let workflows = Arc::new(if self.failing_workflows {
            MockWorkflowTrigger::failing()
        } else {
            MockWorkflowTrigger::new()
        });
        let forwarding = Arc::new(if self.failing_forwarding {
            MockForwardingNotifier::failing()
        } else {
            MockForwardingNotifier::new()
        });

        let pool = Arc::new(ResponseTokenPool::with_rng(
            TokenSpace::from_config(&self.tokens)?,
            PoolSettings::from_config(&self.tokens),
            ledger.clone(),
            StdRng::seed_from_u64(self.seed),
        ));

        let router = MessageRouter::new(pool.clone(), ledger.clone(), people.clone(), numbers.clone())
            .with_workflow_trigger(workflows.clone())
            .with_forwarding_notifier(forwarding.clone());

        Ok(TestHarness {
            router: Arc::new(router),
            pool,
            ledger,
            people,
            numbers,
            workflows,
            forwarding,
            record_results: self.record_results,
        })
    }
}

/// A complete correlation environment over mock collaborators.
pub struct TestHarness {
    pub router: Arc<MessageRouter>,
    pub pool: Arc<ResponseTokenPool>,
    pub ledger: Arc<MockTokenLedger>,
    pub people: Arc<MockPersonDirectory>,
    pub numbers: Arc<MockSystemPhoneNumberDirectory>,
    pub workflows: Arc<MockWorkflowTrigger>,
    pub forwarding: Arc<MockForwardingNotifier>,
    record_results: bool,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Register a person and a system number they own.
    pub async fn with_owned_number(&self, owner: Person, owner_mobile: &str, number: &str) {
        let owner_id = owner.id.0.clone();
        self.people.add_person(owner, &[owner_mobile]).await;
        self.numbers.register(number, Some(&owner_id)).await;
    }

    /// Route one message and record new conversations in the ledger.
    pub async fn send(
        &self,
        from: &str,
        to: &str,
        body: &str,
    ) -> Result<CorrelationResult, ThreadlineError> {
        let result = self.router.route(&InboundMessage::new(from, to, body)).await?;
        if self.record_results {
            self.ledger.record(&result).await;
        }
        Ok(result)
    }

    /// Route one message and return the communication id it was recorded under.
    pub async fn send_recorded(
        &self,
        from: &str,
        to: &str,
        body: &str,
    ) -> Result<(CorrelationResult, Option<CommunicationId>), ThreadlineError> {
        let result = self.router.route(&InboundMessage::new(from, to, body)).await?;
        let communication = self.ledger.record(&result).await;
        Ok((result, communication))
    }
}
