// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound message routing.
//!
//! Orchestrates one correlation: normalize → resolve sender → resolve system
//! number and owner → ledger lookup for owner replies → decide → allocate a
//! token for new conversations → build the result → best-effort hooks.

use std::sync::Arc;
use std::time::Instant;

use threadline_core::{
    CorrelationResult, ForwardingNotifier, InboundMessage, PersonDirectory, ResponseToken,
    SystemPhoneNumberDirectory, ThreadlineError, TokenLedger, WorkflowTrigger, find_tokens,
    normalize_number,
};
use threadline_tokens::ResponseTokenPool;
use tracing::{debug, info, warn};

use crate::recording;
use crate::resolver::{ConversationResolver, ResolverInput};
use crate::workflow::SmsReceivedWorkflow;

/// Correlates inbound messages and notifies side channels.
///
/// Cheap to share: all collaborators are behind `Arc`, so one router serves
/// every concurrent inbound handler.
pub struct MessageRouter {
    resolver: ConversationResolver,
    pool: Arc<ResponseTokenPool>,
    ledger: Arc<dyn TokenLedger>,
    people: Arc<dyn PersonDirectory>,
    numbers: Arc<dyn SystemPhoneNumberDirectory>,
    workflows: Option<Arc<dyn WorkflowTrigger>>,
    forwarding: Option<Arc<dyn ForwardingNotifier>>,
}

impl MessageRouter {
    pub fn new(
        pool: Arc<ResponseTokenPool>,
        ledger: Arc<dyn TokenLedger>,
        people: Arc<dyn PersonDirectory>,
        numbers: Arc<dyn SystemPhoneNumberDirectory>,
    ) -> Self {
        Self {
            resolver: ConversationResolver::new(),
            pool,
            ledger,
            people,
            numbers,
            workflows: None,
            forwarding: None,
        }
    }

    /// Launch workflows for numbers that name a received-workflow type.
    pub fn with_workflow_trigger(mut self, trigger: Arc<dyn WorkflowTrigger>) -> Self {
        self.workflows = Some(trigger);
        self
    }

    /// Forward routed messages for numbers with forwarding enabled.
    pub fn with_forwarding_notifier(mut self, notifier: Arc<dyn ForwardingNotifier>) -> Self {
        self.forwarding = Some(notifier);
        self
    }

    pub fn pool(&self) -> &Arc<ResponseTokenPool> {
        &self.pool
    }

    /// Correlate one inbound message.
    ///
    /// Business outcomes (unknown number, unresolvable or missing token) come
    /// back as `Ok` with the matching state. `Err` means a collaborator failed
    /// or no response token could be allocated.
    pub async fn route(&self, msg: &InboundMessage) -> Result<CorrelationResult, ThreadlineError> {
        let started = Instant::now();
        let from_number = normalize_number(&msg.from_number);
        let to_number = normalize_number(&msg.to_number);

        let sender = self.people.resolve_by_sms_number(&from_number).await?;
        let system_number = self.numbers.find_by_number(&to_number).await?;

        let owner = match system_number
            .as_ref()
            .and_then(|n| n.assigned_owner_person_id.as_ref())
        {
            Some(owner_id) => {
                let owner = self.people.find_by_id(owner_id).await?;
                if owner.is_none() {
                    warn!(owner = %owner_id, to = %to_number, "assigned owner not found in directory");
                }
                owner
            }
            None => None,
        };

        let input = ResolverInput {
            from_number: &from_number,
            to_number: &to_number,
            system_number: system_number.as_ref(),
            sender: &sender,
            owner: owner.as_ref(),
            body: &msg.body,
        };

        let reply_entry = match input.reply_token() {
            Some(first) => {
                let tokens = find_tokens(&msg.body);
                if tokens.len() > 1 {
                    let ignored: Vec<&str> = tokens[1..].iter().map(|t| t.text.as_str()).collect();
                    recording::record_ignored_tokens(ignored.len());
                    warn!(
                        honored = %first.text,
                        ignored = ?ignored,
                        "reply carries several response tokens, only the first is honored"
                    );
                }
                match first.token() {
                    Some(token) => self.ledger.find_most_recent_by_token(token).await?,
                    None => None,
                }
            }
            None => None,
        };

        let decision = self.resolver.decide(&input, reply_entry.as_ref());
        debug!(state = %decision.state(), from = %from_number, to = %to_number, "message classified");

        let token: Option<ResponseToken> = if decision.needs_token() {
            Some(self.pool.allocate().await?)
        } else {
            None
        };

        let mut result = self.resolver.build(&input, decision, token)?;
        result.attachments = msg.attachments.clone();

        recording::record_routed(result.state);
        recording::record_route_duration(started.elapsed().as_secs_f64());
        info!(
            state = %result.state,
            token = ?result.token.map(|t| t.to_string()),
            target = ?result.target_person_id.as_ref().map(ToString::to_string),
            from = %result.from_number,
            to = %result.to_number,
            "inbound message correlated"
        );

        if let Some(number) = &system_number {
            if let (Some(trigger), Some(workflow_type)) =
                (&self.workflows, &number.received_workflow_type_id)
            {
                let attributes = SmsReceivedWorkflow::from_result(&result, &msg.body).to_attributes();
                if let Err(e) = trigger.launch(workflow_type, attributes).await {
                    recording::record_hook_failure("workflow");
                    warn!(
                        hook = trigger.name(),
                        workflow_type = %workflow_type,
                        error = %e,
                        "workflow launch failed, correlation result kept"
                    );
                }
            }

            if let Some(notifier) = &self.forwarding {
                if number.is_forwarding_enabled && result.state.is_routable() {
                    if let Err(e) = notifier.forward(&result).await {
                        recording::record_hook_failure("forwarding");
                        warn!(
                            hook = notifier.name(),
                            error = %e,
                            "message forwarding failed, correlation result kept"
                        );
                    }
                }
            }
        }

        Ok(result)
    }
}
