// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation correlation decisions.
//!
//! Classifies an inbound message into a [`CorrelationState`] from facts the
//! router has already gathered. No I/O, no clock, no randomness: the same
//! inputs always give the same decision and the same result text.
//!
//! Decision order:
//! 1. Recipient number not registered → `UnknownSystemNumber`
//! 2. Sender is the number's owner → reply handling on the first token
//! 3. Anyone else → `NewConversation` routed to the owner

use threadline_core::token::TokenMatch;
use threadline_core::{
    CorrelationResult, CorrelationState, LedgerEntry, Person, PersonId, ResponseToken,
    SystemPhoneNumber, ThreadlineError, find_first_token, strip_token,
};

/// Facts about one inbound message, gathered by the router.
#[derive(Debug, Clone, Copy)]
pub struct ResolverInput<'a> {
    /// Normalized sender number.
    pub from_number: &'a str,
    /// Normalized recipient number.
    pub to_number: &'a str,
    pub system_number: Option<&'a SystemPhoneNumber>,
    /// Always present; an anonymous placeholder for unknown senders.
    pub sender: &'a Person,
    /// The system number's assigned owner, when one exists.
    pub owner: Option<&'a Person>,
    pub body: &'a str,
}

impl ResolverInput<'_> {
    /// Whether the sender is the person answering this system number.
    pub fn is_owner_reply(&self) -> bool {
        self.system_number.is_some() && self.owner.is_some_and(|owner| owner.id == self.sender.id)
    }

    /// The token a reply should be correlated on: the first one in the body.
    ///
    /// `None` unless this is an owner reply.
    pub fn reply_token(&self) -> Option<TokenMatch> {
        if self.is_owner_reply() {
            find_first_token(self.body)
        } else {
            None
        }
    }
}

/// Where a message goes, before any token is allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    UnknownSystemNumber,
    /// Needs a freshly allocated token to be completed.
    NewConversation { target: Option<PersonId> },
    Reply { found: TokenMatch, entry: LedgerEntry },
    NoTokenMatch { token_text: String },
    NoToken,
}

impl Decision {
    pub fn state(&self) -> CorrelationState {
        match self {
            Decision::UnknownSystemNumber => CorrelationState::UnknownSystemNumber,
            Decision::NewConversation { .. } => CorrelationState::NewConversation,
            Decision::Reply { .. } => CorrelationState::ReplyToSameParticipant,
            Decision::NoTokenMatch { .. } => CorrelationState::ReplyToSameParticipantNoTokenMatch,
            Decision::NoToken => CorrelationState::ReplyToSameParticipantNoToken,
        }
    }

    pub fn needs_token(&self) -> bool {
        matches!(self, Decision::NewConversation { .. })
    }
}

/// Stateless correlation logic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversationResolver;

impl ConversationResolver {
    pub fn new() -> Self {
        Self
    }

    /// Classify a message.
    ///
    /// `reply_entry` is the ledger's most recent entry for
    /// [`ResolverInput::reply_token`], if the router found one. An entry for a
    /// different token than the first one in the body is ignored.
    pub fn decide(&self, input: &ResolverInput<'_>, reply_entry: Option<&LedgerEntry>) -> Decision {
        let Some(system_number) = input.system_number else {
            return Decision::UnknownSystemNumber;
        };

        if !input.is_owner_reply() {
            return Decision::NewConversation {
                target: system_number.assigned_owner_person_id.clone(),
            };
        }

        let Some(first) = find_first_token(input.body) else {
            return Decision::NoToken;
        };

        match (first.token(), reply_entry) {
            (Some(token), Some(entry)) if entry.token == token => Decision::Reply {
                found: first,
                entry: entry.clone(),
            },
            _ => Decision::NoTokenMatch {
                token_text: first.text,
            },
        }
    }

    /// Build the final result for `decision`.
    ///
    /// `token` must be the allocated token for `NewConversation` and is
    /// ignored otherwise.
    pub fn build(
        &self,
        input: &ResolverInput<'_>,
        decision: Decision,
        token: Option<ResponseToken>,
    ) -> Result<CorrelationResult, ThreadlineError> {
        let state = decision.state();
        let (token, target_person_id, message, source_communication_id) = match decision {
            Decision::UnknownSystemNumber => (
                None,
                None,
                unknown_number_message(input.to_number),
                None,
            ),
            Decision::NewConversation { target } => {
                let token = token.ok_or_else(|| {
                    ThreadlineError::Internal(
                        "new conversation requires an allocated response token".to_string(),
                    )
                })?;
                (
                    Some(token),
                    target,
                    format_new_conversation(&input.sender.display_name, input.body, token),
                    None,
                )
            }
            Decision::Reply { found, entry } => (
                None,
                Some(entry.original_sender_person_id),
                strip_token(input.body, &found),
                Some(entry.source_communication_id),
            ),
            Decision::NoTokenMatch { token_text } => (
                None,
                Some(input.sender.id.clone()),
                no_token_match_message(&token_text),
                None,
            ),
            Decision::NoToken => (
                None,
                Some(input.sender.id.clone()),
                NO_TOKEN_MESSAGE.to_string(),
                None,
            ),
        };

        Ok(CorrelationResult {
            state,
            token,
            target_person_id,
            message,
            source_communication_id,
            sender_person_id: Some(input.sender.id.clone()),
            system_phone_number_id: input.system_number.map(|n| n.id.clone()),
            from_number: input.from_number.to_string(),
            to_number: input.to_number.to_string(),
            attachments: Vec::new(),
        })
    }
}

/// Sent back to an owner whose reply carries no token.
pub const NO_TOKEN_MESSAGE: &str = "Your reply could not be delivered because it does not \
    contain a response token. Reply again including the @ code from the message you are \
    answering.";

/// Outgoing body for a new conversation: sender header, text, token footer.
pub fn format_new_conversation(display_name: &str, body: &str, token: ResponseToken) -> String {
    format!("-{display_name}-\n{}\n( {token} )", body.trim())
}

pub fn no_token_match_message(token_text: &str) -> String {
    format!("A conversation could not be found with the response token {token_text}.")
}

pub fn unknown_number_message(to_number: &str) -> String {
    format!("The number {to_number} is not registered to receive messages.")
}
