// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the correlation engine and its collaborators.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::token::ResponseToken;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// Unique identifier for a person (participant) known to the directory.
    PersonId
);
string_id!(
    /// Unique identifier for a registered system phone number.
    SystemPhoneNumberId
);
string_id!(
    /// Unique identifier for a recorded communication.
    CommunicationId
);
string_id!(
    /// Identifier of a workflow type launched when an SMS is received.
    WorkflowTypeId
);

/// A participant resolved from a phone number or an owner assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub display_name: String,
    /// Placeholder created for a number nobody has claimed yet.
    #[serde(default)]
    pub is_anonymous: bool,
}

impl Person {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: PersonId(id.into()),
            display_name: display_name.into(),
            is_anonymous: false,
        }
    }

    /// Build the placeholder participant used when a number matches nobody.
    pub fn anonymous(id: impl Into<String>) -> Self {
        Self {
            id: PersonId(id.into()),
            display_name: ANONYMOUS_DISPLAY_NAME.to_string(),
            is_anonymous: true,
        }
    }
}

/// Display name given to placeholder participants.
pub const ANONYMOUS_DISPLAY_NAME: &str = "Unknown sender";

/// A phone number the organization owns and that can receive SMS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemPhoneNumber {
    pub id: SystemPhoneNumberId,
    /// Number in normalized form (see [`normalize_number`](crate::phone::normalize_number)).
    pub e164_number: String,
    /// Person who answers conversations arriving at this number.
    pub assigned_owner_person_id: Option<PersonId>,
    /// Whether routed messages should also be forwarded to the owner's mobile.
    pub is_forwarding_enabled: bool,
    /// Workflow launched for every message received at this number.
    pub received_workflow_type_id: Option<WorkflowTypeId>,
}

/// A media attachment carried by an inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// An SMS decoded from the carrier webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub from_number: String,
    pub to_number: String,
    pub body: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl InboundMessage {
    pub fn new(
        from_number: impl Into<String>,
        to_number: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from_number: from_number.into(),
            to_number: to_number.into(),
            body: body.into(),
            attachments: Vec::new(),
        }
    }
}

/// A ledger row: the conversation a response token was attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub token: ResponseToken,
    pub source_communication_id: CommunicationId,
    pub original_sender_person_id: PersonId,
}

/// How an inbound message relates to prior conversation history.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum CorrelationState {
    /// A third party started (or continued without a token) a conversation.
    NewConversation,
    /// The number's owner replied and the embedded token resolved.
    ReplyToSameParticipant,
    /// The owner replied with a token the ledger does not know.
    ReplyToSameParticipantNoTokenMatch,
    /// The owner replied without any token; the target is ambiguous.
    ReplyToSameParticipantNoToken,
    /// The recipient number is not registered.
    UnknownSystemNumber,
}

impl CorrelationState {
    /// States that deliver the message into a conversation.
    pub fn is_routable(self) -> bool {
        matches!(self, Self::NewConversation | Self::ReplyToSameParticipant)
    }

    /// States that describe a rejected message rather than a warning or a delivery.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Self::ReplyToSameParticipantNoToken | Self::UnknownSystemNumber
        )
    }
}

/// Outcome of correlating one inbound message. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub state: CorrelationState,
    /// Token allocated for a new conversation.
    pub token: Option<ResponseToken>,
    /// Who receives `message`. `None` for unassigned conversations and rejected messages.
    pub target_person_id: Option<PersonId>,
    /// Outgoing body, or the warning/error text for non-routable states.
    pub message: String,
    /// Communication the reply continues (`ReplyToSameParticipant` only).
    pub source_communication_id: Option<CommunicationId>,
    pub sender_person_id: Option<PersonId>,
    pub system_phone_number_id: Option<SystemPhoneNumberId>,
    /// Normalized sender number.
    pub from_number: String,
    /// Normalized recipient number.
    pub to_number: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}
