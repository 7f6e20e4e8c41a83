// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attributes of the workflow launched when a system number receives an SMS.

use std::collections::BTreeMap;

use threadline_core::CorrelationResult;

/// Typed attributes of an "SMS received" workflow launch.
///
/// Converted to a string map only when handed to the
/// [`WorkflowTrigger`](threadline_core::WorkflowTrigger).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsReceivedWorkflow {
    pub from_number: String,
    pub to_number: String,
    /// Message text as received, before any prefix or token stripping.
    pub body: String,
    pub sender_person_id: Option<String>,
    pub system_phone_number_id: Option<String>,
    pub correlation_state: String,
    pub response_token: Option<String>,
    pub target_person_id: Option<String>,
    pub attachment_urls: Vec<String>,
}

impl SmsReceivedWorkflow {
    pub fn from_result(result: &CorrelationResult, original_body: &str) -> Self {
        Self {
            from_number: result.from_number.clone(),
            to_number: result.to_number.clone(),
            body: original_body.to_string(),
            sender_person_id: result.sender_person_id.as_ref().map(ToString::to_string),
            system_phone_number_id: result.system_phone_number_id.as_ref().map(ToString::to_string),
            correlation_state: result.state.to_string(),
            response_token: result.token.map(|t| t.to_string()),
            target_person_id: result.target_person_id.as_ref().map(ToString::to_string),
            attachment_urls: result.attachments.iter().map(|a| a.url.clone()).collect(),
        }
    }

    /// Flatten into workflow attributes. Absent values are omitted.
    pub fn to_attributes(&self) -> BTreeMap<String, String> {
        let mut attributes = BTreeMap::new();
        attributes.insert("FromNumber".to_string(), self.from_number.clone());
        attributes.insert("ToNumber".to_string(), self.to_number.clone());
        attributes.insert("Message".to_string(), self.body.clone());
        attributes.insert("CorrelationState".to_string(), self.correlation_state.clone());

        let optional = [
            ("FromPersonId", &self.sender_person_id),
            ("SystemPhoneNumberId", &self.system_phone_number_id),
            ("ResponseCode", &self.response_token),
            ("ToPersonId", &self.target_person_id),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                attributes.insert(key.to_string(), value.clone());
            }
        }

        if !self.attachment_urls.is_empty() {
            attributes.insert(
                "AttachmentCount".to_string(),
                self.attachment_urls.len().to_string(),
            );
            attributes.insert("Attachments".to_string(), self.attachment_urls.join("\n"));
        }

        attributes
    }
}

#[cfg(test)]
mod tests {
    use threadline_core::{
        Attachment, CorrelationState, PersonId, ResponseToken, SystemPhoneNumberId,
    };

    use super::*;

    fn result() -> CorrelationResult {
        CorrelationResult {
            state: CorrelationState::NewConversation,
            token: Some(ResponseToken::new(512).unwrap()),
            target_person_id: Some(PersonId::from("p-owner")),
            message: "-Ana-\nhi\n( @512 )".to_string(),
            source_communication_id: None,
            sender_person_id: Some(PersonId::from("p-ana")),
            system_phone_number_id: Some(SystemPhoneNumberId::from("sys-1")),
            from_number: "15550199".to_string(),
            to_number: "15550100".to_string(),
            attachments: Vec::new(),
        }
    }

    #[test]
    fn attributes_carry_original_body_and_token() {
        let attrs = SmsReceivedWorkflow::from_result(&result(), "hi").to_attributes();
        assert_eq!(attrs["Message"], "hi");
        assert_eq!(attrs["ResponseCode"], "@512");
        assert_eq!(attrs["CorrelationState"], "NewConversation");
        assert_eq!(attrs["FromPersonId"], "p-ana");
        assert_eq!(attrs["ToPersonId"], "p-owner");
        assert!(!attrs.contains_key("Attachments"));
    }

    #[test]
    fn absent_values_are_omitted() {
        let mut result = result();
        result.token = None;
        result.target_person_id = None;
        let attrs = SmsReceivedWorkflow::from_result(&result, "hi").to_attributes();
        assert!(!attrs.contains_key("ResponseCode"));
        assert!(!attrs.contains_key("ToPersonId"));
    }

    #[test]
    fn attachments_are_listed() {
        let mut result = result();
        result.attachments = vec![
            Attachment {
                url: "https://media.example/1.jpg".to_string(),
                mime_type: Some("image/jpeg".to_string()),
            },
            Attachment {
                url: "https://media.example/2.jpg".to_string(),
                mime_type: None,
            },
        ];
        let attrs = SmsReceivedWorkflow::from_result(&result, "").to_attributes();
        assert_eq!(attrs["AttachmentCount"], "2");
        assert_eq!(
            attrs["Attachments"],
            "https://media.example/1.jpg\nhttps://media.example/2.jpg"
        );
    }
}
