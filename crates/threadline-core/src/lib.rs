// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Threadline SMS correlation engine.
//!
//! This crate provides the error type, the domain types (people, system phone
//! numbers, inbound messages, correlation results), response token syntax,
//! phone number normalization, and the collaborator traits the engine talks
//! to. Directory, ledger, and hook implementations live in other crates.

pub mod error;
pub mod phone;
pub mod token;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ThreadlineError;
pub use phone::normalize_number;
pub use token::{ResponseToken, TokenMatch, find_first_token, find_tokens, strip_token};
pub use types::{
    Attachment, CommunicationId, CorrelationResult, CorrelationState, InboundMessage,
    LedgerEntry, Person, PersonId, SystemPhoneNumber, SystemPhoneNumberId, WorkflowTypeId,
};

pub use traits::{
    Collaborator, ForwardingNotifier, PersonDirectory, SystemPhoneNumberDirectory, TokenLedger,
    WorkflowTrigger,
};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;

    #[test]
    fn error_variants_render() {
        let exhausted = ThreadlineError::TokenPoolExhausted { attempts: 1000 };
        assert_eq!(
            exhausted.to_string(),
            "response token pool exhausted after 1000 attempts"
        );
        assert!(exhausted.is_exhaustion());

        let storage = ThreadlineError::Storage {
            source: Box::new(std::io::Error::other("disk")),
        };
        assert!(!storage.is_exhaustion());
        assert_eq!(storage.to_string(), "storage error: disk");

        let hook = ThreadlineError::collaborator("workflow", "engine offline");
        assert_eq!(hook.to_string(), "collaborator `workflow` failed: engine offline");
    }

    #[test]
    fn correlation_state_display_and_parse() {
        use std::str::FromStr;

        let states = [
            CorrelationState::NewConversation,
            CorrelationState::ReplyToSameParticipant,
            CorrelationState::ReplyToSameParticipantNoTokenMatch,
            CorrelationState::ReplyToSameParticipantNoToken,
            CorrelationState::UnknownSystemNumber,
        ];
        for state in states {
            let parsed = CorrelationState::from_str(&state.to_string()).unwrap();
            assert_eq!(parsed, state);
        }
    }

    #[test]
    fn correlation_state_classes() {
        assert!(CorrelationState::NewConversation.is_routable());
        assert!(CorrelationState::ReplyToSameParticipant.is_routable());
        assert!(!CorrelationState::ReplyToSameParticipantNoTokenMatch.is_routable());
        assert!(!CorrelationState::ReplyToSameParticipantNoTokenMatch.is_error());
        assert!(CorrelationState::ReplyToSameParticipantNoToken.is_error());
        assert!(CorrelationState::UnknownSystemNumber.is_error());
    }

    #[test]
    fn anonymous_person_is_flagged() {
        let p = Person::anonymous("anon-1");
        assert!(p.is_anonymous);
        assert_eq!(p.display_name, types::ANONYMOUS_DISPLAY_NAME);
        assert!(!Person::new("p-1", "Ada").is_anonymous);
    }

    #[test]
    fn ids_display_inner_value() {
        assert_eq!(PersonId::from("p-7").to_string(), "p-7");
        assert_eq!(CommunicationId::from("c-1").to_string(), "c-1");
    }

    struct AlwaysActive;

    impl Collaborator for AlwaysActive {
        fn name(&self) -> &str {
            "always-active"
        }
    }

    #[async_trait]
    impl TokenLedger for AlwaysActive {
        async fn is_active(&self, token: ResponseToken, _: u32) -> Result<bool, ThreadlineError> {
            Ok(token.value() % 2 == 0)
        }

        async fn find_most_recent_by_token(
            &self,
            _: ResponseToken,
        ) -> Result<Option<LedgerEntry>, ThreadlineError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn default_active_among_filters_per_token() {
        let ledger: Arc<dyn TokenLedger> = Arc::new(AlwaysActive);
        let candidates: Vec<ResponseToken> = (100..106)
            .map(|v| ResponseToken::new(v).unwrap())
            .collect();
        let active = ledger.active_among(&candidates, 10).await.unwrap();
        let values: Vec<u32> = active.iter().map(|t| t.value()).collect();
        assert_eq!(values, vec![100, 102, 104]);
    }

    #[test]
    fn collaborator_traits_are_object_safe() {
        fn _assert_person_directory(_: Arc<dyn PersonDirectory>) {}
        fn _assert_phone_directory(_: Arc<dyn SystemPhoneNumberDirectory>) {}
        fn _assert_ledger(_: Arc<dyn TokenLedger>) {}
        fn _assert_workflow(_: Arc<dyn WorkflowTrigger>) {}
        fn _assert_forwarding(_: Arc<dyn ForwardingNotifier>) {}
    }
}
