// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end correlation scenarios through the mock harness.

use std::collections::HashSet;

use threadline_config::model::TokenConfig;
use threadline_core::{
    CommunicationId, CorrelationState, Person, PersonId, ResponseToken, ThreadlineError,
};
use threadline_test_utils::TestHarness;
use tracing_test::traced_test;

const SYSTEM: &str = "+1 555 010 0100";
const OWNER_MOBILE: &str = "+1 555 010 0200";
const CUSTOMER: &str = "+1 555 010 0300";

async fn harness() -> TestHarness {
    let h = TestHarness::builder().build().unwrap();
    h.with_owned_number(Person::new("p-owner", "Olivia Owner"), OWNER_MOBILE, SYSTEM)
        .await;
    h.people
        .add_person(Person::new("p-customer", "Ana Diaz"), &[CUSTOMER])
        .await;
    h
}

fn token(v: u32) -> ResponseToken {
    ResponseToken::new(v).unwrap()
}

fn assert_token_syntax(token: ResponseToken) {
    let text = token.to_string();
    assert!(text.starts_with('@'), "{text}");
    assert!(text[1..].chars().all(|c| c.is_ascii_digit()), "{text}");
    assert!((4..=6).contains(&text.len()), "{text}");
}

// ============================================================================
// Scenarios A to E
// ============================================================================

#[tokio::test]
async fn a_stranger_starts_new_conversation() {
    let h = harness().await;

    let result = h.send(CUSTOMER, SYSTEM, "Is my order ready?").await.unwrap();

    assert_eq!(result.state, CorrelationState::NewConversation);
    let token = result.token.expect("new conversation carries a token");
    assert_token_syntax(token);
    assert!(result.message.starts_with("-Ana Diaz-\n"), "{}", result.message);
    assert!(result.message.contains("Is my order ready?"));
    assert!(result.message.ends_with(&format!("( {token} )")));
    assert_eq!(result.target_person_id, Some(PersonId::from("p-owner")));
    assert_eq!(result.from_number, "15550100300");
    assert_eq!(result.to_number, "15550100100");
}

#[tokio::test]
async fn a_unknown_sender_gets_placeholder_name() {
    let h = harness().await;

    let result = h.send("+1 555 010 0999", SYSTEM, "hello").await.unwrap();

    assert_eq!(result.state, CorrelationState::NewConversation);
    assert!(result.message.starts_with("-Unknown sender-\n"));
    assert!(result.sender_person_id.is_some());
}

#[tokio::test]
async fn b_owner_reply_with_known_token_routes_to_customer() {
    let h = harness().await;
    h.ledger.assign(token(4821), "comm-1", "p-customer").await;

    let result = h.send(OWNER_MOBILE, SYSTEM, "thanks @4821").await.unwrap();

    assert_eq!(result.state, CorrelationState::ReplyToSameParticipant);
    assert_eq!(result.target_person_id, Some(PersonId::from("p-customer")));
    assert_eq!(result.message, "thanks");
    assert_eq!(result.source_communication_id, Some(CommunicationId::from("comm-1")));
    assert!(result.token.is_none());
}

#[tokio::test]
async fn b_reply_resolves_even_outside_reuse_window() {
    let h = harness().await;
    h.ledger
        .assign_days_ago(token(4821), "comm-old", "p-customer", 40)
        .await;

    let result = h.send(OWNER_MOBILE, SYSTEM, "@4821 following up").await.unwrap();

    assert_eq!(result.state, CorrelationState::ReplyToSameParticipant);
    assert_eq!(result.message, "following up");
}

#[tokio::test]
async fn c_owner_reply_with_unknown_token_warns_owner() {
    let h = harness().await;

    let result = h.send(OWNER_MOBILE, SYSTEM, "thanks @4821").await.unwrap();

    assert_eq!(result.state, CorrelationState::ReplyToSameParticipantNoTokenMatch);
    assert!(result.message.contains("@4821"));
    assert_eq!(result.target_person_id, Some(PersonId::from("p-owner")));
    assert!(result.token.is_none());
    assert_eq!(h.pool.reserved().await, 0, "no token was allocated");
}

#[tokio::test]
async fn d_owner_reply_without_token_is_rejected() {
    let h = harness().await;
    h.ledger.assign(token(4821), "comm-1", "p-customer").await;

    let result = h.send(OWNER_MOBILE, SYSTEM, "see you tomorrow").await.unwrap();

    assert_eq!(result.state, CorrelationState::ReplyToSameParticipantNoToken);
    assert!(result.state.is_error());
    assert_eq!(result.target_person_id, Some(PersonId::from("p-owner")));
    assert!(result.source_communication_id.is_none());
    assert_eq!(h.ledger.lookup_calls(), 0);
}

#[tokio::test]
async fn e_unregistered_number_does_no_token_work() {
    let h = harness().await;

    let result = h.send(CUSTOMER, "+1 555 010 9999", "hello @4821").await.unwrap();

    assert_eq!(result.state, CorrelationState::UnknownSystemNumber);
    assert!(result.token.is_none());
    assert!(result.target_person_id.is_none());
    assert_eq!(h.ledger.is_active_calls(), 0);
    assert_eq!(h.ledger.lookup_calls(), 0);
    assert_eq!(h.pool.reserved().await, 0);
}

// ============================================================================
// Full conversation round trip
// ============================================================================

#[tokio::test]
async fn owner_answers_with_allocated_token() {
    let h = harness().await;

    let (first, communication) = h
        .send_recorded(CUSTOMER, SYSTEM, "Can I move my appointment?")
        .await
        .unwrap();
    let token = first.token.unwrap();

    let reply = h
        .send(OWNER_MOBILE, SYSTEM, &format!("Sure, Friday works {token}"))
        .await
        .unwrap();

    assert_eq!(reply.state, CorrelationState::ReplyToSameParticipant);
    assert_eq!(reply.target_person_id, Some(PersonId::from("p-customer")));
    assert_eq!(reply.message, "Sure, Friday works");
    assert_eq!(reply.source_communication_id, communication);
}

#[tokio::test]
async fn customer_follow_up_gets_a_new_token() {
    let h = harness().await;

    let first = h.send(CUSTOMER, SYSTEM, "one").await.unwrap();
    let second = h.send(CUSTOMER, SYSTEM, "two").await.unwrap();

    assert_eq!(second.state, CorrelationState::NewConversation);
    assert_ne!(first.token, second.token);
}

#[tokio::test]
async fn attachments_are_carried_into_result() {
    use threadline_core::{Attachment, InboundMessage};

    let h = harness().await;
    let mut msg = InboundMessage::new(CUSTOMER, SYSTEM, "photo of the damage");
    msg.attachments.push(Attachment {
        url: "https://media.example/damage.jpg".to_string(),
        mime_type: Some("image/jpeg".to_string()),
    });

    let result = h.router.route(&msg).await.unwrap();
    assert_eq!(result.attachments, msg.attachments);
}

// ============================================================================
// Hooks
// ============================================================================

#[tokio::test]
async fn hooks_fire_for_new_conversation() {
    let h = harness().await;
    h.numbers
        .register_with_hooks("+1 555 010 0400", Some("p-owner"), "wf-sms-received")
        .await;

    let result = h.send(CUSTOMER, "+1 555 010 0400", "hi").await.unwrap();

    let launches = h.workflows.launches().await;
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0].workflow_type_id.0, "wf-sms-received");
    assert_eq!(launches[0].attributes["Message"], "hi");
    assert_eq!(
        launches[0].attributes["ResponseCode"],
        result.token.unwrap().to_string()
    );
    assert_eq!(h.forwarding.forwarded().await, vec![result]);
}

#[tokio::test]
async fn rejected_reply_launches_workflow_but_is_not_forwarded() {
    let h = harness().await;
    h.numbers
        .register_with_hooks("+1 555 010 0400", Some("p-owner"), "wf-sms-received")
        .await;

    let result = h.send(OWNER_MOBILE, "+1 555 010 0400", "no code here").await.unwrap();

    assert_eq!(result.state, CorrelationState::ReplyToSameParticipantNoToken);
    assert_eq!(h.workflows.launches().await.len(), 1);
    assert!(h.forwarding.forwarded().await.is_empty());
}

#[tokio::test]
async fn numbers_without_hooks_trigger_nothing() {
    let h = harness().await;

    h.send(CUSTOMER, SYSTEM, "hi").await.unwrap();

    assert!(h.workflows.launches().await.is_empty());
    assert!(h.forwarding.forwarded().await.is_empty());
}

#[tokio::test]
#[traced_test]
async fn failing_hooks_do_not_fail_routing() {
    let h = TestHarness::builder()
        .with_failing_workflows()
        .with_failing_forwarding()
        .build()
        .unwrap();
    h.numbers
        .register_with_hooks(SYSTEM, Some("p-owner"), "wf-sms-received")
        .await;

    let result = h.send(CUSTOMER, SYSTEM, "hi").await.unwrap();

    assert_eq!(result.state, CorrelationState::NewConversation);
    assert_eq!(h.workflows.launches().await.len(), 1);
    assert_eq!(h.forwarding.forwarded().await.len(), 1);
    assert!(logs_contain("workflow launch failed"));
    assert!(logs_contain("message forwarding failed"));
}

#[tokio::test]
#[traced_test]
async fn extra_tokens_are_logged() {
    let h = harness().await;
    h.ledger.assign(token(4821), "comm-1", "p-customer").await;

    let result = h
        .send(OWNER_MOBILE, SYSTEM, "thanks @4821, also see @5555")
        .await
        .unwrap();

    assert_eq!(result.state, CorrelationState::ReplyToSameParticipant);
    assert_eq!(result.message, "thanks , also see @5555");
    assert!(logs_contain("only the first is honored"));
    assert!(logs_contain("@5555"));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn exhausted_pool_fails_routing() {
    let tokens = TokenConfig {
        min_value: 100,
        max_value: 101,
        blacklist: Vec::new(),
        ..TokenConfig::default()
    };
    let h = TestHarness::builder().with_tokens(tokens).build().unwrap();
    h.numbers.register(SYSTEM, None).await;

    let first = h.send(CUSTOMER, SYSTEM, "one").await.unwrap();
    assert_eq!(first.token, Some(token(100)));
    assert_eq!(first.target_person_id, None);

    let err = h.send("+1 555 010 0301", SYSTEM, "two").await.unwrap_err();
    assert!(err.is_exhaustion(), "{err}");
}

#[tokio::test]
async fn ledger_outage_is_an_error() {
    let h = harness().await;
    h.ledger.set_failing(true);

    let err = h.send(OWNER_MOBILE, SYSTEM, "thanks @4821").await.unwrap_err();
    assert!(matches!(err, ThreadlineError::Storage { .. }));

    let err = h.send(CUSTOMER, SYSTEM, "hello").await.unwrap_err();
    assert!(matches!(err, ThreadlineError::Storage { .. }));
}

#[tokio::test]
async fn directory_outage_is_an_error() {
    let h = harness().await;
    h.people.set_failing(true);

    let err = h.send(CUSTOMER, SYSTEM, "hello").await.unwrap_err();
    assert!(matches!(err, ThreadlineError::Collaborator { .. }));
}

// ============================================================================
// Concurrency and determinism
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_strangers_get_distinct_tokens() {
    let h = harness().await;

    let sends = (0..200).map(|i| {
        let router = h.router.clone();
        async move {
            let msg = threadline_core::InboundMessage::new(
                format!("+1 555 020 {i:04}"),
                SYSTEM,
                "hello",
            );
            router.route(&msg).await
        }
    });
    let results = futures::future::join_all(sends).await;

    let mut seen = HashSet::new();
    for result in results {
        let token = result.unwrap().token.unwrap();
        assert!(seen.insert(token), "duplicate token {token}");
    }
}

#[tokio::test]
async fn same_seed_allocates_same_tokens() {
    let a = TestHarness::builder().with_seed(11).build().unwrap();
    let b = TestHarness::builder().with_seed(11).build().unwrap();
    a.numbers.register(SYSTEM, None).await;
    b.numbers.register(SYSTEM, None).await;

    for body in ["one", "two", "three"] {
        let ra = a.send(CUSTOMER, SYSTEM, body).await.unwrap();
        let rb = b.send(CUSTOMER, SYSTEM, body).await.unwrap();
        assert_eq!(ra.token, rb.token);
        assert_eq!(ra.message, rb.message);
    }
}
