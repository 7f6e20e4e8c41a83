// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing metrics, recorded through the metrics-rs facade.

use metrics::{describe_counter, describe_histogram};
use threadline_core::CorrelationState;

/// Register routing metric descriptions (token pool metrics included).
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "threadline_messages_routed_total",
        "Inbound messages correlated, by correlation state"
    );
    describe_counter!(
        "threadline_hook_failures_total",
        "Best-effort collaborator hooks that failed, by hook"
    );
    describe_counter!(
        "threadline_ignored_tokens_total",
        "Extra tokens in a reply body that were not honored"
    );
    describe_histogram!(
        "threadline_route_duration_seconds",
        "Time spent correlating one inbound message"
    );
    threadline_tokens::recording::register_metrics();
}

pub fn record_routed(state: CorrelationState) {
    metrics::counter!("threadline_messages_routed_total", "state" => state.to_string())
        .increment(1);
}

pub fn record_hook_failure(hook: &'static str) {
    metrics::counter!("threadline_hook_failures_total", "hook" => hook).increment(1);
}

pub fn record_ignored_tokens(count: usize) {
    metrics::counter!("threadline_ignored_tokens_total").increment(count as u64);
}

pub fn record_route_duration(seconds: f64) {
    metrics::histogram!("threadline_route_duration_seconds").record(seconds);
}
