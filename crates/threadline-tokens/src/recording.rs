// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token pool metrics, recorded through the metrics-rs facade.

use metrics::{describe_counter, describe_gauge};

/// Register token pool metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        "threadline_tokens_allocated_total",
        "Response tokens handed out"
    );
    describe_counter!(
        "threadline_token_refills_total",
        "Token cache refills from the ledger"
    );
    describe_counter!(
        "threadline_token_stale_discards_total",
        "Cached tokens discarded because the ledger reported them active"
    );
    describe_counter!(
        "threadline_token_exhaustions_total",
        "Allocations that failed with an exhausted token pool"
    );
    describe_gauge!(
        "threadline_token_cache_size",
        "Candidates left in the token cache after the last refill"
    );
}

pub fn record_allocated() {
    metrics::counter!("threadline_tokens_allocated_total").increment(1);
}

pub fn record_refill(available: usize) {
    metrics::counter!("threadline_token_refills_total").increment(1);
    metrics::gauge!("threadline_token_cache_size").set(available as f64);
}

pub fn record_stale_discard() {
    metrics::counter!("threadline_token_stale_discards_total").increment(1);
}

/// `reason` is either `attempts` or `space`.
pub fn record_exhaustion(reason: &'static str) {
    metrics::counter!("threadline_token_exhaustions_total", "reason" => reason).increment(1);
}
