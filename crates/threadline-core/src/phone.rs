// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phone number normalization.

/// Characters carriers and humans use to format numbers.
const FORMATTING: &[char] = &['+', '(', ')', '-', '.', '/'];

/// Normalize a phone number for lookup and comparison.
///
/// Strips the leading plus, whitespace and formatting punctuation. Letters are
/// kept so alphanumeric sender IDs stay distinguishable. Idempotent.
pub fn normalize_number(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !FORMATTING.contains(c))
        .collect()
}
