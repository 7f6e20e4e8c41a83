// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response token syntax: `@` followed by a 3 to 5 digit number.
//!
//! The lexical form bounds every token to `100..=99999`. The subset actually
//! handed out (and the blacklist) is configured on the token pool.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ThreadlineError;

/// Prefix marking a response token inside message text.
pub const TOKEN_PREFIX: char = '@';

/// Smallest value with the token lexical form (3 digits).
pub const LEXICAL_MIN: u32 = 100;

/// Largest value with the token lexical form (5 digits).
pub const LEXICAL_MAX: u32 = 99_999;

// ASCII-only: `\d` would also accept non-Latin digits.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[0-9]{3,5}").expect("token pattern is valid"));

/// A short numeric identifier embedded in outbound SMS text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResponseToken(u32);

impl ResponseToken {
    /// Wrap a numeric value, rejecting values outside the 3 to 5 digit form.
    pub fn new(value: u32) -> Result<Self, ThreadlineError> {
        if (LEXICAL_MIN..=LEXICAL_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ThreadlineError::InvalidToken(format!("{TOKEN_PREFIX}{value}")))
        }
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ResponseToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{TOKEN_PREFIX}{}", self.0)
    }
}

impl FromStr for ResponseToken {
    type Err = ThreadlineError;

    /// Parses the canonical form only: no surrounding whitespace, no leading zeros.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ThreadlineError::InvalidToken(s.to_string());
        let digits = s.strip_prefix(TOKEN_PREFIX).ok_or_else(invalid)?;
        if !(3..=5).contains(&digits.len())
            || !digits.bytes().all(|b| b.is_ascii_digit())
            || digits.starts_with('0')
        {
            return Err(invalid());
        }
        let value = digits.parse::<u32>().map_err(|_| invalid())?;
        Self::new(value)
    }
}

impl TryFrom<String> for ResponseToken {
    type Error = ThreadlineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResponseToken> for String {
    fn from(token: ResponseToken) -> Self {
        token.to_string()
    }
}

/// A token-shaped substring found in a message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch {
    /// The matched text exactly as it appears, e.g. `@4821`.
    pub text: String,
    /// Byte offset of the match in the body.
    pub start: usize,
}

impl TokenMatch {
    /// The canonical token, if the matched text is one (`@0123` is not).
    pub fn token(&self) -> Option<ResponseToken> {
        self.text.parse().ok()
    }

    /// Byte offset just past the match.
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// All token-shaped substrings of `body`, left to right.
pub fn find_tokens(body: &str) -> Vec<TokenMatch> {
    TOKEN_PATTERN
        .find_iter(body)
        .map(|m| TokenMatch {
            text: m.as_str().to_string(),
            start: m.start(),
        })
        .collect()
}

/// The first token-shaped substring of `body`, scanning left to right.
pub fn find_first_token(body: &str) -> Option<TokenMatch> {
    TOKEN_PATTERN.find(body).map(|m| TokenMatch {
        text: m.as_str().to_string(),
        start: m.start(),
    })
}

/// Cut the matched span out of `body` and trim the result.
///
/// Only that span is removed, so a longer token or other text sharing the
/// same digits survives. `found` must come from scanning this same `body`.
pub fn strip_token(body: &str, found: &TokenMatch) -> String {
    match (body.get(..found.start), body.get(found.end()..)) {
        (Some(before), Some(after)) if body[found.start..].starts_with(&found.text) => {
            format!("{before}{after}").trim().to_string()
        }
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn display_and_parse_canonical_form() {
        let token = ResponseToken::new(4821).unwrap();
        assert_eq!(token.to_string(), "@4821");
        assert_eq!("@4821".parse::<ResponseToken>().unwrap(), token);
    }

    #[test]
    fn parse_rejects_malformed_text() {
        for bad in ["4821", "@12", "@123456", "@0123", "@12a4", " @123", "@"] {
            assert!(bad.parse::<ResponseToken>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn new_enforces_lexical_bounds() {
        assert!(ResponseToken::new(99).is_err());
        assert!(ResponseToken::new(100).is_ok());
        assert!(ResponseToken::new(99_999).is_ok());
        assert!(ResponseToken::new(100_000).is_err());
    }

    #[test]
    fn serde_uses_display_form() {
        let token = ResponseToken::new(512).unwrap();
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"@512\"");
        let back: ResponseToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
        assert!(serde_json::from_str::<ResponseToken>("\"@5\"").is_err());
    }

    #[test]
    fn first_token_wins_left_to_right() {
        let found = find_first_token("see @2000 and @1000").unwrap();
        assert_eq!(found.text, "@2000");
        assert_eq!(found.start, 4);
        assert_eq!(find_tokens("see @2000 and @1000").len(), 2);
    }

    #[test]
    fn pattern_takes_at_most_five_digits() {
        let found = find_first_token("ref @1234567").unwrap();
        assert_eq!(found.text, "@12345");
    }

    #[test]
    fn no_token_in_plain_text() {
        assert!(find_first_token("thanks, see you soon").is_none());
        assert!(find_first_token("mail me at a@b.com").is_none());
        assert!(find_first_token("@12 is too short").is_none());
    }

    #[test]
    fn leading_zero_match_has_no_canonical_token() {
        let found = find_first_token("reply @0123").unwrap();
        assert_eq!(found.text, "@0123");
        assert!(found.token().is_none());
    }

    #[test]
    fn strip_removes_token_and_trims() {
        let body = "thanks @4821";
        assert_eq!(strip_token(body, &find_first_token(body).unwrap()), "thanks");
        let body = "@4821 ok";
        assert_eq!(strip_token(body, &find_first_token(body).unwrap()), "ok");
    }

    #[test]
    fn strip_keeps_longer_tokens_sharing_the_prefix() {
        let body = "thanks @482, order ref @48210";
        let found = find_first_token(body).unwrap();
        assert_eq!(found.text, "@482");
        assert_eq!(found.end(), 11);
        assert_eq!(strip_token(body, &found), "thanks , order ref @48210");
    }

    #[test]
    fn strip_removes_only_the_matched_occurrence() {
        let body = "@512 re @512";
        let found = find_first_token(body).unwrap();
        assert_eq!(strip_token(body, &found), "re @512");
    }

    #[test]
    fn strip_ignores_a_match_from_another_body() {
        let found = find_first_token("xx @512").unwrap();
        assert_eq!(strip_token(" ok ", &found), "ok");
    }

    proptest! {
        #[test]
        fn display_parse_roundtrip(value in LEXICAL_MIN..=LEXICAL_MAX) {
            let token = ResponseToken::new(value).unwrap();
            prop_assert_eq!(token.to_string().parse::<ResponseToken>().unwrap(), token);
        }

        #[test]
        fn embedded_token_is_found(prefix in "[a-z ]{0,20}", value in LEXICAL_MIN..=LEXICAL_MAX) {
            let body = format!("{prefix} @{value} end");
            let found = find_first_token(&body).unwrap();
            prop_assert_eq!(found.token(), Some(ResponseToken::new(value).unwrap()));
        }
    }
}
