// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations. Each prints JSON to stdout for scripting.

use serde::Serialize;
use threadline_config::ThreadlineConfig;
use threadline_core::{
    CorrelationResult, InboundMessage, Person, ResponseToken, ThreadlineError, TokenLedger,
};
use threadline_storage::record_correlation;

use crate::app::App;

/// Output of `threadline route`.
#[derive(Debug, Serialize)]
pub struct RouteOutput {
    /// Id the result was recorded under. Absent with `--dry-run`.
    pub communication_id: Option<String>,
    #[serde(flatten)]
    pub result: CorrelationResult,
}

/// Output of `threadline lookup`.
#[derive(Debug, Serialize)]
pub struct LookupOutput {
    pub token: String,
    pub found: bool,
    pub active: bool,
    pub source_communication_id: Option<String>,
    pub original_sender_person_id: Option<String>,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ThreadlineError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ThreadlineError::Internal(format!("failed to serialize output: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Correlate one message and, unless `dry_run`, record the result.
pub async fn run_route(
    app: &App,
    from: &str,
    to: &str,
    body: &str,
    dry_run: bool,
) -> Result<RouteOutput, ThreadlineError> {
    let result = app.router.route(&InboundMessage::new(from, to, body)).await?;
    let communication_id = if dry_run {
        None
    } else {
        Some(record_correlation(&app.db, &result).await?.0)
    };
    let output = RouteOutput {
        communication_id,
        result,
    };
    print_json(&output)?;
    Ok(output)
}

/// Allocate `count` tokens without recording them.
pub async fn run_allocate(app: &App, count: usize) -> Result<Vec<ResponseToken>, ThreadlineError> {
    let mut tokens = Vec::with_capacity(count);
    for _ in 0..count {
        tokens.push(app.pool.allocate().await?);
    }
    let texts: Vec<String> = tokens.iter().map(ToString::to_string).collect();
    print_json(&serde_json::json!({ "tokens": texts }))?;
    Ok(tokens)
}

/// Parse `@4821` or `4821`.
pub fn parse_token(text: &str) -> Result<ResponseToken, ThreadlineError> {
    let text = text.trim();
    if text.starts_with('@') {
        text.parse()
    } else {
        format!("@{text}").parse()
    }
}

/// Show the most recent ledger entry for a token.
pub async fn run_lookup(
    app: &App,
    config: &ThreadlineConfig,
    token_text: &str,
) -> Result<LookupOutput, ThreadlineError> {
    let token = parse_token(token_text)?;
    let entry = app.ledger.find_most_recent_by_token(token).await?;
    let active = app
        .ledger
        .is_active(token, config.tokens.reuse_window_days)
        .await?;
    let output = LookupOutput {
        token: token.to_string(),
        found: entry.is_some(),
        active,
        source_communication_id: entry.as_ref().map(|e| e.source_communication_id.0.clone()),
        original_sender_person_id: entry.map(|e| e.original_sender_person_id.0),
    };
    print_json(&output)?;
    Ok(output)
}

/// Register a known person and the numbers they text from.
pub async fn run_person(
    app: &App,
    id: &str,
    name: &str,
    numbers: &[String],
) -> Result<(), ThreadlineError> {
    let person = Person::new(id, name);
    let numbers: Vec<&str> = numbers.iter().map(String::as_str).collect();
    app.people.upsert(&person, &numbers).await?;
    print_json(&serde_json::json!({
        "person_id": id,
        "display_name": name,
        "numbers": numbers,
    }))
}

/// Print the effective configuration as TOML.
pub fn run_config(config: &ThreadlineConfig) -> Result<(), ThreadlineError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| ThreadlineError::Config(format!("failed to render configuration: {e}")))?;
    print!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_token_accepts_bare_digits() {
        assert_eq!(parse_token("4821").unwrap().value(), 4821);
        assert_eq!(parse_token(" @4821 ").unwrap().value(), 4821);
        assert!(parse_token("@12").is_err());
        assert!(parse_token("abc").is_err());
    }

    #[test]
    fn config_renders_as_toml() {
        let rendered = toml::to_string_pretty(&ThreadlineConfig::default()).unwrap();
        assert!(rendered.contains("[tokens]"));
        assert!(rendered.contains("reuse_window_days = 10"));
    }
}
