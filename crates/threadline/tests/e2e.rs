// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests that drive the `threadline` binary.
//!
//! Each test writes its own config pointing at a temp SQLite database, so
//! tests are independent and order-insensitive.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

const SYSTEM: &str = "+1 555 010 0100";
const OWNER_MOBILE: &str = "+1 555 010 0200";
const STRANGER: &str = "+1 555 010 0300";

struct Env {
    _dir: tempfile::TempDir,
    config: PathBuf,
}

impl Env {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("data").join("threadline.db");
        let config = dir.path().join("threadline.toml");
        let content = format!(
            r#"
[engine]
log_level = "warn"

[storage]
database_path = "{}"

[[phone_numbers]]
number = "{SYSTEM}"
owner_person_id = "p-owner"
"#,
            db.display().to_string().replace('\\', "/")
        );
        std::fs::write(&config, content).unwrap();
        Self { _dir: dir, config }
    }

    fn run(&self, args: &[&str]) -> Output {
        run_with_config(&self.config, args)
    }

    fn json(&self, args: &[&str]) -> Value {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "threadline {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }

    fn register_owner(&self) {
        self.json(&[
            "person", "--id", "p-owner", "--name", "Olivia", "--number", OWNER_MOBILE,
        ]);
    }
}

fn run_with_config(config: &Path, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_threadline"));
    command.arg("--config").arg(config).args(args).env_remove("RUST_LOG");
    for (key, _) in std::env::vars() {
        if key.starts_with("THREADLINE_") {
            command.env_remove(key);
        }
    }
    command.output().unwrap()
}

#[test]
fn stranger_then_owner_reply_round_trip() {
    let env = Env::new();
    env.register_owner();

    let first = env.json(&["route", "--from", STRANGER, "--to", SYSTEM, "--body", "Is it ready?"]);
    assert_eq!(first["state"], "NewConversation");
    assert_eq!(first["target_person_id"], "p-owner");
    let token = first["token"].as_str().unwrap().to_string();
    assert!(token.starts_with('@'));
    assert!(first["message"].as_str().unwrap().ends_with(&format!("( {token} )")));
    let communication = first["communication_id"].as_str().unwrap().to_string();

    let reply_body = format!("{token} yes, pick up at 5");
    let reply = env.json(&["route", "--from", OWNER_MOBILE, "--to", SYSTEM, "--body", &reply_body]);
    assert_eq!(reply["state"], "ReplyToSameParticipant");
    assert_eq!(reply["target_person_id"], first["sender_person_id"]);
    assert_eq!(reply["source_communication_id"], communication.as_str());
    assert_eq!(reply["message"], "yes, pick up at 5");

    let lookup = env.json(&["lookup", token.trim_start_matches('@')]);
    assert_eq!(lookup["found"], true);
    assert_eq!(lookup["active"], true);
    assert_eq!(lookup["source_communication_id"], communication.as_str());
}

#[test]
fn owner_without_token_is_rejected() {
    let env = Env::new();
    env.register_owner();

    let result = env.json(&["route", "--from", OWNER_MOBILE, "--to", SYSTEM, "--body", "hello?"]);
    assert_eq!(result["state"], "ReplyToSameParticipantNoToken");
    assert!(result["token"].is_null());
}

#[test]
fn unknown_system_number() {
    let env = Env::new();
    let result = env.json(&[
        "route", "--from", STRANGER, "--to", "+1 555 010 9999", "--body", "anyone?",
    ]);
    assert_eq!(result["state"], "UnknownSystemNumber");
    assert!(result["token"].is_null());
}

#[test]
fn dry_run_does_not_record() {
    let env = Env::new();
    let result = env.json(&[
        "route", "--from", STRANGER, "--to", SYSTEM, "--body", "hi", "--dry-run",
    ]);
    assert!(result["communication_id"].is_null());
    let token = result["token"].as_str().unwrap();

    let lookup = env.json(&["lookup", token]);
    assert_eq!(lookup["found"], false);
}

#[test]
fn allocate_returns_distinct_tokens() {
    let env = Env::new();
    let out = env.json(&["allocate", "--count", "3"]);
    let tokens: Vec<&str> = out["tokens"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t.as_str().unwrap())
        .collect();
    assert_eq!(tokens.len(), 3);
    assert!(tokens[0] != tokens[1] && tokens[1] != tokens[2] && tokens[0] != tokens[2]);
}

#[test]
fn lookup_rejects_malformed_token() {
    let env = Env::new();
    let output = env.run(&["lookup", "@12"]);
    assert!(!output.status.success());
}

#[test]
fn config_prints_effective_settings() {
    let env = Env::new();
    let output = env.run(&["config"]);
    assert!(output.status.success());
    let rendered: toml::Value = toml::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(rendered["tokens"]["reuse_window_days"].as_integer(), Some(10));
    assert_eq!(rendered["phone_numbers"][0]["owner_person_id"].as_str(), Some("p-owner"));
}

#[test]
fn invalid_config_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[tokens]\nmin_value = 5000\nmax_value = 100\n").unwrap();

    let output = run_with_config(&config, &["config"]);
    assert!(!output.status.success());
}
