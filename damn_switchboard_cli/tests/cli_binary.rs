//! Process-level checks on the `damn-switchboard` binary:
//! exit status, which stream each message lands on, and files left behind.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};

fn switchboard(input: &Path, output: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_damn-switchboard"))
        .arg(input)
        .arg(output)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn missing_inbox_exits_nonzero_on_stderr() {
    let tmp = tempfile::tempdir().unwrap();
    let inbox = tmp.path().join("nope.json");
    let out = tmp.path().join("out").join("x.json");

    let run = switchboard(&inbox, &out);
    assert!(!run.status.success());
    let stderr = String::from_utf8(run.stderr).unwrap();
    assert!(stderr.starts_with("[EA] Inbox not found at "), "{stderr}");
    assert!(run.stdout.is_empty());
    assert!(!out.exists());
    assert!(!tmp.path().join("out").exists());
}

#[test]
fn nomination_exits_zero_with_summary_on_stdout() {
    let tmp = tempfile::tempdir().unwrap();
    let inbox = tmp.path().join("inbox.json");
    let body = json!({"messages": [
        {"id": "EA-1", "type": "PROPOSE",
         "header": {"agent_id": "MyAI", "domains": ["web"]},
         "body": {"goal": "Launch site", "approach": "static", "verb": "propose"}}
    ]});
    fs::write(&inbox, body.to_string()).unwrap();
    let out = tmp.path().join("data").join("nomination.json");

    let run = switchboard(&inbox, &out);
    assert!(run.status.success());
    assert_eq!(
        String::from_utf8(run.stdout).unwrap(),
        "[EA] NOMINATE: Top plan nominated\n[EA] Top goal: Launch site\n"
    );
    assert!(run.stderr.is_empty());

    let on_disk: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(on_disk["payload"][0]["id"], json!("EA-1"));
}

#[test]
fn empty_inbox_exits_zero() {
    let tmp = tempfile::tempdir().unwrap();
    let inbox = tmp.path().join("inbox.json");
    fs::write(&inbox, r#"{"messages": []}"#).unwrap();
    let out = tmp.path().join("nomination.json");

    let run = switchboard(&inbox, &out);
    assert!(run.status.success());
    assert_eq!(String::from_utf8(run.stdout).unwrap(), "[EA] NONE: No proposals\n");
    assert!(out.exists());
}
