//! End-to-end runs of the `castellan` binary.

use std::io::Write;
use std::process::{Command, Stdio};

const CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../castellan.example.toml");

const REQUEST: &str = r#"{
    "request": {
        "common_name": "api.example.com",
        "key_algorithm": "ECDSA",
        "key_size": 256,
        "signature_algorithm": "SHA256WITHECDSA",
        "profile": "EndEntityServerAuthCertificate"
    }
}"#;

fn run(input: &str) -> std::process::Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_castellan"))
        .arg(CONFIG)
        .env("RUST_LOG", "debug")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn stdout_is_only_the_specification() {
    let output = run(REQUEST);
    assert!(output.status.success());

    let spec: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(spec["backend_code"], "SHA256WITHECDSA");
    assert_eq!(spec["subject"]["common_name"], "api.example.com");

    let logs = String::from_utf8(output.stderr).unwrap();
    assert!(logs.contains("configuration loaded"));
}

#[test]
fn rejected_request_writes_nothing_to_stdout() {
    let output = run(&REQUEST.replace("SHA256WITHECDSA", "SHA256WITHRSA"));
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let logs = String::from_utf8(output.stderr).unwrap();
    assert!(logs.contains("castellan failed"));
}
