//! Integration tests for the CLI binaries.
//!
//! Drives `generate-peers-keys` and `genesis-tool` against files in a
//! temporary directory.
//!
//! This test is registered as a [[test]] in the iroha-genesis-cli crate
//! so that CARGO_BIN_EXE_* is available.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use iroha_genesis::registry::REGISTRY_HEADER;

fn generate_peers_keys() -> Command {
    Command::new(env!("CARGO_BIN_EXE_generate-peers-keys"))
}

fn genesis_tool() -> Command {
    Command::new(env!("CARGO_BIN_EXE_genesis-tool"))
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Write a two-column registry and key it with `generate-peers-keys`.
fn keyed_registry(dir: &Path) -> PathBuf {
    let path = dir.join("peers.csv");
    std::fs::write(&path, "10.0.0.1;10001\n10.0.0.2;10001\n").unwrap();
    let output = generate_peers_keys()
        .arg(&path)
        .output()
        .expect("failed to execute generate-peers-keys");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    path
}

#[test]
fn cli_responds_to_help() {
    for mut cmd in [generate_peers_keys(), genesis_tool()] {
        let output = cmd.arg("--help").output().expect("failed to execute --help");
        assert!(
            output.status.success(),
            "--help should exit with success, stderr: {}",
            stderr(&output)
        );
        assert!(stdout(&output).contains("Usage"));
    }
}

#[test]
fn generate_peers_keys_rewrites_registry() {
    let dir = tempfile::tempdir().unwrap();
    let path = keyed_registry(dir.path());

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], REGISTRY_HEADER);

    for (line, prefix) in lines[1..].iter().zip(["10.0.0.1;10001;", "10.0.0.2;10001;"]) {
        assert!(line.starts_with(prefix), "unexpected row: {line}");
        let fields: Vec<&str> = line.split(';').collect();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[2].len(), 64);
        assert_eq!(fields[3].len(), 64);
    }
}

#[test]
fn generate_peers_keys_never_prints_private_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("peers.csv");
    std::fs::write(&path, "h1;1\n").unwrap();

    let output = generate_peers_keys().arg(&path).output().unwrap();
    assert!(output.status.success());

    let text = std::fs::read_to_string(&path).unwrap();
    let row: Vec<&str> = text.lines().nth(1).unwrap().split(';').collect();
    assert!(stdout(&output).contains(row[3]));
    assert!(!stdout(&output).contains(row[2]));
}

#[test]
fn generate_peers_keys_reports_short_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("peers.csv");
    std::fs::write(&path, "h1;1\nh2\n").unwrap();

    let output = generate_peers_keys().arg(&path).output().unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("line 2"), "stderr: {}", stderr(&output));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "h1;1\nh2\n");
}

#[test]
fn genesis_tool_invalid_command_exits_successfully() {
    let dir = tempfile::tempdir().unwrap();
    let path = keyed_registry(dir.path());

    let output = genesis_tool().arg("frobnicate").arg(&path).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "Invalid command");
}

#[test]
fn genesis_tool_add_peers_writes_genesis_block() {
    let dir = tempfile::tempdir().unwrap();
    let registry = keyed_registry(dir.path());
    let genesis = dir.path().join("genesis.json");
    std::fs::write(
        &genesis,
        r#"{"payload":{"transactions":[{"payload":{"reducedPayload":{"commands":[
            {"addPeer":{"peer":{"address":"old:1","peerKey":"AAAA"}}},
            {"createRole":{"roleName":"admin"}}
        ]}}}]}}"#,
    )
    .unwrap();

    let output = genesis_tool()
        .current_dir(dir.path())
        .arg("add_iroha_peers")
        .arg(&registry)
        .arg(&genesis)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let written = std::fs::read_to_string(dir.path().join("genesis.block")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    let commands = value["payload"]["transactions"][0]["payload"]["reducedPayload"]["commands"]
        .as_array()
        .unwrap();
    assert_eq!(commands.len(), 3);
    assert_eq!(commands[0], serde_json::json!({"createRole": {"roleName": "admin"}}));
    assert_eq!(commands[1]["addPeer"]["peer"]["address"], "10.0.0.1:10001");
    assert_eq!(commands[2]["addPeer"]["peer"]["address"], "10.0.0.2:10001");
    assert!(!written.contains("old:1"));
}

#[test]
fn genesis_tool_add_peers_keeps_input_named_like_output() {
    let dir = tempfile::tempdir().unwrap();
    let registry = keyed_registry(dir.path());
    let original = r#"{"payload":{"transactions":[]}}"#;
    std::fs::write(dir.path().join("genesis.block"), original).unwrap();

    let output = genesis_tool()
        .current_dir(dir.path())
        .arg("add_iroha_peers")
        .arg(&registry)
        .arg("genesis.block")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("is the input genesis file"),
        "stderr: {}",
        stderr(&output)
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("genesis.block")).unwrap(),
        original
    );

    let output = genesis_tool()
        .current_dir(dir.path())
        .arg("add_iroha_peers")
        .arg(&registry)
        .arg("genesis.block")
        .arg("--output")
        .arg("genesis.new.block")
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(dir.path().join("genesis.new.block").exists());
}

#[test]
fn genesis_tool_add_peers_requires_genesis_path() {
    let dir = tempfile::tempdir().unwrap();
    let registry = keyed_registry(dir.path());

    let output = genesis_tool()
        .current_dir(dir.path())
        .arg("add_iroha_peers")
        .arg(&registry)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("genesis block path"));
    assert!(!dir.path().join("genesis.block").exists());
}

#[test]
fn genesis_tool_make_and_verify_key_files() {
    let dir = tempfile::tempdir().unwrap();
    let registry = keyed_registry(dir.path());

    let output = genesis_tool()
        .current_dir(dir.path())
        .arg("make_key_files")
        .arg(&registry)
        .arg("ignored-genesis.json")
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = std::fs::read_to_string(&registry).unwrap();
    for (index, row) in text.lines().skip(1).enumerate() {
        let fields: Vec<&str> = row.split(';').collect();
        let private_path = dir.path().join(format!("node{index}.priv"));
        let public_path = dir.path().join(format!("node{index}.pub"));
        assert_eq!(std::fs::read_to_string(private_path).unwrap(), fields[2]);
        assert_eq!(std::fs::read_to_string(public_path).unwrap(), fields[3]);
    }

    let verify = genesis_tool()
        .current_dir(dir.path())
        .arg("verify_key_files")
        .arg(&registry)
        .output()
        .unwrap();
    assert!(verify.status.success(), "stdout: {}", stdout(&verify));

    std::fs::copy(dir.path().join("node1.pub"), dir.path().join("node0.pub")).unwrap();
    let verify = genesis_tool()
        .current_dir(dir.path())
        .arg("verify_key_files")
        .arg(&registry)
        .output()
        .unwrap();
    assert!(!verify.status.success());
    assert!(stdout(&verify).contains("node1  10.0.0.2:10001  ok"));
}
