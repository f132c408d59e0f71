use assert_cmd::Command;
use chatweave_testing::fixtures::sample_path;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

/// Command isolated from the user's config and RUST_LOG
#[allow(deprecated)]
fn chatweave(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("chatweave").unwrap();
    cmd.env("CHATWEAVE_CONFIG", home.path().join("config.toml"))
        .env_remove("RUST_LOG");
    cmd
}

fn sample(name: &str) -> String {
    sample_path(name).display().to_string()
}

fn json_stdout(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("stdout should be JSON")
}

#[test]
fn merge_outputs_json_history() {
    let home = TempDir::new().unwrap();
    let output = chatweave(&home)
        .args(["merge", &sample("sillytavern_a.jsonl"), &sample("sillytavern_b.jsonl")])
        .output()
        .unwrap();
    assert!(output.status.success());

    let result = json_stdout(&output.stdout);
    let history = result["history"].as_array().unwrap();
    assert_eq!(history.len(), 6);
    assert_eq!(history[0]["branchId"], "main");
    assert_eq!(history[1]["variantInfo"]["total"], 3);
    assert_eq!(history[5]["content"], "Actually, Lisbon");
    assert_eq!(history[5]["branchId"], "branch_3");
    assert_eq!(result["metadata"]["totalFiles"], 2);
    assert_eq!(result["metadata"]["mainFile"], "sillytavern_a.jsonl");
}

#[test]
fn merge_renders_timeline() {
    let home = TempDir::new().unwrap();
    chatweave(&home)
        .args([
            "merge",
            &sample("sillytavern_a.jsonl"),
            &sample("sillytavern_b.jsonl"),
            "--output",
            "timeline",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("* Aria: Rome? [variant 2/3, selected]"))
        .stdout(predicate::str::contains("You: Actually, Lisbon"))
        .stdout(predicate::str::contains("6 message(s)"));
}

#[test]
fn merge_expands_directories() {
    let home = TempDir::new().unwrap();
    let inputs = TempDir::new().unwrap();
    for name in ["sillytavern_b.jsonl", "sillytavern_a.jsonl"] {
        std::fs::copy(sample_path(name), inputs.path().join(name)).unwrap();
    }

    let output = chatweave(&home)
        .args(["merge", &inputs.path().display().to_string()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let result = json_stdout(&output.stdout);
    assert_eq!(result["metadata"]["mainFile"], "sillytavern_a.jsonl");
    assert_eq!(result["history"].as_array().unwrap().len(), 6);
}

#[test]
fn merge_versioned_export() {
    let home = TempDir::new().unwrap();
    let output = chatweave(&home)
        .args(["merge", &sample("gemini_versions.json"), "--pretty"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("\n  \"history\""));

    let result = json_stdout(&output.stdout);
    let history = result["history"].as_array().unwrap();
    assert_eq!(history.len(), 5);
    assert_eq!(history[2]["branchId"], "branch_t0_h0_v1");
    assert_eq!(history[0]["isBranchPoint"], true);
    assert_eq!(result["metadata"]["isSingleFile"], true);
}

#[test]
fn self_describing_exports_are_not_merged_together() {
    let home = TempDir::new().unwrap();
    chatweave(&home)
        .args(["merge", &sample("gemini_versions.json"), &sample("plain.json")])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn forced_format_mismatch_fails() {
    let home = TempDir::new().unwrap();
    chatweave(&home)
        .args(["merge", &sample("sillytavern_a.jsonl"), "--format", "gemini"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("as gemini"));
}

#[test]
fn missing_input_fails() {
    let home = TempDir::new().unwrap();
    chatweave(&home)
        .args(["merge", "/nonexistent/chat.jsonl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No such file or directory"));
}

#[test]
fn roots_lists_true_roots() {
    let home = TempDir::new().unwrap();
    chatweave(&home)
        .args(["roots", &sample("sillytavern_a.jsonl"), &sample("sillytavern_b.jsonl")])
        .assert()
        .success()
        .stdout(predicate::str::contains("nodes: 4"))
        .stdout(predicate::str::contains("roots: 1"))
        .stdout(predicate::str::contains(
            "human: Plan a trip (sillytavern_a.jsonl, sillytavern_b.jsonl)",
        ));
}

#[test]
fn roots_rejects_self_describing_exports() {
    let home = TempDir::new().unwrap();
    chatweave(&home)
        .args(["roots", &sample("gemini_versions.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("graph-fed"));
}

#[test]
fn providers_lists_formats() {
    let home = TempDir::new().unwrap();
    chatweave(&home)
        .arg("providers")
        .assert()
        .success()
        .stdout(predicate::str::contains("sillytavern"))
        .stdout(predicate::str::contains("gemini"))
        .stdout(predicate::str::contains("plain"));
}

#[test]
fn providers_table() {
    let home = TempDir::new().unwrap();
    let output = chatweave(&home).arg("providers").output().unwrap();
    assert!(output.status.success());

    let table = String::from_utf8(output.stdout).unwrap();
    insta::assert_snapshot!(table.trim_end(), @r"
    FORMAT        MERGE            FILES     DESCRIPTION
    --------------------------------------------------------------------------------
    sillytavern   graph            *.jsonl   SillyTavern-style JSONL chat export
    gemini        self-describing  *.json    Gemini multi-version conversation export
    plain         self-describing  *.json    JSON array of pre-tagged messages
    ");
}

#[test]
fn config_file_sets_defaults() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("custom.toml");
    std::fs::write(&config, "output = \"timeline\"\n").unwrap();

    chatweave(&home)
        .args(["--config", &config.display().to_string()])
        .args(["merge", &sample("plain.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 message(s)"));
}

#[test]
fn config_from_environment_is_used() {
    let home = TempDir::new().unwrap();
    write_config(&home.path().join("config.toml"), "output = \"timeline\"\n");

    chatweave(&home)
        .args(["merge", &sample("plain.json"), "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"));

    chatweave(&home)
        .args(["merge", &sample("plain.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 message(s)"));
}

#[test]
fn explicit_missing_config_fails() {
    let home = TempDir::new().unwrap();
    chatweave(&home)
        .args(["--config", "/nonexistent/chatweave.toml", "providers"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

fn write_config(path: &Path, content: &str) {
    std::fs::write(path, content).unwrap();
}
