use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fanout() -> Command {
    Command::cargo_bin("fanout").unwrap()
}

fn write_config(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

const VALID: &str = r#"
endpoints:
  - name: health
    method: GET
    path: /health
    port: 8645
targets:
  - name: store
    selector: app=store
requests:
  - name: ping
    endpoint: health
    retries: 1
actions:
  - name: poke-store
    targets: [store]
    requests: [ping]
    loop_order: pods_outer
"#;

// ---------------------------------------------------------------------------
// fanout check
// ---------------------------------------------------------------------------

#[test]
fn check_valid_config_succeeds() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "config.yaml", VALID);

    fanout()
        .args(["--config", path.to_str().unwrap(), "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config OK"))
        .stdout(predicate::str::contains("poke-store"));
}

#[test]
fn check_json_output_parses() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "config.yaml", VALID);

    let output = fanout()
        .args(["--config", path.to_str().unwrap(), "--json", "check"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let summary: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(summary["endpoints"][0], "health");
    assert_eq!(summary["actions"][0], "poke-store");
}

#[test]
fn check_merges_multiple_config_files() {
    let dir = TempDir::new().unwrap();
    let base = write_config(&dir, "base.yaml", VALID);
    let extra = write_config(
        &dir,
        "extra.yaml",
        "actions:\n  - name: second\n    targets: [store]\n    requests: [ping]\n    loop_order: requests_outer\n",
    );

    fanout()
        .args([
            "--config",
            base.to_str().unwrap(),
            "--config",
            extra.to_str().unwrap(),
            "check",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("second"));
}

#[test]
fn check_unknown_reference_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "config.yaml",
        "requests:\n  - name: ping\n    endpoint: nope\n",
    );

    fanout()
        .args(["--config", path.to_str().unwrap(), "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn check_duplicate_name_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "config.yaml",
        "targets:\n  - name: store\n  - name: store\n",
    );

    fanout()
        .args(["--config", path.to_str().unwrap(), "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate"));
}

#[test]
fn check_without_config_fails() {
    fanout()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--config"));
}

#[test]
fn check_nonexistent_file_fails() {
    fanout()
        .args(["--config", "/does/not/exist.yaml", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

// ---------------------------------------------------------------------------
// argument parsing
// ---------------------------------------------------------------------------

#[test]
fn batch_without_config_fails() {
    fanout()
        .arg("batch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--config"));
}

#[test]
fn serve_rejects_invalid_port() {
    fanout()
        .args(["serve", "--port", "notaport"])
        .assert()
        .failure();
}

#[test]
fn help_lists_subcommands() {
    fanout()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check"));
}
