//! E2E tests for `sccpath analyze`.
//!
//! Each test writes graph documents into an isolated temp directory and runs
//! the `sccpath` binary there, with user config redirected into the same
//! directory.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

fn sccpath_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sccpath").expect("sccpath binary must exist");
    cmd.current_dir(dir);
    cmd.env("SCCPATH_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.join("config"));
    cmd.env_remove("FORMAT");
    cmd.env_remove("SCCPATH_TIMING");
    cmd
}

fn write_doc(dir: &Path, name: &str, doc: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(doc).expect("serialize"))
        .expect("write document");
    path
}

fn scenario_a(dir: &Path) -> PathBuf {
    write_doc(
        dir,
        "scenario_a.json",
        &serde_json::json!({
            "directed": true,
            "n": 6,
            "edges": [
                {"u": 0, "v": 1, "w": 3},
                {"u": 0, "v": 3, "w": 2},
                {"u": 1, "v": 2, "w": 4},
                {"u": 2, "v": 5, "w": 1},
                {"u": 3, "v": 4, "w": 2},
                {"u": 4, "v": 5, "w": 3}
            ],
            "source": 0,
            "weight_model": "edge"
        }),
    )
}

fn ring(dir: &Path) -> PathBuf {
    write_doc(
        dir,
        "ring.json",
        &serde_json::json!({
            "directed": true,
            "n": 4,
            "edges": [
                {"u": 0, "v": 1}, {"u": 1, "v": 2}, {"u": 2, "v": 3}, {"u": 3, "v": 0}
            ]
        }),
    )
}

fn analyze_json(dir: &Path, file: &Path, extra: &[&str]) -> Value {
    let output = sccpath_cmd(dir)
        .arg("analyze")
        .arg(file)
        .args(extra)
        .args(["--format", "json"])
        .output()
        .expect("analyze should not crash");
    assert!(
        output.status.success(),
        "analyze failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("analyze --format json should produce JSON")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn dag_report_has_paths_and_critical_path() {
    let dir = TempDir::new().expect("temp dir");
    let file = scenario_a(dir.path());
    let json = analyze_json(dir.path(), &file, &[]);

    assert_eq!(json["graph"]["vertices"], 6);
    assert_eq!(json["graph"]["edges"], 6);
    assert_eq!(json["components"].as_array().map(Vec::len), Some(6));
    assert_eq!(json["topo_valid"], true);
    assert_eq!(json["topo_order"].as_array().map(Vec::len), Some(6));

    let mut shortest: Vec<i64> = json["paths"]["shortest"]["distances"]
        .as_array()
        .expect("distances array")
        .iter()
        .map(|d| d.as_i64().expect("every vertex reachable"))
        .collect();
    shortest.sort_unstable();
    assert_eq!(shortest, vec![0, 2, 3, 4, 7, 7]);

    assert_eq!(json["paths"]["critical"]["length"], 8);
    assert_eq!(json["paths"]["critical"]["path"].as_array().map(Vec::len), Some(4));
    assert!(json["metrics"]["scc"]["counters"]["dfs_visits"].is_u64());
}

#[test]
fn ring_collapses_to_one_component() {
    let dir = TempDir::new().expect("temp dir");
    let file = ring(dir.path());
    let json = analyze_json(dir.path(), &file, &[]);

    let components = json["components"].as_array().expect("components");
    assert_eq!(components.len(), 1);
    assert_eq!(components[0]["size"], 4);
    assert_eq!(components[0]["cyclic"], true);
    assert_eq!(json["condensation"]["n"], 1);
    assert_eq!(json["topo_order"], serde_json::json!([0]));
    assert_eq!(json["paths"]["critical"]["length"], 0);
}

#[test]
fn pretty_output_walks_every_step() {
    let dir = TempDir::new().expect("temp dir");
    let file = scenario_a(dir.path());

    sccpath_cmd(dir.path())
        .arg("analyze")
        .arg(&file)
        .args(["--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("STEP 1: STRONGLY CONNECTED COMPONENTS"))
        .stdout(predicate::str::contains("STEP 2: TOPOLOGICAL SORT"))
        .stdout(predicate::str::contains("STEP 3: DAG SHORTEST & LONGEST PATHS"))
        .stdout(predicate::str::contains("Critical path:"))
        .stdout(predicate::str::contains("ANALYSIS COMPLETE"));
}

#[test]
fn unreachable_vertices_are_labelled_in_text_mode() {
    let dir = TempDir::new().expect("temp dir");
    let file = write_doc(
        dir.path(),
        "split.json",
        &serde_json::json!({
            "directed": true,
            "n": 3,
            "edges": [{"u": 0, "v": 1, "w": 5}]
        }),
    );

    sccpath_cmd(dir.path())
        .arg("analyze")
        .arg(&file)
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scc_count=3"))
        .stdout(predicate::str::contains(":unreachable"));
}

#[test]
fn format_env_selects_json() {
    let dir = TempDir::new().expect("temp dir");
    let file = ring(dir.path());

    let output = sccpath_cmd(dir.path())
        .env("FORMAT", "json")
        .arg("analyze")
        .arg(&file)
        .output()
        .expect("run");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(json["graph"]["vertices"], 4);
}

#[test]
fn project_config_selects_output_format() {
    let dir = TempDir::new().expect("temp dir");
    let file = ring(dir.path());
    std::fs::write(dir.path().join("sccpath.toml"), "[output]\nformat = \"json\"\n")
        .expect("write config");

    let output = sccpath_cmd(dir.path())
        .arg("analyze")
        .arg(&file)
        .output()
        .expect("run");
    assert!(output.status.success());
    serde_json::from_slice::<Value>(&output.stdout).expect("config format json");
}

#[test]
fn missing_file_fails_with_read_code() {
    let dir = TempDir::new().expect("temp dir");

    sccpath_cmd(dir.path())
        .args(["analyze", "nope.json", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1002"))
        .stderr(predicate::str::contains("nope.json"));
}

#[test]
fn malformed_document_fails_with_parse_code() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("bad.json"), "{\"n\": 3").expect("write");

    sccpath_cmd(dir.path())
        .args(["analyze", "bad.json", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1003"));
}

#[test]
fn out_of_range_edge_reports_json_error() {
    let dir = TempDir::new().expect("temp dir");
    let file = write_doc(
        dir.path(),
        "bad_edge.json",
        &serde_json::json!({
            "directed": true,
            "n": 2,
            "edges": [{"u": 0, "v": 5}]
        }),
    );

    let output = sccpath_cmd(dir.path())
        .arg("analyze")
        .arg(&file)
        .args(["--format", "json"])
        .output()
        .expect("run");
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stderr).expect("json error on stderr");
    assert_eq!(json["error"]["error_code"], "E2001");
}

#[test]
fn unknown_weight_model_reports_its_own_code() {
    let dir = TempDir::new().expect("temp dir");
    let file = write_doc(
        dir.path(),
        "vertex_weights.json",
        &serde_json::json!({
            "directed": true,
            "n": 2,
            "edges": [{"u": 0, "v": 1}],
            "weight_model": "vertex"
        }),
    );

    sccpath_cmd(dir.path())
        .arg("analyze")
        .arg(&file)
        .args(["--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E2002]"))
        .stderr(predicate::str::contains("Use `edge` or `node`"));
}

#[test]
fn upper_case_weight_model_is_accepted() {
    let dir = TempDir::new().expect("temp dir");
    let file = write_doc(
        dir.path(),
        "node_weights.json",
        &serde_json::json!({
            "directed": true,
            "n": 2,
            "edges": [{"u": 0, "v": 1}],
            "weight_model": "NODE"
        }),
    );
    let json = analyze_json(dir.path(), &file, &[]);

    assert_eq!(json["graph"]["weight_model"], "node");
    assert_eq!(json["condensation"]["weight_model"], "node");
}

#[test]
fn out_of_range_source_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let file = scenario_a(dir.path());

    sccpath_cmd(dir.path())
        .arg("analyze")
        .arg(&file)
        .args(["--source", "99", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2001"));
}

#[test]
fn timing_report_goes_to_stderr() {
    let dir = TempDir::new().expect("temp dir");
    let file = ring(dir.path());

    sccpath_cmd(dir.path())
        .arg("analyze")
        .arg(&file)
        .args(["--format", "text", "--timing"])
        .assert()
        .success()
        .stderr(predicate::str::contains("timing report:"))
        .stderr(predicate::str::contains("cmd.analyze"))
        .stdout(predicate::str::contains("timing").not());
}
