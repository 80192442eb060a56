use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use composer_core::PrimitiveRegistry;
use composer_graph::{canonical_hash, graph_from_json, Outcome};
use serde_json::Value;
use tempfile::tempdir;

const LIBRARY: &str = "\
primitives:
  - name: add
    inputs:
      - { name: x, type: int }
      - { name: y, type: int }
    outputs: [int]
";

const JOB: &str = "\
request:
  inputs: [int, int, int]
  outputs: [int]
  max_depth: 2
search:
  branch_probability: 0.0
registry: lib.yaml
seed: 7
";

fn composer(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_composer"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("run composer")
}

fn write_job(dir: &Path, job: &str) -> String {
    fs::write(dir.join("lib.yaml"), LIBRARY).expect("write library");
    let path = dir.join("job.yaml");
    fs::write(&path, job).expect("write job");
    path.to_string_lossy().into_owned()
}

#[test]
fn compose_prints_a_valid_graph() {
    let dir = tempdir().expect("tempdir");
    let job = write_job(dir.path(), JOB);

    let first = composer(&["compose", "--job", &job]);
    assert!(first.status.success(), "{}", String::from_utf8_lossy(&first.stderr));
    let body = String::from_utf8(first.stdout).expect("utf8");
    let graph = graph_from_json(&body).expect("graph");
    assert_eq!(graph.outcome, Outcome::Done);
    assert_eq!(graph.len(), 2);

    let second = composer(&["compose", "--job", &job]);
    assert_eq!(String::from_utf8(second.stdout).expect("utf8"), body);
}

#[test]
fn verify_and_listing_read_written_graphs() {
    let dir = tempdir().expect("tempdir");
    let job = write_job(dir.path(), JOB);
    let graph_path = dir.path().join("out").join("graph.json");
    let graph_arg = graph_path.to_string_lossy().into_owned();

    let compose = composer(&["compose", "--job", &job, "--seed", "3", "--out", &graph_arg]);
    assert!(compose.status.success());
    assert!(compose.stdout.is_empty());

    let graph = graph_from_json(&fs::read_to_string(&graph_path).expect("read graph")).expect("graph");
    let verify = composer(&["verify", "--graph", &graph_arg]);
    assert!(verify.status.success());
    assert_eq!(
        String::from_utf8(verify.stdout).expect("utf8").trim(),
        canonical_hash(&graph).expect("hash")
    );

    let listing = composer(&["listing", "--graph", &graph_arg]);
    assert!(listing.status.success());
    let text = String::from_utf8(listing.stdout).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], ">INPUT ($int0: int, $int1: int, $int2: int)");
    assert!(lines[1].starts_with("!v0 = add("));
    assert!(lines[2].starts_with("!v1 = add(x: int = !v0"));
    assert_eq!(lines[3], ">RETURN (!v1)");
}

#[test]
fn verify_rejects_tampered_graphs() {
    let dir = tempdir().expect("tempdir");
    let job = write_job(dir.path(), JOB);
    let graph_path = dir.path().join("graph.json");
    let graph_arg = graph_path.to_string_lossy().into_owned();
    assert!(composer(&["compose", "--job", &job, "--out", &graph_arg]).status.success());

    let mut value: Value = serde_json::from_str(&fs::read_to_string(&graph_path).expect("read"))
        .expect("json");
    value["outputs_hit"] = Value::from(0);
    fs::write(&graph_path, value.to_string()).expect("write");
    assert!(!composer(&["verify", "--graph", &graph_arg]).status.success());
}

#[test]
fn batch_writes_graphs_and_summary() {
    let dir = tempdir().expect("tempdir");
    let job = write_job(dir.path(), JOB);
    let out = dir.path().join("batch");
    let out_arg = out.to_string_lossy().into_owned();

    let batch = composer(&["batch", "--job", &job, "--count", "5", "--out", &out_arg]);
    assert!(batch.status.success(), "{}", String::from_utf8_lossy(&batch.stderr));
    let summary: Value =
        serde_json::from_str(&fs::read_to_string(out.join("summary.json")).expect("summary")).expect("json");
    assert_eq!(summary["requested"], 5);
    assert_eq!(summary["done"], 5);
    assert_eq!(summary["failed"], 0);
    assert_eq!(summary["provenance"]["seed"], 7);
    for index in 0..5 {
        assert!(out.join(format!("graph_{index}.json")).exists());
    }
}

#[test]
fn invalid_request_fails() {
    let dir = tempdir().expect("tempdir");
    let job = write_job(dir.path(), &JOB.replace("max_depth: 2", "max_depth: 0"));
    let output = composer(&["compose", "--job", &job]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("non-positive-max-depth"));
}

#[test]
fn catalog_prints_the_reference_library() {
    let output = composer(&["catalog", "--format", "json"]);
    assert!(output.status.success());
    let registry =
        PrimitiveRegistry::from_json_str(&String::from_utf8(output.stdout).expect("utf8")).expect("registry");
    assert_eq!(registry.len(), 21);
    assert!(registry.by_name("str_repeat").is_some());

    let yaml = composer(&["catalog"]);
    let registry = PrimitiveRegistry::from_yaml_str(&String::from_utf8(yaml.stdout).expect("utf8"))
        .expect("registry");
    assert_eq!(registry.len(), 21);
}
