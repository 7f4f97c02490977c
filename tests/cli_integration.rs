// CLI integration tests for the `jsonq` binary.
use std::io::Write;
use std::process::{Command, Output, Stdio};

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_jsonq");
    let mut command = Command::new(exe);
    command.env_remove("RUST_LOG");
    command
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = cmd()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("output")
}

fn parse_json(output: &[u8]) -> Value {
    let text = std::str::from_utf8(output).expect("utf8");
    serde_json::from_str(text.trim()).expect("valid json")
}

const DOC: &str = r#"{"a":{"b":[1,2,3]},"name":"ada","n":null,"mixed":[1,"x",3]}"#;

#[test]
fn get_resolves_string_path_from_stdin() {
    let out = run_with_stdin(&["--color", "never", "get", "a.b[1]"], DOC);
    assert!(out.status.success());
    assert_eq!(parse_json(&out.stdout), Value::from(2));
}

#[test]
fn get_reads_file_and_coerces() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("doc.json");
    std::fs::write(&path, DOC).expect("write doc");

    let out = cmd()
        .args(["get", "--file", path.to_str().unwrap(), "--as", "floats", "a.b"])
        .output()
        .expect("get");
    assert!(out.status.success());
    assert_eq!(parse_json(&out.stdout), serde_json::json!([1.0, 2.0, 3.0]));
}

#[test]
fn segments_are_taken_verbatim() {
    let doc = r#"{"k.with.dots":{"0":"zero"}}"#;
    let out = run_with_stdin(&["get", "--compact", "k.with.dots"], doc);
    assert_eq!(out.status.code().unwrap(), 3);

    let out = run_with_stdin(&["get", "--segments", "k.with.dots"], doc);
    assert!(out.status.success());
    assert_eq!(parse_json(&out.stdout)["0"], "zero");
}

#[test]
fn resolution_error_is_json_on_stderr() {
    let out = run_with_stdin(&["get", "a.b[5]"], DOC);
    assert_eq!(out.status.code().unwrap(), 3);
    let err = parse_json(&out.stderr);
    assert_eq!(err["error"]["kind"], "IndexOutOfBounds");
    assert_eq!(err["error"]["segment"], "5");
    assert!(
        err["error"]["message"]
            .as_str()
            .unwrap()
            .contains("out of bounds")
    );
}

#[test]
fn type_mismatch_exit_code_and_element_index() {
    let out = run_with_stdin(&["get", "--as", "ints", "mixed"], DOC);
    assert_eq!(out.status.code().unwrap(), 4);
    let err = parse_json(&out.stderr);
    assert_eq!(err["error"]["kind"], "TypeMismatch");
    assert_eq!(err["error"]["index"], 1);
}

#[test]
fn or_zero_prints_zero_value() {
    let out = run_with_stdin(&["get", "--as", "int", "--or-zero", "n"], DOC);
    assert!(out.status.success());
    assert_eq!(parse_json(&out.stdout), Value::from(0));

    let out = run_with_stdin(&["get", "--as", "strings", "--or-zero", "missing"], DOC);
    assert!(out.status.success());
    assert_eq!(parse_json(&out.stdout), serde_json::json!([]));
}

#[test]
fn or_zero_typed_array_prints_prefix_before_bad_element() {
    let out = run_with_stdin(&["get", "--as", "ints", "--or-zero", "mixed"], DOC);
    assert!(out.status.success());
    assert_eq!(parse_json(&out.stdout), serde_json::json!([1]));
}

#[test]
fn exists_reports_and_sets_exit_code() {
    let out = run_with_stdin(&["exists", "name"], DOC);
    assert!(out.status.success());
    assert_eq!(parse_json(&out.stdout), Value::Bool(true));

    let out = run_with_stdin(&["exists", "n"], DOC);
    assert_eq!(out.status.code().unwrap(), 3);
    assert_eq!(parse_json(&out.stdout), Value::Bool(false));

    let out = run_with_stdin(&["exists", "a.b[9]"], DOC);
    assert_eq!(out.status.code().unwrap(), 3);
    assert_eq!(parse_json(&out.stdout), Value::Bool(false));
}

#[test]
fn non_object_root_needs_any_root() {
    let out = run_with_stdin(&["get", "[0]"], "[10, 20]");
    assert_eq!(out.status.code().unwrap(), 5);
    assert_eq!(parse_json(&out.stderr)["error"]["kind"], "Decode");

    let out = run_with_stdin(&["get", "--any-root", "[1]"], "[10, 20]");
    assert!(out.status.success());
    assert_eq!(parse_json(&out.stdout), Value::from(20));
}

#[test]
fn usage_exit_code() {
    let out = cmd().args(["get", "--as", "nope", "a"]).output().expect("get");
    assert_eq!(out.status.code().unwrap(), 2);
}
