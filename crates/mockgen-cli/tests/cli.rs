use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{Value, json};
use uuid::Uuid;

struct TempDir(PathBuf);

impl TempDir {
    fn new(label: &str) -> Self {
        let path = std::env::temp_dir().join(format!("mockgen_cli_{label}_{}", Uuid::new_v4()));
        fs::create_dir_all(&path).expect("create temp dir");
        Self(path)
    }

    fn path(&self) -> &Path {
        &self.0
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.0.join(name);
        fs::write(&path, contents).expect("write temp file");
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn mockgen(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mockgen"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("run mockgen")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf8 stdout")
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).expect("utf8 stderr")
}

const PEOPLE_SCHEMA: &str = r#"{
    "id": {"type": "uuid"},
    "name": {"type": "string", "generator": "name"},
    "age": {"type": "integer", "min_value": 18, "max_value": 99},
    "status": {"type": "choice", "options": ["active", "suspended", "deleted"]}
}"#;

#[test]
fn seeded_json_output_is_reproducible() {
    let dir = TempDir::new("seeded");
    dir.write("schema.json", PEOPLE_SCHEMA);
    let args = ["generate", "--schema", "schema.json", "--count", "4", "--seed", "12345"];

    let first = mockgen(&dir, &args);
    let second = mockgen(&dir, &args);

    assert!(first.status.success(), "stderr: {}", stderr(&first));
    assert_eq!(stdout(&first), stdout(&second));

    let records: Value = serde_json::from_str(&stdout(&first)).expect("json output");
    assert_eq!(records.as_array().expect("array").len(), 4);
}

#[test]
fn non_positive_count_writes_nothing() {
    let dir = TempDir::new("empty");
    dir.write("schema.json", PEOPLE_SCHEMA);

    for count in ["0", "-3"] {
        let output = mockgen(&dir, &["generate", "--schema", "schema.json", "--count", count]);
        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(output.stdout.is_empty());
    }
}

#[test]
fn sql_output_goes_to_nested_file() {
    let dir = TempDir::new("sql");
    dir.write("schema.json", r#"{"name": {"type": "choice", "options": ["O'Reilly"]}}"#);

    let output = mockgen(
        &dir,
        &[
            "generate",
            "--schema",
            "schema.json",
            "--format",
            "sql",
            "--table-name",
            "users",
            "--out",
            "out/nested/users.sql",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(output.stdout.is_empty());

    let written =
        fs::read_to_string(dir.path().join("out/nested/users.sql")).expect("read sql output");
    assert_eq!(written, "INSERT INTO users (name) VALUES ('O''Reilly');\n");
}

#[test]
fn missing_schema_fails_with_diagnostic() {
    let dir = TempDir::new("missing");
    let output = mockgen(&dir, &["generate", "--schema", "nope.json"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("mockgen: schema not found"));
}

#[test]
fn malformed_schema_fails() {
    let dir = TempDir::new("malformed");
    dir.write("schema.json", "{ nope");
    let output = mockgen(&dir, &["generate", "--schema", "schema.json"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("malformed schema document"));
}

#[test]
fn unsupported_kind_is_null_unless_strict() {
    let dir = TempDir::new("strict");
    dir.write(
        "schema.json",
        r#"{"id": {"type": "uuid"}, "blob": {"type": "blob"}}"#,
    );

    let lenient = mockgen(&dir, &["generate", "--schema", "schema.json", "--format", "ndjson"]);
    assert!(lenient.status.success(), "stderr: {}", stderr(&lenient));
    let record: Value = serde_json::from_str(stdout(&lenient).trim()).expect("ndjson line");
    assert_eq!(record["blob"], Value::Null);

    let strict = mockgen(&dir, &["generate", "--schema", "schema.json", "--strict"]);
    assert_eq!(strict.status.code(), Some(1));
    assert!(strict.stdout.is_empty());
    assert!(stderr(&strict).contains("mockgen:"));
}

#[test]
fn config_file_sets_format_and_flags_override_it() {
    let dir = TempDir::new("config");
    dir.write("schema.json", r#"{"n": {"type": "integer", "min_value": 1, "max_value": 1}}"#);
    dir.write("mockgen.toml", "[export]\nformat = \"csv\"\n");

    let from_file = mockgen(&dir, &["generate", "--schema", "schema.json", "--count", "2"]);
    assert!(from_file.status.success(), "stderr: {}", stderr(&from_file));
    assert_eq!(stdout(&from_file), "n\n1\n1\n");

    let flagged = mockgen(
        &dir,
        &["generate", "--schema", "schema.json", "--count", "1", "--format", "ndjson"],
    );
    assert_eq!(stdout(&flagged), "{\"n\":1}\n");
}

#[test]
fn report_and_check_are_written() {
    let dir = TempDir::new("report");
    dir.write("schema.json", PEOPLE_SCHEMA);

    let output = mockgen(
        &dir,
        &[
            "generate",
            "--schema",
            "schema.json",
            "--count",
            "30",
            "--seed",
            "9",
            "--check",
            "--report",
            "reports/run.json",
            "--out",
            "people.json",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("reports/run.json")).expect("read report"),
    )
    .expect("parse report");
    assert_eq!(report["records_generated"], 30);
    assert_eq!(report["seed"], 9);
    assert_eq!(report["kind_usage"]["uuid"], 30);
}

#[test]
fn json_logs_are_appended_to_file() {
    let dir = TempDir::new("logs");
    dir.write("schema.json", PEOPLE_SCHEMA);

    let output = mockgen(
        &dir,
        &["generate", "--schema", "schema.json", "--log-json", "logs/run.jsonl"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let logs = fs::read_to_string(dir.path().join("logs/run.jsonl")).expect("read logs");
    let events: Vec<Value> = logs
        .lines()
        .map(|line| serde_json::from_str(line).expect("json log line"))
        .collect();
    assert!(events.iter().any(|event| event["fields"]["message"] == "generation started"));
    assert!(events.iter().all(|event| event["timestamp"].is_string()));
}

#[test]
fn validate_reports_field_count() {
    let dir = TempDir::new("validate");
    dir.write("schema.json", PEOPLE_SCHEMA);

    let output = mockgen(&dir, &["validate", "--schema", "schema.json", "--strict"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("valid schema with 4 field(s)"));
}

#[test]
fn strict_validate_rejects_bad_keywords() {
    let dir = TempDir::new("validate_bad");
    dir.write("schema.json", r#"{"tags": {"type": "array", "max_items": "many"}}"#);

    let basic = mockgen(&dir, &["validate", "--schema", "schema.json"]);
    assert!(basic.status.success(), "stderr: {}", stderr(&basic));

    let strict = mockgen(&dir, &["validate", "--schema", "schema.json", "--strict"]);
    assert_eq!(strict.status.code(), Some(1));
    assert!(stderr(&strict).contains("meta-validation"));
}

#[test]
fn strict_generation_honours_max_depth() {
    let dir = TempDir::new("depth");
    let mut descriptor = json!({"type": "integer", "min_value": 7, "max_value": 7});
    for _ in 0..40 {
        descriptor = json!({"type": "object", "fields": {"next": descriptor}});
    }
    dir.write("schema.json", &json!({ "root": descriptor }).to_string());

    let shallow = mockgen(&dir, &["generate", "--schema", "schema.json", "--strict"]);
    assert_eq!(shallow.status.code(), Some(1));
    assert!(stderr(&shallow).contains("maximum nesting depth of 32"));

    let deep = mockgen(
        &dir,
        &["generate", "--schema", "schema.json", "--strict", "--max-depth", "64"],
    );
    assert!(deep.status.success(), "stderr: {}", stderr(&deep));
    let records: Value = serde_json::from_str(&stdout(&deep)).expect("json output");
    let mut value = &records[0]["root"];
    for _ in 0..40 {
        value = &value["next"];
    }
    assert_eq!(value, &json!(7));

    let validated = mockgen(
        &dir,
        &["validate", "--schema", "schema.json", "--strict", "--max-depth", "64"],
    );
    assert!(validated.status.success(), "stderr: {}", stderr(&validated));
}
