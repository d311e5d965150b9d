#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::io::Write;
use tempfile::NamedTempFile;

const PAYLOAD: &str = r#"{"projectStartDate": "2024-01-01",
    "siteEstablishment": {"enabled": true, "perimeterType": "Hoarding"},
    "excavation": {"enabled": true, "soilType": "Rock", "volume": 1000}}"#;

#[allow(deprecated)]
fn cli() -> Command {
    Command::cargo_bin("cli").expect("cli binary")
}

fn write_temp(contents: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("create temp file");
    tmp.write_all(contents.as_bytes()).unwrap();
    tmp
}

#[test]
fn generate_prints_json_schedule() {
    let assert = cli().args(["generate", PAYLOAD]).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let tasks: serde_json::Value = serde_json::from_str(&stdout).expect("json output");
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0]["task_id"], "SE.01");
    assert_eq!(tasks[0]["start_date"], "Mon 01.01.24");
    assert_eq!(tasks[2]["duration"], 33);
}

#[test]
fn generate_reads_payload_file_and_writes_csv() {
    let input = write_temp(PAYLOAD);
    let output = NamedTempFile::new().unwrap();
    cli()
        .arg("generate")
        .arg("--input")
        .arg(input.path())
        .args(["--format", "csv", "--output"])
        .arg(output.path())
        .assert()
        .success();

    let text = std::fs::read_to_string(output.path()).unwrap();
    assert!(text.starts_with("task_id,object_description"));
    assert!(text.contains("EX.01,Excavation - Rock"));
}

#[test]
fn generate_renders_table_and_summary() {
    cli()
        .args(["generate", PAYLOAD, "--format", "table", "--summary"])
        .assert()
        .success()
        .stdout(str_contains("Perimeter Setup - Hoarding"))
        .stderr(str_contains("tasks=3"));
}

#[test]
fn missing_parameters_fail() {
    cli()
        .arg("generate")
        .assert()
        .failure()
        .stderr(str_contains("Error: No parameters provided"));
}

#[test]
fn malformed_json_fails() {
    cli()
        .args(["generate", "{not json"])
        .assert()
        .failure()
        .stderr(str_contains("Error: invalid JSON parameters"));
}

#[test]
fn invalid_start_date_fails_without_output() {
    cli()
        .args(["generate", r#"{"projectStartDate": "2024/01/01"}"#])
        .assert()
        .failure()
        .stdout("")
        .stderr(str_contains("Error: invalid date format '2024/01/01'"));
}

#[test]
fn out_of_range_volume_fails_cleanly() {
    cli()
        .args(["generate", r#"{"excavation": {"enabled": true, "volume": 1e300}}"#])
        .assert()
        .failure()
        .stdout("")
        .stderr(str_contains("Error: the Excavation phase runs past the supported calendar"));
}

#[test]
fn oversized_days_per_sequence_skips_labels() {
    let mapping = write_temp(r#"{"KO.01": {"description": "Slabs", "sequence": 1}}"#);
    let objects = write_temp(r#"[{"label": "KO.01"}]"#);
    cli()
        .arg("labels")
        .arg("--mapping")
        .arg(mapping.path())
        .arg("--classifications")
        .arg(objects.path())
        .args(["--days-per-sequence", "9223372036854775807"])
        .assert()
        .success()
        .stdout(str_contains("[]"));
}

#[test]
fn labels_builds_schedule_from_files() {
    let mapping = write_temp(r#"{"KO.01": {"description": "Slabs", "sequence": 2}}"#);
    let objects = write_temp(r#"[{"label": "KO.01"}, {"label": "KO.01"}, {"label": "XX"}]"#);
    cli()
        .arg("labels")
        .arg("--mapping")
        .arg(mapping.path())
        .arg("--classifications")
        .arg(objects.path())
        .args(["--start", "2025-09-01", "--days-per-sequence", "5"])
        .assert()
        .success()
        .stdout(str_contains(r#""object_count": 2"#))
        .stdout(str_contains(r#""start_date": "Sat 06.09.25""#));
}

#[test]
fn labels_rejects_bad_start_date() {
    let mapping = write_temp("{}");
    let objects = write_temp("[]");
    cli()
        .arg("labels")
        .arg("--mapping")
        .arg(mapping.path())
        .arg("--classifications")
        .arg(objects.path())
        .args(["--start", "tomorrow"])
        .assert()
        .failure()
        .stderr(str_contains("Error: Invalid date 'tomorrow'"));
}
