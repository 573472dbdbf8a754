//! Integration tests for `files with` and input expansion

use crate::common::{sample_data, CliTestRunner};
use serde_json::Value;

#[test]
fn test_files_with_lists_matching_files() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    fixture
        .create_csv("open.csv", &sample_data::people_csv_data())
        .unwrap();
    fixture
        .create_csv("closed.csv", &[vec!["id", "status"], vec!["9", "closed"]])
        .unwrap();
    let open = fixture.arg("open.csv");
    let closed = fixture.arg("closed.csv");

    let output = runner.expect_success(&["files", "with", "status", "open", &open, &closed]);
    assert_eq!(output.lines(), vec![open.as_str()]);

    let output = runner.expect_findings(&["files", "with", "status", "pending", &open, &closed]);
    assert!(output.stdout.is_empty());
}

#[test]
fn test_files_with_case_and_whitespace() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv_raw("data.csv", "id,status\n1,  OPEN \n")
        .unwrap();
    let path = runner.fixture().arg("data.csv");

    runner.expect_findings(&["files", "with", "status", "open", &path]);
    runner.expect_success(&["files", "with", "status", "open", &path, "--case-insensitive"]);
    runner.expect_success(&["files", "with", "status", " OPEN ", &path]);
}

#[test]
fn test_files_with_filter() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv("people.csv", &sample_data::people_csv_data())
        .unwrap();
    let path = runner.fixture().arg("people.csv");

    runner.expect_success(&["files", "with", "name", "Bob", &path]);
    runner.expect_findings(&["files", "with", "name", "Bob", &path, "--when", "email not empty"]);
}

#[test]
fn test_directory_arguments_are_expanded() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    fixture
        .create_csv("data/b.csv", &[vec!["status"], vec!["open"]])
        .unwrap();
    fixture
        .create_csv("data/a.csv", &[vec!["status"], vec!["open"]])
        .unwrap();
    fixture
        .create_csv("data/nested/c.csv", &[vec!["status"], vec!["shut"]])
        .unwrap();
    let dir = fixture.arg("data");

    let output = runner.expect_success(&["files", "with", "status", "open", &dir, "--format", "json"]);
    let json: Value = serde_json::from_str(&output.stdout).unwrap();
    let hits: Vec<&str> = json["hits"]
        .as_array()
        .unwrap()
        .iter()
        .map(|hit| hit["path"].as_str().unwrap())
        .collect();
    assert_eq!(hits.len(), 2);
    assert!(hits[0].ends_with("a.csv"));
    assert!(hits[1].ends_with("b.csv"));
    assert_eq!(json["misses"].as_array().unwrap().len(), 1);
    assert_eq!(json["stats"]["files_scanned"], 3);
}

#[test]
fn test_missing_file_is_skipped() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv("people.csv", &sample_data::people_csv_data())
        .unwrap();
    let path = runner.fixture().arg("people.csv");
    let missing = runner.fixture().arg("missing.csv");

    let output = runner.expect_success(&["files", "with", "name", "Ann", &missing, &path, "--format", "json"]);
    let json: Value = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(json["stats"]["files_skipped"], 1);
    assert_eq!(json["stats"]["files_scanned"], 1);
    assert_eq!(json["hits"][0]["path"], path.as_str());
    assert!(json["hits"][0].get("value").is_none());
}

#[test]
fn test_summary_is_printed_when_quiet() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv("people.csv", &sample_data::people_csv_data())
        .unwrap();
    let path = runner.fixture().arg("people.csv");

    let output = runner.expect_success(&["files", "with", "status", "open", &path, "-q"]);
    assert_eq!(output.lines(), vec![path.as_str()]);
    assert_eq!(output.stderr, "\nScanned 1 files, 3 rows. Matching files: 1\n");
}
