//! Integration tests for the `col` commands

use crate::common::{sample_data, CliTestRunner};
use dkit::commands::Outcome;
use dkit::DkitError;
use serde_json::Value;

#[test]
fn test_col_cmp_reports_mismatches() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv("pairs.csv", &sample_data::pairs_csv_data())
        .unwrap();
    let path = runner.fixture().arg("pairs.csv");

    let output = runner.expect_findings(&["col", "cmp", "left", "right", &path]);
    // b/B and c/x differ; the row with an empty left side is skipped.
    assert_eq!(
        output.lines(),
        vec![
            "pairs.csv line 3",
            "  A: b",
            "  B: B",
            "pairs.csv line 4",
            "  A: c",
            "  B: x",
        ]
    );
}

#[test]
fn test_col_cmp_ignore_case_and_allow_empty() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv("pairs.csv", &sample_data::pairs_csv_data())
        .unwrap();
    let path = runner.fixture().arg("pairs.csv");

    let output = runner.expect_findings(&["col", "cmp", "left", "right", &path, "--ignore-case"]);
    assert_eq!(output.lines(), vec!["pairs.csv line 4", "  A: c", "  B: x"]);

    let output = runner.expect_findings(&[
        "col", "cmp", "left", "right", &path, "--ignore-case", "--allow-empty", "--format", "json",
    ]);
    let json: Value = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(json["mismatches"], 2);
    assert_eq!(json["details"][1]["line"], 5);
    assert_eq!(json["details"][1]["a"], "");
}

#[test]
fn test_col_cmp_with_filter_and_quiet() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv("pairs.csv", &sample_data::pairs_csv_data())
        .unwrap();
    let path = runner.fixture().arg("pairs.csv");

    // Only the cat row is compared.
    let output = runner.expect_findings(&["col", "cmp", "left", "right", &path, "--when", "kind=cat", "-q"]);
    assert!(output.stdout.is_empty());

    let output = runner.expect_success(&["col", "cmp", "left", "right", &path, "--when", "kind=cat", "--ignore-case"]);
    assert!(output.stdout.is_empty());
}

#[test]
fn test_col_cmp_no_header_uses_indices() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv_raw("raw.csv", "1,1\n2,3\n")
        .unwrap();
    let path = runner.fixture().arg("raw.csv");

    let output = runner.expect_findings(&["col", "cmp", "0", "1", &path, "-H"]);
    assert_eq!(output.lines(), vec!["raw.csv line 2", "  A: 2", "  B: 3"]);

    let err = runner.expect_failure(&["col", "cmp", "left", "1", &path, "-H"]);
    assert!(matches!(err, DkitError::InvalidIndex { .. }));
}

#[test]
fn test_col_vals_unique_and_frequency() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv("pairs.csv", &sample_data::pairs_csv_data())
        .unwrap();
    let path = runner.fixture().arg("pairs.csv");

    let output = runner.expect_success(&["col", "vals", "uniq", "kind", &path]);
    assert_eq!(output.lines(), vec!["cat", "dog"]);

    let output = runner.expect_success(&["col", "vals", "freq", "kind", &path]);
    assert_eq!(
        output.lines(),
        vec![format!("{:<30} {}", "dog", 3), format!("{:<30} {}", "cat", 1)]
    );
}

#[test]
fn test_col_vals_null_token() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv("people.csv", &sample_data::people_csv_data())
        .unwrap();
    let path = runner.fixture().arg("people.csv");

    let output = runner.expect_success(&["col", "vals", "uniq", "email", &path]);
    assert_eq!(
        output.lines(),
        vec!["<EMPTY>", "ann@example.com", "cid@example.com"]
    );

    let output = runner.expect_success(&["col", "vals", "uniq", "email", &path, "--null-token", "NULL"]);
    assert!(output.lines().contains(&"NULL"));
}

#[test]
fn test_col_vals_filtered_json() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv("people.csv", &sample_data::people_csv_data())
        .unwrap();
    let path = runner.fixture().arg("people.csv");

    let output = runner.expect_success(&[
        "col", "vals", "freq", "name", &path, "--when", "status=open", "--format", "json",
    ]);
    let json: Value = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(json["column"], "name");
    assert_eq!(json["values"].as_array().unwrap().len(), 2);
    assert_eq!(json["stats"]["rows_seen"], 3);
    assert_eq!(json["stats"]["rows_matched"], 2);
}

#[test]
fn test_col_vals_fixed_width() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv_raw("fixed.txt", "AB123xx\nCD456yy\nEF123zz\n")
        .unwrap();
    let path = runner.fixture().arg("fixed.txt");

    let output = runner.expect_success(&["col", "vals", "freq", "_", &path, "--fixed-width", "3:5"]);
    assert_eq!(
        output.lines(),
        vec![format!("{:<30} {}", "123", 2), format!("{:<30} {}", "456", 1)]
    );

    let err = runner.expect_failure(&["col", "vals", "uniq", "_", &path, "--fixed-width", "5:3"]);
    assert!(matches!(err, DkitError::InvalidInput { .. }));

    let err = runner.expect_failure(&[
        "col", "vals", "uniq", "_", &path, "--fixed-width", "1:2", "--when", "a=b",
    ]);
    assert!(matches!(err, DkitError::InvalidInput { .. }));
}

#[test]
fn test_col_first_per_file() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    fixture
        .create_csv("a.csv", &[vec!["id", "note"], vec!["1", ""], vec!["2", "hello"]])
        .unwrap();
    fixture
        .create_csv("b.csv", &[vec!["id", "note"], vec!["1", ""]])
        .unwrap();
    let a = fixture.arg("a.csv");
    let b = fixture.arg("b.csv");

    let output = runner.expect_success(&["col", "first", "note", &a, &b]);
    assert_eq!(output.lines(), vec![format!("{}: hello", a)]);

    let output = runner.expect_findings(&["col", "first", "note", &b]);
    assert!(output.stdout.is_empty());
}

#[test]
fn test_col_dupkey_finds_conflicts() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv("orders.csv", &sample_data::orders_csv_data())
        .unwrap();
    let path = runner.fixture().arg("orders.csv");

    let output = runner.expect_findings(&["col", "dupkey", "order", &path, "--by", "customer,region"]);
    assert_eq!(
        output.lines(),
        vec![
            "KEY: o1  (2 distinct BY-tuples)",
            "  - (customer=\"acme\", region=\"north\")  2",
            "  - (customer=\"globex\", region=\"south\")  1",
            "",
        ]
    );
}

#[test]
fn test_col_dupkey_no_conflicts_and_quiet_json() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv("orders.csv", &sample_data::orders_csv_data())
        .unwrap();
    let path = runner.fixture().arg("orders.csv");

    let output = runner.expect_success(&["col", "dupkey", "customer", &path, "--by", "order"]);
    assert!(output.stdout.is_empty());

    let output = runner.expect_findings(&["col", "dupkey", "order", &path, "--by", "region", "-q"]);
    assert!(output.stdout.is_empty());

    let output = runner.expect_findings(&[
        "col", "dupkey", "order", &path, "--by", "region", "-q", "--format", "json",
    ]);
    let json: Value = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(json["conflicts"][0]["key"], "o1");

    let err = runner.expect_failure(&["col", "dupkey", "order", &path, "--by", " , "]);
    assert!(matches!(err, DkitError::InvalidInput { .. }));
}

#[test]
fn test_col_list_union_of_headers() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    fixture
        .create_csv("a.csv", &[vec!["zeta", "alpha"], vec!["1", "2"]])
        .unwrap();
    fixture
        .create_csv("b.csv", &[vec!["alpha", "mid"], vec!["1", "2"]])
        .unwrap();
    let a = fixture.arg("a.csv");
    let b = fixture.arg("b.csv");

    let output = runner.expect_success(&["col", "list", &a, &b]);
    assert_eq!(output.lines(), vec!["zeta", "alpha", "mid"]);

    let output = runner.expect_success(&["col", "list", &a, &b, "--sorted", "--oneline", "-o", "pipe"]);
    assert_eq!(output.lines(), vec!["alpha|mid|zeta"]);
}

#[test]
fn test_missing_column_skips_file() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv("people.csv", &sample_data::people_csv_data())
        .unwrap();
    let path = runner.fixture().arg("people.csv");

    let output = runner
        .run_command(&["col", "vals", "uniq", "missing", &path, "--format", "json"])
        .unwrap();
    assert_eq!(output.outcome, Outcome::Success);
    let json: Value = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(json["stats"]["files_skipped"], 1);
    assert!(json["values"].as_array().unwrap().is_empty());
}

#[test]
fn test_invalid_filter_is_an_error() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv("people.csv", &sample_data::people_csv_data())
        .unwrap();
    let path = runner.fixture().arg("people.csv");

    let err = runner.expect_failure(&["col", "first", "name", &path, "--when", "status"]);
    assert!(matches!(err, DkitError::InvalidCondition { .. }));
}

#[test]
fn test_scan_summary_is_printed_when_quiet() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv("people.csv", &sample_data::people_csv_data())
        .unwrap();
    let path = runner.fixture().arg("people.csv");

    let output = runner.expect_success(&["col", "vals", "uniq", "status", &path, "-q"]);
    assert_eq!(output.lines(), vec!["closed", "open"]);
    assert_eq!(output.stderr, "\nScanned 1 files, 3 rows. Distinct values: 2\n");

    let output = runner.expect_success(&["col", "first", "email", &path, "-q"]);
    assert_eq!(output.stderr, "\nScanned 1 files, 3 rows. Files with a value: 1\n");
}
