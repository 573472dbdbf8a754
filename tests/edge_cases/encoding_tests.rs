//! Input encodings and byte-order marks

use crate::common::CliTestRunner;

#[test]
fn test_utf8_bom_is_stripped_from_header() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_bytes("bom.csv", b"\xEF\xBB\xBFid,name\n1,ann\n")
        .unwrap();
    let path = runner.fixture().arg("bom.csv");

    let output = runner.expect_success(&["col", "list", &path]);
    assert_eq!(output.lines(), vec!["id", "name"]);

    let output = runner.expect_success(&["col", "vals", "uniq", "id", &path, "-e", "utf-8"]);
    assert_eq!(output.lines(), vec!["1"]);
}

#[test]
fn test_latin1_is_decoded() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_bytes("latin1.csv", b"city\nS\xE3o Paulo\nZ\xFCrich\n")
        .unwrap();
    let path = runner.fixture().arg("latin1.csv");

    let output = runner.expect_success(&["col", "vals", "uniq", "city", &path, "-e", "latin1"]);
    assert_eq!(output.lines(), vec!["São Paulo", "Zürich"]);

    let output = runner.expect_success(&["col", "vals", "uniq", "city", &path, "-e", "ISO-8859-1"]);
    assert_eq!(output.lines().len(), 2);
}

#[test]
fn test_invalid_utf8_is_replaced() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_bytes("bad.csv", b"city\nS\xE3o\n")
        .unwrap();
    let path = runner.fixture().arg("bad.csv");

    let output = runner.expect_success(&["col", "vals", "uniq", "city", &path]);
    assert_eq!(output.lines(), vec!["S\u{FFFD}o"]);
}

#[test]
fn test_unknown_encoding_reads_raw_bytes() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv_raw("plain.csv", "id,name\n1,ann\n")
        .unwrap();
    let path = runner.fixture().arg("plain.csv");

    let output = runner.expect_success(&["col", "vals", "uniq", "name", &path, "-e", "cp1252"]);
    assert_eq!(output.lines(), vec!["ann"]);
}

#[test]
fn test_fmt_writes_latin1_input_as_utf8() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_bytes("latin1.csv", b"a;b\n\xE9;x\n")
        .unwrap();
    let path = runner.fixture().arg("latin1.csv");

    let output = runner.expect_success(&["fmt", "--in-delim", ";", "--out-delim", ",", &path, "-e", "latin1"]);
    assert_eq!(output.stdout, "a,b\né,x\n");
}
