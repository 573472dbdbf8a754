//! Common test utilities and helpers

use dkit::commands::Outcome;
use dkit::{DkitError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::ZipWriter;

/// Test fixture manager for creating temporary test environments
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Get the root path of the test fixture
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of `name` inside the fixture, as a string for CLI arguments
    pub fn arg(&self, name: &str) -> String {
        self.root().join(name).to_string_lossy().into_owned()
    }

    /// Create a test CSV file with sample data
    pub fn create_csv(&self, name: &str, data: &[Vec<&str>]) -> Result<PathBuf> {
        let mut content = String::new();
        for row in data {
            content.push_str(&row.join(","));
            content.push('\n');
        }
        self.create_csv_raw(name, &content)
    }

    /// Create a test file with raw string content
    pub fn create_csv_raw(&self, name: &str, content: &str) -> Result<PathBuf> {
        self.create_bytes(name, content.as_bytes())
    }

    /// Create a test file with raw bytes
    pub fn create_bytes(&self, name: &str, content: &[u8]) -> Result<PathBuf> {
        let path = self.root().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Create a ZIP archive holding `entries`
    pub fn create_zip(&self, name: &str, entries: &[(&str, &[u8])]) -> Result<PathBuf> {
        let path = self.root().join(name);
        let mut zip = ZipWriter::new(fs::File::create(&path)?);
        for (entry, content) in entries {
            zip.start_file(*entry, FileOptions::default())?;
            zip.write_all(content)?;
        }
        zip.finish()?;
        Ok(path)
    }
}

/// What a command produced
#[derive(Debug)]
pub struct CommandOutput {
    pub outcome: Outcome,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}

/// Helper for running CLI commands in tests
pub struct CliTestRunner {
    fixture: TestFixture,
}

impl CliTestRunner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fixture: TestFixture::new()?,
        })
    }

    pub fn fixture(&self) -> &TestFixture {
        &self.fixture
    }

    /// Run a dkit command and return its outcome and both output streams
    pub fn run_command(&self, args: &[&str]) -> Result<CommandOutput> {
        use clap::Parser;
        use dkit::cli::Cli;
        use dkit::commands::execute_command_with_streams;

        // Build command line arguments
        let mut cmd_args = vec!["dkit"];
        cmd_args.extend(args);

        let cli = Cli::try_parse_from(cmd_args)
            .map_err(|e| DkitError::invalid_input(e.to_string()))?;

        let mut out = Vec::new();
        let mut err = Vec::new();
        let outcome = execute_command_with_streams(cli.command, &cli.global, &mut out, &mut err)?;
        Ok(CommandOutput {
            outcome,
            stdout: String::from_utf8_lossy(&out).into_owned(),
            stderr: String::from_utf8_lossy(&err).into_owned(),
        })
    }

    /// Run a command and expect it to succeed
    pub fn expect_success(&self, args: &[&str]) -> CommandOutput {
        let output = self.run_command(args).expect("Command should succeed");
        assert_eq!(output.outcome, Outcome::Success, "stdout: {}", output.stdout);
        output
    }

    /// Run a command and expect it to report findings
    pub fn expect_findings(&self, args: &[&str]) -> CommandOutput {
        let output = self.run_command(args).expect("Command should run");
        assert_eq!(output.outcome, Outcome::Findings, "stdout: {}", output.stdout);
        output
    }

    /// Run a command and expect it to fail
    pub fn expect_failure(&self, args: &[&str]) -> DkitError {
        self.run_command(args).expect_err("Command should fail")
    }
}

/// Sample data generators for testing
pub mod sample_data {
    pub fn people_csv_data() -> Vec<Vec<&'static str>> {
        vec![
            vec!["id", "name", "email", "status"],
            vec!["1", "Ann", "ann@example.com", "open"],
            vec!["2", "Bob", "", "closed"],
            vec!["3", "Cid", "cid@example.com", "open"],
        ]
    }

    pub fn pairs_csv_data() -> Vec<Vec<&'static str>> {
        vec![
            vec!["left", "right", "kind"],
            vec!["a", "a", "dog"],
            vec!["b", "B", "cat"],
            vec!["c", "x", "dog"],
            vec!["", "y", "dog"],
        ]
    }

    pub fn orders_csv_data() -> Vec<Vec<&'static str>> {
        vec![
            vec!["order", "customer", "region"],
            vec!["o1", "acme", "north"],
            vec!["o1", "acme", "north"],
            vec!["o1", "globex", "south"],
            vec!["o2", "initech", "east"],
        ]
    }
}
