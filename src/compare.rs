//! Row-by-row comparison of two columns (`col cmp`)

use crate::reader::{Fields, Record};
use crate::scan::{RowControl, ScanDriver, ScanStats};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct CompareOptions {
    pub column_a: String,
    pub column_b: String,
    pub ignore_case: bool,
    /// Compare rows where either side is empty instead of skipping them
    pub allow_empty: bool,
    /// Count mismatches without keeping their details
    pub quiet: bool,
}

impl CompareOptions {
    pub fn new(column_a: impl Into<String>, column_b: impl Into<String>) -> Self {
        Self {
            column_a: column_a.into(),
            column_b: column_b.into(),
            ignore_case: false,
            allow_empty: false,
            quiet: false,
        }
    }
}

/// A row where the two columns disagree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    /// File name without its directory
    pub file: String,
    pub line: u64,
    pub a: String,
    pub b: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareReport {
    pub column_a: String,
    pub column_b: String,
    pub mismatches: u64,
    /// Empty in quiet mode
    pub details: Vec<Mismatch>,
    pub stats: ScanStats,
}

#[derive(Debug)]
pub struct ColumnComparator {
    options: CompareOptions,
    mismatches: u64,
    details: Vec<Mismatch>,
}

impl ColumnComparator {
    pub fn new(options: CompareOptions) -> Self {
        Self {
            options,
            mismatches: 0,
            details: Vec::new(),
        }
    }

    fn compare<R: Fields + ?Sized>(&mut self, path: &Path, line: u64, a: usize, b: usize, row: &R) {
        let raw_a = row.value(a);
        let raw_b = row.value(b);

        if !self.options.allow_empty && (raw_a.is_empty() || raw_b.is_empty()) {
            return;
        }

        let equal = if self.options.ignore_case {
            raw_a.to_lowercase() == raw_b.to_lowercase()
        } else {
            raw_a == raw_b
        };
        if equal {
            return;
        }

        self.mismatches += 1;
        if !self.options.quiet {
            self.details.push(Mismatch {
                file: path.file_name().map_or_else(
                    || path.display().to_string(),
                    |n| n.to_string_lossy().into_owned(),
                ),
                line,
                a: raw_a.into_owned(),
                b: raw_b.into_owned(),
            });
        }
    }

    pub fn into_report(self, stats: ScanStats) -> CompareReport {
        CompareReport {
            column_a: self.options.column_a,
            column_b: self.options.column_b,
            mismatches: self.mismatches,
            details: self.details,
            stats,
        }
    }
}

impl ScanDriver for ColumnComparator {
    fn columns(&self) -> Vec<String> {
        vec![self.options.column_a.clone(), self.options.column_b.clone()]
    }

    fn visit(&mut self, path: &Path, columns: &[usize], record: &Record<'_>) -> RowControl {
        self.compare(path, record.line(), columns[0], columns[1], record);
        RowControl::Continue
    }
}
