//! Single-hit scans: the first non-empty value of a column (`col first`) and
//! the files where a column holds a given value (`files with`)
//!
//! Both stop reading a file at its first qualifying row.

use crate::reader::{Fields, Record};
use crate::scan::{RowControl, ScanDriver, ScanStats};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A file where the scan found what it was looking for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileHit {
    pub path: PathBuf,
    /// The value found; only set by `col first`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LookupReport {
    pub column: String,
    pub hits: Vec<FileHit>,
    /// Files read to the end without a hit
    pub misses: Vec<PathBuf>,
    pub stats: ScanStats,
}

impl LookupReport {
    pub fn has_hits(&self) -> bool {
        !self.hits.is_empty()
    }
}

/// Per-file hit bookkeeping shared by both finders
#[derive(Debug, Default)]
struct Outcomes {
    hits: Vec<FileHit>,
    misses: Vec<PathBuf>,
    found: bool,
}

impl Outcomes {
    fn begin(&mut self) {
        self.found = false;
    }

    fn hit(&mut self, path: &Path, value: Option<String>) -> RowControl {
        self.found = true;
        self.hits.push(FileHit {
            path: path.to_path_buf(),
            value,
        });
        RowControl::NextFile
    }

    fn end(&mut self, path: &Path) {
        if !self.found {
            log::debug!("{}: no match", path.display());
            self.misses.push(path.to_path_buf());
        }
    }

    fn into_report(self, column: String, stats: ScanStats) -> LookupReport {
        LookupReport {
            column,
            hits: self.hits,
            misses: self.misses,
            stats,
        }
    }
}

/// Finds the first non-empty value of a column in each file
#[derive(Debug)]
pub struct FirstValueFinder {
    column: String,
    outcomes: Outcomes,
}

impl FirstValueFinder {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            outcomes: Outcomes::default(),
        }
    }

    pub fn into_report(self, stats: ScanStats) -> LookupReport {
        self.outcomes.into_report(self.column, stats)
    }
}

impl ScanDriver for FirstValueFinder {
    fn columns(&self) -> Vec<String> {
        vec![self.column.clone()]
    }

    fn begin_file(&mut self, _path: &Path) {
        self.outcomes.begin();
    }

    fn visit(&mut self, path: &Path, columns: &[usize], record: &Record<'_>) -> RowControl {
        let value = record.value(columns[0]);
        if value.is_empty() {
            RowControl::Continue
        } else {
            self.outcomes.hit(path, Some(value.into_owned()))
        }
    }

    fn end_file(&mut self, path: &Path) {
        self.outcomes.end(path);
    }
}

/// Finds the files where a column equals a target value
#[derive(Debug)]
pub struct ValueMatcher {
    column: String,
    target: String,
    case_insensitive: bool,
    outcomes: Outcomes,
}

impl ValueMatcher {
    pub fn new(column: impl Into<String>, target: &str, case_insensitive: bool) -> Self {
        let target = target.trim();
        Self {
            column: column.into(),
            target: if case_insensitive {
                target.to_lowercase()
            } else {
                target.to_string()
            },
            case_insensitive,
            outcomes: Outcomes::default(),
        }
    }

    fn is_match<R: Fields + ?Sized>(&self, index: usize, row: &R) -> bool {
        let value = row.value(index);
        if self.case_insensitive {
            value.to_lowercase() == self.target
        } else {
            value == self.target.as_str()
        }
    }

    pub fn into_report(self, stats: ScanStats) -> LookupReport {
        self.outcomes.into_report(self.column, stats)
    }
}

impl ScanDriver for ValueMatcher {
    fn columns(&self) -> Vec<String> {
        vec![self.column.clone()]
    }

    fn begin_file(&mut self, _path: &Path) {
        self.outcomes.begin();
    }

    fn visit(&mut self, path: &Path, columns: &[usize], record: &Record<'_>) -> RowControl {
        if self.is_match(columns[0], record) {
            self.outcomes.hit(path, None)
        } else {
            RowControl::Continue
        }
    }

    fn end_file(&mut self, path: &Path) {
        self.outcomes.end(path);
    }
}
