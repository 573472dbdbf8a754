//! Distinct values and value frequencies of one column (`col vals`)

use crate::config::Config;
use crate::encoding::open_with_encoding;
use crate::error::{DkitError, Result};
use crate::progress::{ScanProgress, PROGRESS_INTERVAL};
use crate::reader::{Fields, Record};
use crate::scan::{RowControl, ScanDriver, ScanStats};
use serde::Serialize;
use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Replacement for empty values unless the user picks another token
pub const DEFAULT_NULL_TOKEN: &str = "<EMPTY>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValuesMode {
    /// Each distinct value once, sorted
    Unique,
    /// Each distinct value with its count, most frequent first
    Frequency,
}

impl ValuesMode {
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "uniq" | "unique" => Ok(Self::Unique),
            "freq" | "frequency" => Ok(Self::Frequency),
            _ => Err(format!("Invalid mode: {}. Use 'uniq' or 'freq'", s)),
        }
    }
}

/// A `START:END` character range, 1-based and inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FixedWidth {
    start: usize,
    end: usize,
}

impl FixedWidth {
    /// Range from `start` to `end`; needs `1 <= start <= end`
    pub fn new(start: usize, end: usize) -> Option<Self> {
        (start >= 1 && end >= start).then_some(Self { start, end })
    }

    /// Cut the range out of `line`. Lines that end before `start` yield
    /// nothing; lines that end inside the range are cut short.
    pub fn extract<'l>(&self, line: &'l str) -> Option<&'l str> {
        let mut offsets = line
            .char_indices()
            .map(|(i, _)| i)
            .skip(self.start.saturating_sub(1));
        let from = offsets.next()?;
        let width = self.end.saturating_sub(self.start) + 1;
        let to = line[from..]
            .char_indices()
            .nth(width)
            .map_or(line.len(), |(i, _)| from + i);
        Some(line[from..to].trim())
    }
}

impl FromStr for FixedWidth {
    type Err = DkitError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            DkitError::invalid_input(format!(
                "invalid fixed-width range {:?} (expected START:END)",
                s
            ))
        };

        let (start, end) = s.split_once(':').ok_or_else(invalid)?;
        let start: usize = start.trim().parse().map_err(|_| invalid())?;
        let end: usize = end.trim().parse().map_err(|_| invalid())?;
        Self::new(start, end).ok_or_else(|| {
            DkitError::invalid_input(format!(
                "invalid fixed-width range {:?}: need 1 <= START <= END",
                s
            ))
        })
    }
}

/// One line of a values report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValuesReport {
    pub column: String,
    pub mode: ValuesMode,
    pub values: Vec<ValueCount>,
    pub stats: ScanStats,
}

/// Accumulates values of one column across files
#[derive(Debug)]
pub struct ValuesCollector {
    column: String,
    mode: ValuesMode,
    null_token: String,
    counts: HashMap<String, u64>,
}

impl ValuesCollector {
    pub fn new(column: impl Into<String>, mode: ValuesMode) -> Self {
        Self {
            column: column.into(),
            mode,
            null_token: DEFAULT_NULL_TOKEN.to_string(),
            counts: HashMap::new(),
        }
    }

    /// Token recorded for empty values; an empty token records them as-is
    pub fn with_null_token(mut self, token: impl Into<String>) -> Self {
        self.null_token = token.into();
        self
    }

    fn record(&mut self, value: &str) {
        let value = if value.is_empty() && !self.null_token.is_empty() {
            self.null_token.as_str()
        } else {
            value
        };

        if let Some(count) = self.counts.get_mut(value) {
            *count += 1;
        } else {
            self.counts.insert(value.to_string(), 1);
        }
    }

    /// Read `range` out of every line of `files`, bypassing the delimited
    /// reader. Header lines are treated as data.
    pub fn scan_fixed_width(
        &mut self,
        files: &[PathBuf],
        range: FixedWidth,
        config: &Config,
    ) -> ScanStats {
        let mut progress = ScanProgress::new(!config.quiet);
        let mut stats = ScanStats::default();

        for path in files {
            progress.start_file(path);
            match self.scan_lines(path, range, config, &progress, &mut stats) {
                Ok(()) => stats.files_scanned += 1,
                Err(e) => {
                    stats.files_skipped += 1;
                    progress.suspend(|| log::warn!("{}: {}", path.display(), e));
                }
            }
        }

        progress.finish();
        stats
    }

    fn scan_lines(
        &mut self,
        path: &Path,
        range: FixedWidth,
        config: &Config,
        progress: &ScanProgress,
        stats: &mut ScanStats,
    ) -> Result<()> {
        let mut reader = BufReader::new(open_with_encoding(path, &config.encoding)?);
        let mut buf = Vec::new();
        let mut lines = 0u64;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            while matches!(buf.last(), Some(b'\n' | b'\r')) {
                buf.pop();
            }

            lines += 1;
            stats.rows_seen += 1;
            if lines % PROGRESS_INTERVAL == 0 {
                progress.update_rows(path, lines);
            }

            let line = config.encoding.decode(&buf);
            if let Some(value) = range.extract(&line) {
                stats.rows_matched += 1;
                self.record(value);
            }
        }

        if lines == 0 {
            return Err(DkitError::EmptyFile {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Sorted values: by value for uniques, by count descending then value
    /// for frequencies
    pub fn into_report(self, stats: ScanStats) -> ValuesReport {
        let mut entries: Vec<(String, u64)> = self.counts.into_iter().collect();
        let values = match self.mode {
            ValuesMode::Unique => {
                entries.sort_by(|a, b| a.0.cmp(&b.0));
                entries
                    .into_iter()
                    .map(|(value, _)| ValueCount { value, count: None })
                    .collect()
            }
            ValuesMode::Frequency => {
                entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                entries
                    .into_iter()
                    .map(|(value, count)| ValueCount {
                        value,
                        count: Some(count),
                    })
                    .collect()
            }
        };

        ValuesReport {
            column: self.column,
            mode: self.mode,
            values,
            stats,
        }
    }
}

impl ScanDriver for ValuesCollector {
    fn columns(&self) -> Vec<String> {
        vec![self.column.clone()]
    }

    fn visit(&mut self, _path: &Path, columns: &[usize], record: &Record<'_>) -> RowControl {
        self.record(&record.value(columns[0]));
        RowControl::Continue
    }
}
