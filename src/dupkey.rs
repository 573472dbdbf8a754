//! Keys that map to more than one combination of other columns (`col dupkey`)

use crate::reader::{Fields, Record};
use crate::scan::{RowControl, ScanDriver, ScanStats};
use crate::values::DEFAULT_NULL_TOKEN;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Options for [`DupKeyDetector`]
#[derive(Debug, Clone)]
pub struct DupKeyOptions {
    pub key: String,
    /// Columns whose values form the tuple tracked per key
    pub by: Vec<String>,
    pub ignore_case: bool,
    /// Skip rows where any `by` column is empty
    pub require_all: bool,
    /// Stands in for empty `by` values when `require_all` is off
    pub null_token: String,
}

impl DupKeyOptions {
    pub fn new(key: impl Into<String>, by: Vec<String>) -> Self {
        Self {
            key: key.into(),
            by,
            ignore_case: false,
            require_all: false,
            null_token: DEFAULT_NULL_TOKEN.to_string(),
        }
    }
}

/// Split a comma-separated `--by` list, dropping empty items
pub fn parse_by_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TupleCount {
    pub values: Vec<String>,
    pub count: u64,
}

/// A key seen with several distinct tuples
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyConflict {
    pub key: String,
    /// Most frequent tuple first, ties broken by tuple
    pub tuples: Vec<TupleCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DupKeyReport {
    pub by: Vec<String>,
    pub conflicts: Vec<KeyConflict>,
    pub stats: ScanStats,
}

impl DupKeyReport {
    pub fn conflicting_keys(&self) -> usize {
        self.conflicts.len()
    }
}

/// Tracks, per key, how often each tuple of `by` values occurs
#[derive(Debug)]
pub struct DupKeyDetector {
    options: DupKeyOptions,
    tuples: HashMap<String, HashMap<Vec<String>, u64>>,
}

impl DupKeyDetector {
    pub fn new(options: DupKeyOptions) -> Self {
        Self {
            options,
            tuples: HashMap::new(),
        }
    }

    fn record<R: Fields + ?Sized>(&mut self, key_index: usize, by_indices: &[usize], row: &R) {
        let key = row.value(key_index);
        if key.is_empty() {
            return;
        }

        let mut values = Vec::with_capacity(by_indices.len());
        for &index in by_indices {
            let value = row.value(index);
            if value.is_empty() {
                if self.options.require_all {
                    return;
                }
                values.push(self.options.null_token.clone());
            } else {
                values.push(value.into_owned());
            }
        }

        let key = if self.options.ignore_case {
            values.iter_mut().for_each(|v| *v = v.to_lowercase());
            key.to_lowercase()
        } else {
            key.into_owned()
        };

        *self.tuples.entry(key).or_default().entry(values).or_insert(0) += 1;
    }

    /// Keys with more than one distinct tuple, in key order
    pub fn into_report(self, stats: ScanStats) -> DupKeyReport {
        let mut conflicts: Vec<KeyConflict> = self
            .tuples
            .into_iter()
            .filter(|(_, tuples)| tuples.len() > 1)
            .map(|(key, tuples)| {
                let mut tuples: Vec<TupleCount> = tuples
                    .into_iter()
                    .map(|(values, count)| TupleCount { values, count })
                    .collect();
                tuples.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.values.cmp(&b.values)));
                KeyConflict { key, tuples }
            })
            .collect();
        conflicts.sort_by(|a, b| a.key.cmp(&b.key));

        DupKeyReport {
            by: self.options.by,
            conflicts,
            stats,
        }
    }
}

impl ScanDriver for DupKeyDetector {
    fn columns(&self) -> Vec<String> {
        std::iter::once(self.options.key.clone())
            .chain(self.options.by.iter().cloned())
            .collect()
    }

    fn visit(&mut self, _path: &Path, columns: &[usize], record: &Record<'_>) -> RowControl {
        if let Some((&key, by)) = columns.split_first() {
            self.record(key, by, record);
        }
        RowControl::Continue
    }
}
