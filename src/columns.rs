//! Column names across files (`col list`)

use crate::config::Config;
use crate::error::{DkitError, Result};
use crate::progress::ScanProgress;
use crate::reader::DelimitedReader;
use crate::scan::ScanStats;
use indexmap::IndexSet;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct ColumnsReport {
    /// Every distinct header name, in first-seen order unless sorted
    pub columns: Vec<String>,
    pub stats: ScanStats,
}

/// Collect the union of the header rows of `files`.
///
/// Only the first record of each file is read.
pub fn list_columns(files: &[PathBuf], config: &Config, sorted: bool) -> ColumnsReport {
    let mut progress = ScanProgress::new(!config.quiet);
    let mut seen = IndexSet::new();
    let mut stats = ScanStats::default();

    for path in files {
        progress.start_file(path);
        match read_header(path, config) {
            Ok(header) => {
                stats.files_scanned += 1;
                seen.extend(header);
            }
            Err(e) => {
                stats.files_skipped += 1;
                progress.suspend(|| log::warn!("{}: {}", path.display(), e));
            }
        }
    }
    progress.finish();

    let mut columns: Vec<String> = seen.into_iter().collect();
    if sorted {
        columns.sort();
    }
    ColumnsReport { columns, stats }
}

fn read_header(path: &Path, config: &Config) -> Result<Vec<String>> {
    DelimitedReader::open(path, config)?
        .read_header()?
        .ok_or_else(|| DkitError::EmptyFile {
            path: path.to_path_buf(),
        })
}
