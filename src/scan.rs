//! The per-file scan loop shared by the column commands
//!
//! [`Scanner::run`] opens each file in turn, resolves the driver's columns and
//! the row filter against that file's header, streams the rows that pass the
//! filter into a [`ScanDriver`], and keeps running totals. A file that cannot
//! be opened, is empty, or lacks a referenced column is skipped with a warning.

use crate::config::Config;
use crate::error::{DkitError, Result};
use crate::filter::{Filter, ResolvedFilter};
use crate::progress::{ScanProgress, PROGRESS_INTERVAL};
use crate::reader::{DelimitedReader, Record};
use crate::resolver::ColumnResolver;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What the scan loop should do after a row has been visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowControl {
    Continue,
    /// Stop reading the current file and move on to the next one
    NextFile,
}

/// A per-command accumulator fed by [`Scanner`]
pub trait ScanDriver {
    /// Column references to resolve for every file, in the order the driver
    /// expects their positions in [`ScanDriver::visit`]
    fn columns(&self) -> Vec<String>;

    /// Called once a file is open and its columns are resolved
    fn begin_file(&mut self, _path: &Path) {}

    /// Called for every row that passes the filter
    fn visit(&mut self, path: &Path, columns: &[usize], record: &Record<'_>) -> RowControl;

    /// Called after the last row of a file that was not skipped
    fn end_file(&mut self, _path: &Path) {}
}

/// Running totals for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub files_scanned: u64,
    pub files_skipped: u64,
    /// Data rows read, whether or not they passed the filter
    pub rows_seen: u64,
    /// Rows handed to the driver
    pub rows_matched: u64,
}

/// Runs a [`ScanDriver`] over a list of files
pub struct Scanner<'a> {
    config: &'a Config,
    filter: &'a Filter,
    progress: ScanProgress,
}

impl<'a> Scanner<'a> {
    pub fn new(config: &'a Config, filter: &'a Filter) -> Self {
        Self {
            config,
            filter,
            progress: ScanProgress::new(!config.quiet),
        }
    }

    /// Scan `files` in order.
    ///
    /// Without headers the columns and the filter are resolved once up front
    /// and a failure there is returned. Everything that goes wrong inside a
    /// single file is logged and that file is skipped.
    pub fn run<D: ScanDriver + ?Sized>(
        mut self,
        files: &[PathBuf],
        driver: &mut D,
    ) -> Result<ScanStats> {
        let references = driver.columns();
        let positional = if self.config.no_header {
            let resolver = ColumnResolver::positional();
            Some((
                resolver.resolve_all(references.as_slice())?,
                self.filter.resolve(&resolver)?,
            ))
        } else {
            None
        };

        let mut stats = ScanStats::default();
        for path in files {
            match self.scan_file(path, &references, positional.as_ref(), driver, &mut stats) {
                Ok(()) => stats.files_scanned += 1,
                Err(e) => {
                    stats.files_skipped += 1;
                    self.warn(path, &e);
                }
            }
        }

        self.progress.finish();
        Ok(stats)
    }

    fn scan_file<D: ScanDriver + ?Sized>(
        &self,
        path: &Path,
        references: &[String],
        positional: Option<&(Vec<usize>, ResolvedFilter)>,
        driver: &mut D,
        stats: &mut ScanStats,
    ) -> Result<()> {
        self.progress.start_file(path);
        let mut reader = DelimitedReader::open(path, self.config)?;

        let resolved;
        let (columns, filter) = match positional {
            Some((columns, filter)) => (columns.as_slice(), filter),
            None => {
                let header = reader.read_header()?.ok_or_else(|| DkitError::EmptyFile {
                    path: path.to_path_buf(),
                })?;
                let resolver = ColumnResolver::with_header(&header);
                resolved = (resolver.resolve_all(references)?, self.filter.resolve(&resolver)?);
                log::debug!("{}: resolved {:?} to {:?}", path.display(), references, resolved.0);
                (resolved.0.as_slice(), &resolved.1)
            }
        };

        driver.begin_file(path);

        let mut rows = 0u64;
        let mut fault = None;
        loop {
            let record = match reader.next_record() {
                Ok(Some(record)) => record,
                Ok(None) => break,
                Err(e) => {
                    fault = Some(e);
                    break;
                }
            };

            rows += 1;
            stats.rows_seen += 1;
            if rows % PROGRESS_INTERVAL == 0 {
                self.progress.update_rows(path, rows);
            }

            if !filter.matches(&record) {
                continue;
            }
            stats.rows_matched += 1;
            if driver.visit(path, columns, &record) == RowControl::NextFile {
                break;
            }
        }

        if rows == 0 && fault.is_none() && positional.is_some() {
            return Err(DkitError::EmptyFile {
                path: path.to_path_buf(),
            });
        }
        if let Some(e) = fault {
            self.warn(path, &e);
        }

        driver.end_file(path);
        Ok(())
    }

    fn warn(&self, path: &Path, error: &DkitError) {
        self.progress.suspend(|| {
            log::warn!("{}: {}", path.display(), error);
        });
    }
}
