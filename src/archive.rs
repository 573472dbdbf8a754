//! Comparing the entries of two ZIP archives (`cmp zips`)

use crate::error::{DkitError, Result};
use crate::progress::ScanProgress;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Differing lines shown per entry
pub const PREVIEW_LINES: usize = 10;
/// Longest line shown in a preview, in characters
pub const PREVIEW_WIDTH: usize = 80;
/// Bytes inspected when deciding whether an entry is text
const TEXT_SNIFF_LEN: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Identical,
    Different,
    OnlyInA,
    OnlyInB,
}

/// One line that differs between the two versions of an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineDiff {
    /// 1-based
    pub line: usize,
    /// `None` when the line is empty or missing on that side
    pub a: Option<String>,
    pub b: Option<String>,
}

/// A look at how two versions of an entry differ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Preview {
    Text { lines: Vec<LineDiff>, truncated: bool },
    Binary { size_a: u64, size_b: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryDiff {
    pub name: String,
    pub status: EntryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Preview>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ZipSummary {
    pub identical: usize,
    pub different: usize,
    pub only_in_a: usize,
    pub only_in_b: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZipReport {
    pub archive_a: PathBuf,
    pub archive_b: PathBuf,
    /// Entries only on one side first, then common entries; each group by
    /// name
    pub entries: Vec<EntryDiff>,
    pub summary: ZipSummary,
}

impl ZipReport {
    /// Whether the archives count as different for the exit status
    pub fn has_differences(&self, ignore_missing: bool) -> bool {
        self.summary.different > 0
            || (!ignore_missing && (self.summary.only_in_a > 0 || self.summary.only_in_b > 0))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ZipCompareOptions {
    /// Build line or size previews for entries that differ
    pub previews: bool,
    pub quiet: bool,
}

/// Compare the file entries of archives `a` and `b`
pub fn compare_zips(a: &Path, b: &Path, options: ZipCompareOptions) -> Result<ZipReport> {
    let mut archive_a = open_archive(a)?;
    let mut archive_b = open_archive(b)?;
    let entries_a = file_entries(&mut archive_a)?;
    let entries_b = file_entries(&mut archive_b)?;

    let names: BTreeSet<&String> = entries_a.keys().chain(entries_b.keys()).collect();
    let mut summary = ZipSummary::default();
    let mut entries = Vec::new();
    let mut common = Vec::new();

    for name in names {
        match (entries_a.get(name), entries_b.get(name)) {
            (Some(&ia), Some(&ib)) => common.push((name, ia, ib)),
            (Some(_), None) => {
                summary.only_in_a += 1;
                entries.push(EntryDiff {
                    name: name.clone(),
                    status: EntryStatus::OnlyInA,
                    preview: None,
                });
            }
            (None, Some(_)) => {
                summary.only_in_b += 1;
                entries.push(EntryDiff {
                    name: name.clone(),
                    status: EntryStatus::OnlyInB,
                    preview: None,
                });
            }
            (None, None) => {}
        }
    }

    let mut progress = ScanProgress::new(!options.quiet);
    for (name, ia, ib) in common {
        progress.set_message(&format!("Comparing {}...", name));
        match compare_entry(&mut archive_a, ia, &mut archive_b, ib, options.previews) {
            Ok(None) => {
                summary.identical += 1;
                entries.push(EntryDiff {
                    name: name.clone(),
                    status: EntryStatus::Identical,
                    preview: None,
                });
            }
            Ok(Some(preview)) => {
                summary.different += 1;
                entries.push(EntryDiff {
                    name: name.clone(),
                    status: EntryStatus::Different,
                    preview,
                });
            }
            Err(e) => progress.suspend(|| log::warn!("error comparing {}: {}", name, e)),
        }
    }
    progress.finish();

    Ok(ZipReport {
        archive_a: a.to_path_buf(),
        archive_b: b.to_path_buf(),
        entries,
        summary,
    })
}

fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).map_err(|e| {
        DkitError::invalid_input(format!("failed to open {}: {}", path.display(), e))
    })?;
    Ok(ZipArchive::new(file)?)
}

/// Name to index of every non-directory entry
fn file_entries(archive: &mut ZipArchive<File>) -> Result<BTreeMap<String, usize>> {
    let mut entries = BTreeMap::new();
    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        if !entry.is_dir() {
            entries.entry(entry.name().to_string()).or_insert(index);
        }
    }
    Ok(entries)
}

/// `Ok(None)` when identical; otherwise `Ok(Some(preview))`, where the
/// preview is only built when asked for
fn compare_entry(
    archive_a: &mut ZipArchive<File>,
    ia: usize,
    archive_b: &mut ZipArchive<File>,
    ib: usize,
    previews: bool,
) -> Result<Option<Option<Preview>>> {
    if digest(archive_a, ia)? == digest(archive_b, ib)? {
        return Ok(None);
    }
    if !previews {
        return Ok(Some(None));
    }

    let content_a = read_entry(archive_a, ia)?;
    let content_b = read_entry(archive_b, ib)?;
    Ok(Some(Some(preview(&content_a, &content_b))))
}

fn digest(archive: &mut ZipArchive<File>, index: usize) -> Result<blake3::Hash> {
    let mut entry = archive.by_index(index)?;
    let mut hasher = blake3::Hasher::new();
    io::copy(&mut entry, &mut hasher)?;
    Ok(hasher.finalize())
}

fn read_entry(archive: &mut ZipArchive<File>, index: usize) -> Result<Vec<u8>> {
    let mut entry = archive.by_index(index)?;
    let mut content = Vec::new();
    entry.read_to_end(&mut content)?;
    Ok(content)
}

/// Line preview when both sides look like text, sizes otherwise
pub fn preview(a: &[u8], b: &[u8]) -> Preview {
    if !is_likely_text(a) || !is_likely_text(b) {
        return Preview::Binary {
            size_a: a.len() as u64,
            size_b: b.len() as u64,
        };
    }

    let text_a = String::from_utf8_lossy(a);
    let text_b = String::from_utf8_lossy(b);
    let lines_a: Vec<&str> = text_a.split('\n').collect();
    let lines_b: Vec<&str> = text_b.split('\n').collect();

    let mut lines = Vec::new();
    let mut truncated = false;
    for i in 0..lines_a.len().max(lines_b.len()) {
        let line_a = lines_a.get(i).copied().unwrap_or("");
        let line_b = lines_b.get(i).copied().unwrap_or("");
        if line_a == line_b {
            continue;
        }
        if lines.len() == PREVIEW_LINES {
            truncated = true;
            break;
        }
        lines.push(LineDiff {
            line: i + 1,
            a: (!line_a.is_empty()).then(|| truncate_line(line_a, PREVIEW_WIDTH)),
            b: (!line_b.is_empty()).then(|| truncate_line(line_b, PREVIEW_WIDTH)),
        });
    }

    Preview::Text { lines, truncated }
}

/// No NUL byte near the start
fn is_likely_text(content: &[u8]) -> bool {
    !content[..content.len().min(TEXT_SNIFF_LEN)].contains(&0)
}

fn truncate_line(line: &str, width: usize) -> String {
    if line.chars().count() <= width {
        return line.to_string();
    }
    let mut short: String = line.chars().take(width.saturating_sub(3)).collect();
    short.push_str("...");
    short
}
