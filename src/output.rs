//! Output formatting utilities
//!
//! Primary results are written to a caller-supplied sink (stdout in the
//! binary). Summaries are returned as strings for the caller to put on
//! stderr.

use crate::archive::{EntryStatus, Preview, ZipReport, ZipSummary};
use crate::columns::ColumnsReport;
use crate::compare::CompareReport;
use crate::dupkey::DupKeyReport;
use crate::error::Result;
use crate::lookup::LookupReport;
use crate::scan::ScanStats;
use crate::values::ValuesReport;
use std::io::Write;

/// Pretty printer for dkit output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// One value per line, or `value<padding> count` for frequencies
    pub fn print_values(report: &ValuesReport, out: &mut dyn Write) -> Result<()> {
        for entry in &report.values {
            match entry.count {
                Some(count) => writeln!(out, "{:<30} {}", entry.value, count)?,
                None => writeln!(out, "{}", entry.value)?,
            }
        }
        Ok(())
    }

    /// Mismatch details
    pub fn print_compare(report: &CompareReport, out: &mut dyn Write) -> Result<()> {
        for mismatch in &report.details {
            writeln!(out, "{} line {}", mismatch.file, mismatch.line)?;
            writeln!(out, "  A: {}", mismatch.a)?;
            writeln!(out, "  B: {}", mismatch.b)?;
        }
        Ok(())
    }

    /// Conflicting keys with their tuples
    pub fn print_dupkey(report: &DupKeyReport, out: &mut dyn Write) -> Result<()> {
        for conflict in &report.conflicts {
            writeln!(
                out,
                "KEY: {}  ({} distinct BY-tuples)",
                conflict.key,
                conflict.tuples.len()
            )?;
            for tuple in &conflict.tuples {
                writeln!(out, "  - ({})  {}", join_pairs(&report.by, &tuple.values), tuple.count)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// `path: value` for every file with a hit, or just the path when the
    /// lookup carries no value
    pub fn print_hits(report: &LookupReport, out: &mut dyn Write) -> Result<()> {
        for hit in &report.hits {
            match &hit.value {
                Some(value) => writeln!(out, "{}: {}", hit.path.display(), value)?,
                None => writeln!(out, "{}", hit.path.display())?,
            }
        }
        Ok(())
    }

    /// Column names, one per line or joined with `separator`
    pub fn print_columns(
        report: &ColumnsReport,
        separator: Option<char>,
        out: &mut dyn Write,
    ) -> Result<()> {
        match separator {
            Some(separator) => {
                let joined = report.columns.join(separator.encode_utf8(&mut [0; 4]));
                writeln!(out, "{}", joined)?;
            }
            None => {
                for column in &report.columns {
                    writeln!(out, "{}", column)?;
                }
            }
        }
        Ok(())
    }

    /// Entry-by-entry archive comparison
    pub fn print_zip_report(report: &ZipReport, out: &mut dyn Write) -> Result<()> {
        for entry in &report.entries {
            match entry.status {
                EntryStatus::OnlyInA => writeln!(out, "→ {} (only in A)", entry.name)?,
                EntryStatus::OnlyInB => writeln!(out, "→ {} (only in B)", entry.name)?,
                EntryStatus::Identical => writeln!(out, "✅ {} (identical)", entry.name)?,
                EntryStatus::Different => writeln!(out, "⚠ {} (different)", entry.name)?,
            }
            if let Some(preview) = &entry.preview {
                Self::print_preview(&entry.name, preview, out)?;
            }
        }
        Ok(())
    }

    fn print_preview(name: &str, preview: &Preview, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "  Differences in {}:", name)?;
        match preview {
            Preview::Text { lines, truncated } => {
                for line in lines {
                    writeln!(out, "  Line {}:", line.line)?;
                    if let Some(a) = &line.a {
                        writeln!(out, "    A: {}", a)?;
                    }
                    if let Some(b) = &line.b {
                        writeln!(out, "    B: {}", b)?;
                    }
                }
                if *truncated {
                    writeln!(out, "  ... (diff truncated)")?;
                }
            }
            Preview::Binary { size_a, size_b } => {
                writeln!(
                    out,
                    "  File sizes: A={}, B={}",
                    format_bytes(*size_a),
                    format_bytes(*size_b)
                )?;
            }
        }
        writeln!(out)?;
        Ok(())
    }
}

/// `col="value", ...` for a dupkey tuple
fn join_pairs(names: &[String], values: &[String]) -> String {
    names
        .iter()
        .zip(values)
        .map(|(name, value)| format!("{}={:?}", name, value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Closing line of a scan, e.g. `Scanned 2 files, 10 rows. Mismatches: 1`
pub fn scan_summary(stats: &ScanStats, label: &str, count: usize) -> String {
    let mut summary = format!(
        "\nScanned {} files, {} rows. {}: {}",
        stats.files_scanned, stats.rows_seen, label, count
    );
    if stats.files_skipped > 0 {
        summary.push_str(&format!(" ({} skipped)", stats.files_skipped));
    }
    summary
}

/// Banner printed before an archive comparison
pub fn zip_banner(archive_a: &str, archive_b: &str) -> String {
    format!(
        "\n{rule}\nComparing ZIP archives\n{rule}\n\nArchive A: {}\nArchive B: {}\n",
        archive_a,
        archive_b,
        rule = RULE
    )
}

/// Totals of an archive comparison
pub fn zip_summary(summary: &ZipSummary) -> String {
    format!(
        "\n{rule}\nSummary\n{rule}\n\nIdentical files:  {}\nDifferent files:  {}\nOnly in A:        {}\nOnly in B:        {}\n",
        summary.identical,
        summary.different,
        summary.only_in_a,
        summary.only_in_b,
        rule = RULE
    )
}

const RULE: &str = "═══════════════════════════════════════════════════════════";

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format any serializable data as JSON
    pub fn format<T: serde::Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}

/// Format bytes in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
