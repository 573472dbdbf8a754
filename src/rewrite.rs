//! Rewriting files with a different field delimiter (`fmt`)

use crate::config::Config;
use crate::error::{DkitError, Result};
use crate::reader::DelimitedReader;
use anyhow::Context;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Where rewritten records go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
    /// One `<stem><ext>` file per input inside `dir`
    Directory { dir: PathBuf, ext: String },
    InPlace,
}

impl Destination {
    /// Pick the destination from the `fmt` flags, rejecting combinations
    /// that make no sense for `inputs` files
    pub fn from_args(
        out: Option<PathBuf>,
        outdir: Option<PathBuf>,
        ext: Option<String>,
        inplace: bool,
        out_delimiter: u8,
        inputs: usize,
    ) -> Result<Self> {
        if out.is_some() && outdir.is_some() {
            return Err(DkitError::invalid_input("--out and --outdir are mutually exclusive"));
        }
        if inplace && (out.is_some() || outdir.is_some()) {
            return Err(DkitError::invalid_input(
                "--inplace cannot be used with --out or --outdir",
            ));
        }

        let destination = match (out, outdir) {
            _ if inplace => Self::InPlace,
            (Some(path), _) => Self::File(path),
            (None, Some(dir)) => Self::Directory {
                dir,
                ext: ext.unwrap_or_else(|| default_extension(out_delimiter).to_string()),
            },
            (None, None) => Self::Stdout,
        };

        if inputs > 1 && matches!(destination, Self::Stdout | Self::File(_)) {
            return Err(DkitError::invalid_input(
                "multiple inputs require --outdir or --inplace",
            ));
        }
        Ok(destination)
    }
}

fn default_extension(out_delimiter: u8) -> &'static str {
    if out_delimiter == b',' {
        ".csv"
    } else {
        ".txt"
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RewriteReport {
    /// Files written, in input order; empty when writing to stdout
    pub written: Vec<PathBuf>,
    pub records: u64,
}

/// Re-emit every record of `files` with `out_delimiter`.
///
/// Input is read with `config`. The first read or write failure aborts the
/// run.
pub fn rewrite_files(
    files: &[PathBuf],
    config: &Config,
    out_delimiter: u8,
    destination: &Destination,
    stdout: &mut dyn Write,
) -> Result<RewriteReport> {
    let mut report = RewriteReport::default();

    match destination {
        Destination::Stdout => {
            for path in files {
                report.records += write_records(path, config, out_delimiter, &mut *stdout)?;
            }
        }
        Destination::File(target) => {
            for path in files {
                let file = fs::File::create(target)
                    .with_context(|| format!("cannot create {}", target.display()))?;
                report.records += write_records(path, config, out_delimiter, BufWriter::new(file))?;
                report.written.push(target.clone());
            }
        }
        Destination::Directory { dir, ext } => {
            fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;
            for path in files {
                let target = output_path(dir, path, ext);
                let file = fs::File::create(&target)
                    .with_context(|| format!("cannot create {}", target.display()))?;
                report.records += write_records(path, config, out_delimiter, BufWriter::new(file))?;
                report.written.push(target);
            }
        }
        Destination::InPlace => {
            for path in files {
                report.records += rewrite_in_place(path, config, out_delimiter)?;
                report.written.push(path.clone());
            }
        }
    }

    Ok(report)
}

/// `<dir>/<stem of input><ext>`
fn output_path(dir: &Path, input: &Path, ext: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    dir.join(format!("{}{}", stem, ext))
}

/// Write into a temporary sibling, then move it over the original
fn rewrite_in_place(path: &Path, config: &Config, out_delimiter: u8) -> Result<u64> {
    let permissions = fs::metadata(path)
        .with_context(|| format!("cannot stat {}", path.display()))?
        .permissions();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut temp = tempfile::Builder::new()
        .prefix(&format!("{}.", prefix))
        .suffix(".dkit")
        .tempfile_in(dir)
        .with_context(|| format!("cannot create temporary file in {}", dir.display()))?;

    let records = write_records(path, config, out_delimiter, BufWriter::new(temp.as_file_mut()))?;
    temp.as_file()
        .sync_all()
        .with_context(|| format!("cannot flush {}", temp.path().display()))?;
    fs::set_permissions(temp.path(), permissions)
        .with_context(|| format!("cannot set permissions on {}", temp.path().display()))?;
    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("cannot replace {}", path.display()))?;

    Ok(records)
}

/// Write the decoded records of `path` to `sink` as UTF-8
fn write_records<W: Write>(
    path: &Path,
    config: &Config,
    out_delimiter: u8,
    sink: W,
) -> Result<u64> {
    let mut reader = DelimitedReader::open(path, config)
        .with_context(|| format!("cannot open {}", path.display()))?;
    let mut writer = WriterBuilder::new()
        .delimiter(out_delimiter)
        .flexible(true)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(sink);

    let mut records = 0u64;
    loop {
        let record = match reader.next_record() {
            Ok(Some(record)) => record,
            Ok(None) => break,
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("{}", path.display()))
                    .into())
            }
        };
        let fields: Vec<_> = record.iter().collect();
        writer.write_record(fields.iter().map(|field| field.as_bytes()))?;
        records += 1;
    }

    writer.flush()?;
    log::debug!("{}: rewrote {} records", path.display(), records);
    Ok(records)
}
