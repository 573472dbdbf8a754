//! Command implementations for dkit CLI

use crate::archive::{compare_zips, ZipCompareOptions};
use crate::cli::{CmpCommands, ColCommands, Commands, FilesCommands, GlobalOptions, OutputFormat};
use crate::columns::list_columns;
use crate::compare::{ColumnComparator, CompareOptions};
use crate::config::{delimiter_byte, parse_delimiter, Config};
use crate::dupkey::{parse_by_list, DupKeyDetector, DupKeyOptions};
use crate::error::{DkitError, Result};
use crate::files::expand_files;
use crate::filter::Filter;
use crate::lookup::{FirstValueFinder, ValueMatcher};
use crate::output::{scan_summary, zip_banner, zip_summary, JsonFormatter, PrettyPrinter};
use crate::rewrite::{rewrite_files, Destination};
use crate::scan::Scanner;
use crate::values::{FixedWidth, ValuesCollector, ValuesMode};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// How a command finished, for the process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The command ran and found what it reports on: mismatches, conflicts,
    /// missing hits or archive differences
    Findings,
}

impl Outcome {
    fn from_findings(found: bool) -> Self {
        if found {
            Self::Findings
        } else {
            Self::Success
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Findings => 2,
        }
    }
}

/// Execute a command, writing results to stdout
pub fn execute_command(command: Commands, options: &GlobalOptions) -> Result<Outcome> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = execute_command_with_output(command, options, &mut out)?;
    out.flush()?;
    Ok(outcome)
}

/// Execute a command, writing results to `out`
pub fn execute_command_with_output(
    command: Commands,
    options: &GlobalOptions,
    out: &mut dyn Write,
) -> Result<Outcome> {
    let stderr = io::stderr();
    execute_command_with_streams(command, options, out, &mut stderr.lock())
}

/// Execute a command, writing results to `out` and summaries and notices to
/// `err`
pub fn execute_command_with_streams(
    command: Commands,
    options: &GlobalOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<Outcome> {
    let config = Config::from_options(options)?;
    let format = options.format;

    match command {
        Commands::Col { command } => match command {
            ColCommands::Cmp {
                a,
                b,
                files,
                ignore_case,
                allow_empty,
                when,
            } => {
                let mut compare = CompareOptions::new(a, b);
                compare.ignore_case = ignore_case;
                compare.allow_empty = allow_empty;
                compare.quiet = config.quiet;
                col_cmp_command(&config, format, compare, &files, &when, out, err)
            }
            ColCommands::Vals {
                mode,
                column,
                files,
                null_token,
                fixed_width,
                when,
            } => col_vals_command(
                &config,
                format,
                mode,
                &column,
                &files,
                &null_token,
                fixed_width.as_deref(),
                &when,
                out,
                err,
            ),
            ColCommands::First { column, files, when } => {
                col_first_command(&config, format, &column, &files, &when, out, err)
            }
            ColCommands::Dupkey {
                key,
                files,
                by,
                ignore_case,
                require_all,
                null_token,
                when,
            } => {
                let by = parse_by_list(&by);
                if by.is_empty() {
                    return Err(DkitError::invalid_input("--by must name at least one column"));
                }
                let mut dupkey = DupKeyOptions::new(key, by);
                dupkey.ignore_case = ignore_case;
                dupkey.require_all = require_all;
                dupkey.null_token = null_token;
                col_dupkey_command(&config, format, dupkey, &files, &when, out, err)
            }
            ColCommands::List {
                files,
                sorted,
                oneline,
                outdelim,
            } => col_list_command(&config, format, &files, sorted, oneline, &outdelim, out),
        },
        Commands::Files { command } => match command {
            FilesCommands::With {
                column,
                value,
                files,
                case_insensitive,
                when,
            } => files_with_command(
                &config,
                format,
                &column,
                &value,
                case_insensitive,
                &files,
                &when,
                out,
                err,
            ),
        },
        Commands::Fmt {
            in_delim,
            out_delim,
            out: out_path,
            outdir,
            ext,
            inplace,
            files,
        } => {
            let in_delimiter = delimiter_byte(&in_delim)?;
            let out_delimiter = delimiter_byte(&out_delim)?;
            let files = expand_files(&files)?;
            let destination =
                Destination::from_args(out_path, outdir, ext, inplace, out_delimiter, files.len())?;
            fmt_command(
                &config.with_delimiter(in_delimiter),
                format,
                &files,
                out_delimiter,
                &destination,
                out,
                err,
            )
        }
        Commands::Cmp { command } => match command {
            CmpCommands::Zips {
                a,
                b,
                summary_only,
                ignore_missing,
            } => {
                let options = ZipCompareOptions {
                    previews: !summary_only && !config.quiet,
                    quiet: config.quiet,
                };
                cmp_zips_command(&config, format, &a, &b, options, ignore_missing, out, err)
            }
        },
    }
}

/// Write `report` as JSON, or hand it to the pretty printer
fn emit<T, F>(format: OutputFormat, report: &T, out: &mut dyn Write, pretty: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T, &mut dyn Write) -> Result<()>,
{
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", JsonFormatter::format(report)?)?;
            Ok(())
        }
        OutputFormat::Pretty => pretty(report, out),
    }
}

/// Compare two columns row by row
fn col_cmp_command(
    config: &Config,
    format: OutputFormat,
    options: CompareOptions,
    files: &[PathBuf],
    when: &[String],
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<Outcome> {
    let filter = Filter::parse_all(when)?;
    let files = expand_files(files)?;

    let mut comparator = ColumnComparator::new(options);
    let stats = Scanner::new(config, &filter).run(&files, &mut comparator)?;
    let report = comparator.into_report(stats);

    emit(format, &report, out, PrettyPrinter::print_compare)?;
    writeln!(err, "{}", scan_summary(&report.stats, "Mismatches", report.mismatches as usize))?;

    Ok(Outcome::from_findings(report.mismatches > 0))
}

/// Distinct values or frequencies of one column
#[allow(clippy::too_many_arguments)]
fn col_vals_command(
    config: &Config,
    format: OutputFormat,
    mode: ValuesMode,
    column: &str,
    files: &[PathBuf],
    null_token: &str,
    fixed_width: Option<&str>,
    when: &[String],
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<Outcome> {
    let filter = Filter::parse_all(when)?;
    let fixed_width = fixed_width.map(str::parse::<FixedWidth>).transpose()?;
    if fixed_width.is_some() && !filter.is_empty() {
        return Err(DkitError::invalid_input("--when cannot be combined with --fixed-width"));
    }
    let files = expand_files(files)?;

    let mut collector = ValuesCollector::new(column, mode).with_null_token(null_token);
    let stats = match fixed_width {
        Some(range) => collector.scan_fixed_width(&files, range, config),
        None => Scanner::new(config, &filter).run(&files, &mut collector)?,
    };
    let report = collector.into_report(stats);

    emit(format, &report, out, PrettyPrinter::print_values)?;
    writeln!(err, "{}", scan_summary(&report.stats, "Distinct values", report.values.len()))?;

    Ok(Outcome::Success)
}

/// First non-empty value of a column per file
fn col_first_command(
    config: &Config,
    format: OutputFormat,
    column: &str,
    files: &[PathBuf],
    when: &[String],
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<Outcome> {
    let filter = Filter::parse_all(when)?;
    let files = expand_files(files)?;

    let mut finder = FirstValueFinder::new(column);
    let stats = Scanner::new(config, &filter).run(&files, &mut finder)?;
    let report = finder.into_report(stats);

    emit(format, &report, out, PrettyPrinter::print_hits)?;
    let found = report.hits.len();
    writeln!(err, "{}", scan_summary(&report.stats, "Files with a value", found))?;

    Ok(Outcome::from_findings(!report.has_hits()))
}

/// Keys mapping to several distinct tuples
fn col_dupkey_command(
    config: &Config,
    format: OutputFormat,
    options: DupKeyOptions,
    files: &[PathBuf],
    when: &[String],
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<Outcome> {
    let filter = Filter::parse_all(when)?;
    let files = expand_files(files)?;

    let mut detector = DupKeyDetector::new(options);
    let stats = Scanner::new(config, &filter).run(&files, &mut detector)?;
    let report = detector.into_report(stats);

    if !config.quiet || format == OutputFormat::Json {
        emit(format, &report, out, PrettyPrinter::print_dupkey)?;
    }
    let conflicts = report.conflicting_keys();
    writeln!(err, "{}", scan_summary(&report.stats, "Conflicting keys", conflicts))?;

    Ok(Outcome::from_findings(conflicts > 0))
}

/// Union of header rows
fn col_list_command(
    config: &Config,
    format: OutputFormat,
    files: &[PathBuf],
    sorted: bool,
    oneline: bool,
    outdelim: &str,
    out: &mut dyn Write,
) -> Result<Outcome> {
    let separator = if oneline {
        Some(parse_delimiter(outdelim)?)
    } else {
        None
    };
    let files = expand_files(files)?;

    let report = list_columns(&files, config, sorted);
    emit(format, &report, out, |report, out| {
        PrettyPrinter::print_columns(report, separator, out)
    })?;

    Ok(Outcome::Success)
}

/// Files where a column holds a value
#[allow(clippy::too_many_arguments)]
fn files_with_command(
    config: &Config,
    format: OutputFormat,
    column: &str,
    value: &str,
    case_insensitive: bool,
    files: &[PathBuf],
    when: &[String],
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<Outcome> {
    let filter = Filter::parse_all(when)?;
    let files = expand_files(files)?;

    let mut matcher = ValueMatcher::new(column, value, case_insensitive);
    let stats = Scanner::new(config, &filter).run(&files, &mut matcher)?;
    let report = matcher.into_report(stats);

    emit(format, &report, out, PrettyPrinter::print_hits)?;
    writeln!(err, "{}", scan_summary(&report.stats, "Matching files", report.hits.len()))?;

    Ok(Outcome::from_findings(!report.has_hits()))
}

/// Rewrite delimiters
fn fmt_command(
    config: &Config,
    format: OutputFormat,
    files: &[PathBuf],
    out_delimiter: u8,
    destination: &Destination,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<Outcome> {
    let report = rewrite_files(files, config, out_delimiter, destination, out)?;

    if !config.quiet {
        for path in &report.written {
            writeln!(err, "{}", path.display())?;
        }
    }
    if format == OutputFormat::Json && *destination != Destination::Stdout {
        writeln!(out, "{}", JsonFormatter::format(&report)?)?;
    }

    Ok(Outcome::Success)
}

/// Compare two ZIP archives
#[allow(clippy::too_many_arguments)]
fn cmp_zips_command(
    config: &Config,
    format: OutputFormat,
    a: &Path,
    b: &Path,
    options: ZipCompareOptions,
    ignore_missing: bool,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<Outcome> {
    if !config.quiet && format == OutputFormat::Pretty {
        writeln!(err, "{}", zip_banner(&file_name(a), &file_name(b)))?;
    }

    let report = compare_zips(a, b, options)?;

    if !config.quiet || format == OutputFormat::Json {
        emit(format, &report, out, PrettyPrinter::print_zip_report)?;
    }
    writeln!(err, "{}", zip_summary(&report.summary))?;

    Ok(Outcome::from_findings(report.has_differences(ignore_missing)))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
