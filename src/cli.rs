//! Command-line interface for dkit

use crate::values::{ValuesMode, DEFAULT_NULL_TOKEN};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dkit")]
#[command(about = "A toolkit for exploring delimited tabular data and ZIP archives")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Options accepted by every command
#[derive(Args, Debug, Clone)]
pub struct GlobalOptions {
    /// Field delimiter: a single character, or one of tab, comma, pipe
    #[arg(short = 'd', long, global = true, default_value = ",")]
    pub delim: String,

    /// Input text encoding (utf-8, utf-8-sig, latin1, iso-8859-1)
    #[arg(short = 'e', long, global = true, default_value = "utf-8-sig")]
    pub encoding: String,

    /// Treat the first row as data and address columns by 0-based index
    #[arg(short = 'H', long, global = true)]
    pub no_header: bool,

    /// Suppress details, progress and informational messages
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Accept stray quotes inside fields
    #[arg(long, global = true)]
    pub lazy_quotes: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format: "pretty", "json"
    #[arg(long, global = true, default_value = "pretty", value_parser = OutputFormat::parse)]
    pub format: OutputFormat,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            delim: ",".to_string(),
            encoding: "utf-8-sig".to_string(),
            no_header: false,
            quiet: false,
            lazy_quotes: false,
            verbose: false,
            format: OutputFormat::Pretty,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect and compare columns
    Col {
        #[command(subcommand)]
        command: ColCommands,
    },

    /// Find files by their contents
    Files {
        #[command(subcommand)]
        command: FilesCommands,
    },

    /// Rewrite files with a different delimiter
    Fmt {
        /// Input field delimiter
        #[arg(long)]
        in_delim: String,

        /// Output field delimiter
        #[arg(long)]
        out_delim: String,

        /// Write to a single output file (requires exactly one input)
        #[arg(short = 'o', long)]
        out: Option<PathBuf>,

        /// Write each input to this directory
        #[arg(long)]
        outdir: Option<PathBuf>,

        /// Extension for files written to --outdir (default .csv or .txt)
        #[arg(long)]
        ext: Option<String>,

        /// Rewrite the inputs in place
        #[arg(short = 'i', long)]
        inplace: bool,

        /// Input files or directories
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Compare containers
    Cmp {
        #[command(subcommand)]
        command: CmpCommands,
    },
}

#[derive(Subcommand)]
pub enum ColCommands {
    /// Report rows where two columns differ
    Cmp {
        /// First column (name, or index with --no-header)
        a: String,

        /// Second column
        b: String,

        /// Input files or directories
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Compare case-insensitively
        #[arg(long)]
        ignore_case: bool,

        /// Also compare rows where either side is empty
        #[arg(long)]
        allow_empty: bool,

        /// Row filter (COL=VAL, COL!=VAL, COL is empty, COL not empty); `|`
        /// separates alternatives, repeat to require several
        #[arg(long)]
        when: Vec<String>,
    },

    /// List the distinct values of a column, or their frequencies
    Vals {
        /// "uniq" or "freq"
        #[arg(value_parser = ValuesMode::parse)]
        mode: ValuesMode,

        /// Column name, or index with --no-header
        column: String,

        /// Input files or directories
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Value recorded for empty fields; empty to keep them as-is
        #[arg(long, default_value = DEFAULT_NULL_TOKEN)]
        null_token: String,

        /// Read characters START:END (1-based, inclusive) of each line instead
        /// of a delimited column
        #[arg(long)]
        fixed_width: Option<String>,

        /// Row filter, see `col cmp --help`
        #[arg(long)]
        when: Vec<String>,
    },

    /// Print the first non-empty value of a column in each file
    First {
        /// Column name, or index with --no-header
        column: String,

        /// Input files or directories
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Row filter, see `col cmp --help`
        #[arg(long)]
        when: Vec<String>,
    },

    /// Find keys that map to more than one combination of other columns
    Dupkey {
        /// Key column
        key: String,

        /// Input files or directories
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Comma-separated columns forming the tuple checked per key
        #[arg(long, required = true)]
        by: String,

        /// Fold case of key and tuple values
        #[arg(long)]
        ignore_case: bool,

        /// Skip rows where any --by column is empty
        #[arg(long)]
        require_all: bool,

        /// Value used for empty --by columns
        #[arg(long, default_value = DEFAULT_NULL_TOKEN)]
        null_token: String,

        /// Row filter, see `col cmp --help`
        #[arg(long)]
        when: Vec<String>,
    },

    /// List the column names found across files
    List {
        /// Input files or directories
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Sort names instead of keeping first-seen order
        #[arg(long)]
        sorted: bool,

        /// Print all names on one line
        #[arg(long)]
        oneline: bool,

        /// Separator for --oneline
        #[arg(short = 'o', long, default_value = ",")]
        outdelim: String,
    },
}

#[derive(Subcommand)]
pub enum FilesCommands {
    /// Print the files where a column holds a value
    With {
        /// Column name, or index with --no-header
        column: String,

        /// Value to look for
        value: String,

        /// Input files or directories
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Match the value case-insensitively
        #[arg(long)]
        case_insensitive: bool,

        /// Row filter, see `col cmp --help`
        #[arg(long)]
        when: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum CmpCommands {
    /// Compare the entries of two ZIP archives
    Zips {
        /// First archive
        a: PathBuf,

        /// Second archive
        b: PathBuf,

        /// Skip line previews of differing entries
        #[arg(short, long)]
        summary_only: bool,

        /// Do not treat entries missing on one side as a difference
        #[arg(long)]
        ignore_missing: bool,
    },
}

/// Parse output format string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}. Use 'pretty' or 'json'", s)),
        }
    }
}
