//! # dkit
//!
//! A toolkit for exploring delimiter-separated tabular files (CSV, TSV, PSV)
//! and ZIP archives: comparing columns, finding conflicting keys, listing
//! values and column names, locating files by content, rewriting delimiters
//! and diffing archive entries.
//!
//! Every column command runs on the same streaming [`scan::Scanner`], which
//! resolves columns and `--when` filters per file and feeds matching rows to a
//! [`scan::ScanDriver`].

pub mod archive;
pub mod cli;
pub mod columns;
pub mod commands;
pub mod compare;
pub mod config;
pub mod dupkey;
pub mod encoding;
pub mod error;
pub mod files;
pub mod filter;
pub mod lookup;
pub mod output;
pub mod progress;
pub mod reader;
pub mod resolver;
pub mod rewrite;
pub mod scan;
pub mod values;

pub use config::Config;
pub use error::{DkitError, Result};
pub use filter::Filter;
pub use reader::{DelimitedReader, Fields, Record};
pub use resolver::ColumnResolver;
