//! Runtime options shared by every command

use crate::cli::GlobalOptions;
use crate::encoding::TextEncoding;
use crate::error::{DkitError, Result};

/// Options for reading and processing tabular data.
///
/// Built once per invocation and passed by reference; nothing in the crate
/// keeps its own copy of these settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Field delimiter as a single ASCII byte
    pub delimiter: u8,
    pub encoding: TextEncoding,
    /// Treat the first row as data and address columns by index
    pub no_header: bool,
    pub quiet: bool,
    /// Accept bare quotes inside fields
    pub lazy_quotes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: b',',
            encoding: TextEncoding::Utf8,
            no_header: false,
            quiet: false,
            lazy_quotes: false,
        }
    }
}

impl Config {
    /// Build the configuration from parsed global options
    pub fn from_options(options: &GlobalOptions) -> Result<Self> {
        Ok(Self {
            delimiter: delimiter_byte(&options.delim)?,
            encoding: TextEncoding::from_name(&options.encoding),
            no_header: options.no_header,
            quiet: options.quiet,
            lazy_quotes: options.lazy_quotes,
        })
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_no_header(mut self, no_header: bool) -> Self {
        self.no_header = no_header;
        self
    }
}

/// Parse a delimiter token into a character.
///
/// Accepts the names `comma`, `tab` and `pipe`, the escape `\t`, or any
/// single character. The empty string means comma.
pub fn parse_delimiter(token: &str) -> Result<char> {
    match token {
        "" | "," | "comma" => return Ok(','),
        "\\t" | "\t" | "tab" => return Ok('\t'),
        "|" | "pipe" => return Ok('|'),
        _ => {}
    }

    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(DkitError::invalid_delimiter(token)),
    }
}

/// Parse a delimiter token that will be handed to the CSV parser or writer,
/// which only accept single-byte delimiters.
pub fn delimiter_byte(token: &str) -> Result<u8> {
    let c = parse_delimiter(token)?;
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(DkitError::invalid_delimiter(token))
    }
}
