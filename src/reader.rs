//! Streaming reader for delimiter-separated files
//!
//! [`DelimitedReader`] hands out one [`Record`] at a time. A record borrows
//! the reader's internal buffer, so it is only valid until the next call to
//! [`DelimitedReader::next_record`]; anything that must outlive the row has
//! to be copied out first.

use crate::config::Config;
use crate::encoding::{open_with_encoding, TextEncoding};
use crate::error::{DkitError, Result};
use csv::{ByteRecord, ReaderBuilder};
use std::borrow::Cow;
use std::cell::RefCell;
use std::io::Read;
use std::path::Path;
use std::rc::Rc;

/// Positional access to the fields of a row
pub trait Fields {
    /// Raw field at `index`, or `None` past the end of the row
    fn field(&self, index: usize) -> Option<Cow<'_, str>>;

    /// Field at `index` with surrounding whitespace removed. Indices past the
    /// end of the row read as the empty string.
    fn value(&self, index: usize) -> Cow<'_, str> {
        match self.field(index) {
            Some(Cow::Borrowed(s)) => Cow::Borrowed(s.trim()),
            Some(Cow::Owned(s)) => Cow::Owned(s.trim().to_string()),
            None => Cow::Borrowed(""),
        }
    }
}

impl<S: AsRef<str>> Fields for [S] {
    fn field(&self, index: usize) -> Option<Cow<'_, str>> {
        self.get(index).map(|s| Cow::Borrowed(s.as_ref()))
    }
}

impl<S: AsRef<str>> Fields for Vec<S> {
    fn field(&self, index: usize) -> Option<Cow<'_, str>> {
        self.as_slice().field(index)
    }
}

/// One row, borrowed from the reader that produced it
#[derive(Debug, Clone, Copy)]
pub struct Record<'r> {
    inner: &'r ByteRecord,
    encoding: &'r TextEncoding,
}

impl<'r> Record<'r> {
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Field at `index`, decoded with the file's encoding
    pub fn get(&self, index: usize) -> Option<Cow<'r, str>> {
        let encoding = self.encoding;
        self.inner.get(index).map(|field| encoding.decode(field))
    }

    /// Every field, decoded
    pub fn iter(&self) -> impl Iterator<Item = Cow<'r, str>> + 'r {
        let encoding = self.encoding;
        self.inner.iter().map(move |field| encoding.decode(field))
    }

    /// Line the row starts on (1-based)
    pub fn line(&self) -> u64 {
        self.inner.position().map_or(0, |p| p.line())
    }

    /// Copy every field out of the reader's buffer
    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(Cow::into_owned).collect()
    }
}

impl Fields for Record<'_> {
    fn field(&self, index: usize) -> Option<Cow<'_, str>> {
        self.get(index)
    }
}

/// Bytes the parser has pulled from the stream but not yet checked
#[derive(Debug, Default)]
struct RawTap {
    buf: Vec<u8>,
    base: u64,
}

/// Copies everything read through it into a shared [`RawTap`]
struct TapReader {
    inner: Box<dyn Read>,
    tap: Rc<RefCell<RawTap>>,
}

impl Read for TapReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.tap.borrow_mut().buf.extend_from_slice(&buf[..n]);
        Ok(n)
    }
}

/// Reads records from a delimited text stream
pub struct DelimitedReader {
    inner: csv::Reader<Box<dyn Read>>,
    record: ByteRecord,
    delimiter: u8,
    encoding: TextEncoding,
    /// Present in strict quoting mode
    tap: Option<Rc<RefCell<RawTap>>>,
}

impl DelimitedReader {
    /// Open `path` with the encoding, delimiter and quoting rules in `config`
    pub fn open(path: &Path, config: &Config) -> Result<Self> {
        let source = open_with_encoding(path, &config.encoding)?;
        Ok(Self::from_reader(source, config))
    }

    /// Read records from an already opened stream; fields are decoded with
    /// `config.encoding`
    pub fn from_reader(source: Box<dyn Read>, config: &Config) -> Self {
        // The CSV parser itself always treats stray quotes literally, so strict
        // mode re-checks the raw bytes of each record.
        let (source, tap): (Box<dyn Read>, _) = if config.lazy_quotes {
            (source, None)
        } else {
            let tap = Rc::new(RefCell::new(RawTap::default()));
            let reader = TapReader {
                inner: source,
                tap: Rc::clone(&tap),
            };
            (Box::new(reader), Some(tap))
        };

        let inner = ReaderBuilder::new()
            .delimiter(config.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(source);

        Self {
            inner,
            record: ByteRecord::new(),
            delimiter: config.delimiter,
            encoding: config.encoding.clone(),
            tap,
        }
    }

    /// Read the next record.
    ///
    /// Returns `Ok(None)` at a clean end of input and an error when the row
    /// cannot be parsed.
    pub fn next_record(&mut self) -> Result<Option<Record<'_>>> {
        if !self.inner.read_byte_record(&mut self.record)? {
            return Ok(None);
        }
        if let Some(tap) = &self.tap {
            self.check_quotes(tap)?;
        }
        Ok(Some(Record {
            inner: &self.record,
            encoding: &self.encoding,
        }))
    }

    /// Read the next record as an owned header row
    pub fn read_header(&mut self) -> Result<Option<Vec<String>>> {
        Ok(self.next_record()?.map(|record| record.to_vec()))
    }

    fn check_quotes(&self, tap: &RefCell<RawTap>) -> Result<()> {
        let end = self.inner.position().byte();
        let mut tap = tap.borrow_mut();
        let consumed = usize::try_from(end.saturating_sub(tap.base))
            .unwrap_or(usize::MAX)
            .min(tap.buf.len());

        let fault = find_quote_fault(trim_terminators(&tap.buf[..consumed]), self.delimiter);
        tap.buf.drain(..consumed);
        tap.base += consumed as u64;

        match fault {
            Some(message) => {
                let line = self.record.position().map_or(0, |p| p.line());
                Err(DkitError::malformed_row(line, message))
            }
            None => Ok(()),
        }
    }
}

fn trim_terminators(raw: &[u8]) -> &[u8] {
    let is_terminator = |b: &u8| matches!(b, b'\r' | b'\n');
    let start = raw.iter().position(|b| !is_terminator(b)).unwrap_or(raw.len());
    let end = raw
        .iter()
        .rposition(|b| !is_terminator(b))
        .map_or(start, |p| p + 1);
    &raw[start..end]
}

/// Check one raw record against strict quoting rules
fn find_quote_fault(raw: &[u8], delimiter: u8) -> Option<&'static str> {
    const BARE_QUOTE: &str = "bare \" in non-quoted field";
    const BAD_QUOTE: &str = "extraneous or missing \" in quoted field";

    let n = raw.len();
    let mut i = 0;
    loop {
        if i < n && raw[i] == b'"' {
            i += 1;
            loop {
                let Some(p) = raw[i..].iter().position(|&b| b == b'"') else {
                    return Some(BAD_QUOTE);
                };
                i += p + 1;
                if i < n && raw[i] == b'"' {
                    i += 1;
                    continue;
                }
                if i == n {
                    return None;
                }
                if raw[i] == delimiter {
                    i += 1;
                    break;
                }
                return Some(BAD_QUOTE);
            }
        } else {
            let end = raw[i..]
                .iter()
                .position(|&b| b == delimiter)
                .map_or(n, |p| i + p);
            if raw[i..end].contains(&b'"') {
                return Some(BARE_QUOTE);
            }
            if end == n {
                return None;
            }
            i = end + 1;
        }
    }
}
