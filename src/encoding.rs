//! Text encodings accepted for input files
//!
//! Files are parsed as bytes; each field is turned into text only when it is
//! read, with the encoding the file was declared in.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// How input bytes are turned into text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8, with or without a byte-order mark
    Utf8,
    /// ISO-8859-1: every byte is its own code point
    Latin1,
    /// Unknown name; bytes are read as UTF-8, lossily
    Raw(String),
}

impl TextEncoding {
    /// Map an encoding name to a strategy. Never fails: unknown names fall
    /// back to raw bytes.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "" | "utf-8" | "utf8" | "utf-8-sig" => Self::Utf8,
            "latin1" | "iso-8859-1" => Self::Latin1,
            other => {
                log::debug!("Unrecognized encoding {:?}, reading raw bytes", other);
                Self::Raw(other.to_string())
            }
        }
    }

    /// Text of one field or line. Borrows when the bytes are already valid
    /// UTF-8 text in this encoding.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        match self {
            Self::Latin1 => encoding_rs::mem::decode_latin1(bytes),
            Self::Utf8 | Self::Raw(_) => String::from_utf8_lossy(bytes),
        }
    }
}

/// Open `path` for reading, past any byte-order mark `encoding` allows.
///
/// The returned reader owns the file handle, so dropping it closes the file.
pub fn open_with_encoding(path: &Path, encoding: &TextEncoding) -> io::Result<Box<dyn Read>> {
    let file = File::open(path)?;
    Ok(Box::new(skip_bom(BufReader::new(file), encoding)?))
}

/// Consume a leading UTF-8 byte-order mark, except for Latin-1 input where
/// those bytes are text.
pub fn skip_bom<R: BufRead>(mut reader: R, encoding: &TextEncoding) -> io::Result<R> {
    if *encoding != TextEncoding::Latin1 && reader.fill_buf()?.starts_with(UTF8_BOM) {
        reader.consume(UTF8_BOM.len());
    }
    Ok(reader)
}
