//! Error types for dkit operations

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DkitError>;

#[derive(Error, Debug)]
pub enum DkitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "invalid condition {expression:?} \
         (expected COL=VAL, COL!=VAL, COL is empty, or COL not empty)"
    )]
    InvalidCondition { expression: String },

    #[error("empty condition in {expression:?}")]
    EmptyCondition { expression: String },

    #[error("invalid delimiter {token:?}: must be a single character or one of: tab, comma, pipe")]
    InvalidDelimiter { token: String },

    #[error("invalid index {reference:?}: with --no-header columns must be non-negative integers")]
    InvalidIndex { reference: String },

    #[error("header {name:?} not found")]
    HeaderNotFound { name: String },

    #[error("{} is empty", path.display())]
    EmptyFile { path: PathBuf },

    #[error("line {line}: {message}")]
    MalformedRow { line: u64, message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("{0:#}")]
    Generic(#[from] anyhow::Error),
}

impl DkitError {
    pub fn invalid_condition(expression: impl Into<String>) -> Self {
        Self::InvalidCondition {
            expression: expression.into(),
        }
    }

    pub fn empty_condition(expression: impl Into<String>) -> Self {
        Self::EmptyCondition {
            expression: expression.into(),
        }
    }

    pub fn invalid_delimiter(token: impl Into<String>) -> Self {
        Self::InvalidDelimiter {
            token: token.into(),
        }
    }

    pub fn invalid_index(reference: impl Into<String>) -> Self {
        Self::InvalidIndex {
            reference: reference.into(),
        }
    }

    pub fn header_not_found(name: impl Into<String>) -> Self {
        Self::HeaderNotFound { name: name.into() }
    }

    pub fn malformed_row(line: u64, message: impl Into<String>) -> Self {
        Self::MalformedRow {
            line,
            message: message.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }
}
