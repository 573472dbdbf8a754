//! Column reference resolution

use crate::error::{DkitError, Result};

/// Resolves column references to field positions for one file.
///
/// With a header the reference is looked up by exact, case-sensitive
/// equality and the leftmost match wins. Without one it must be a
/// non-negative integer.
#[derive(Debug, Clone, Copy)]
pub struct ColumnResolver<'h> {
    header: Option<&'h [String]>,
}

impl<'h> ColumnResolver<'h> {
    /// Resolver for files read with `--no-header`
    pub fn positional() -> Self {
        Self { header: None }
    }

    /// Resolver for a file whose first row is `header`
    pub fn with_header(header: &'h [String]) -> Self {
        Self {
            header: Some(header),
        }
    }

    /// Resolve a single reference
    pub fn resolve(&self, reference: &str) -> Result<usize> {
        resolve_column(reference, self.header)
    }

    /// Resolve references in order, failing on the first one that does not
    /// resolve
    pub fn resolve_all<S: AsRef<str>>(&self, references: &[S]) -> Result<Vec<usize>> {
        references
            .iter()
            .map(|reference| self.resolve(reference.as_ref()))
            .collect()
    }
}

/// Resolve `reference` against an optional header row
pub fn resolve_column(reference: &str, header: Option<&[String]>) -> Result<usize> {
    match header {
        None => parse_index(reference),
        Some(header) => header
            .iter()
            .position(|name| name == reference)
            .ok_or_else(|| DkitError::header_not_found(reference)),
    }
}

/// Parse a positional column reference
pub fn parse_index(reference: &str) -> Result<usize> {
    reference
        .parse::<usize>()
        .map_err(|_| DkitError::invalid_index(reference))
}
