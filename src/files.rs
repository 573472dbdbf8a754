//! Expansion of file arguments into the list of inputs to read

use crate::error::{DkitError, Result};
use indexmap::IndexSet;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Expand command-line file arguments.
///
/// A directory contributes every regular file beneath it, sorted by name.
/// Other arguments are kept as given, so a missing file surfaces later as a
/// per-file warning. Duplicates are dropped, keeping the first occurrence.
pub fn expand_files(arguments: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if arguments.is_empty() {
        return Err(DkitError::invalid_input("no files"));
    }

    let mut files = IndexSet::new();
    for argument in arguments {
        if argument.is_dir() {
            for entry in WalkDir::new(argument).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() {
                    files.insert(entry.into_path());
                }
            }
        } else {
            files.insert(argument.clone());
        }
    }

    log::debug!("Expanded {} arguments to {} files", arguments.len(), files.len());
    Ok(files.into_iter().collect())
}
