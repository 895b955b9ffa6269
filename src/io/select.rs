//! Raw file discovery.
//!
//! A dataset is every regular file in the source directory whose *file name*
//! contains the dataset tag.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::FileOrder;
use crate::error::CompileError;

/// List files in `dir` whose name contains `tag`, ordered by `order`.
///
/// Returns an empty vector when nothing matches.
pub fn list_files(dir: &Path, tag: &str, order: FileOrder) -> Result<Vec<PathBuf>, CompileError> {
    let entries = fs::read_dir(dir).map_err(|e| CompileError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CompileError::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        let matches = path
            .file_name()
            .map(|name| name.to_string_lossy().contains(tag))
            .unwrap_or(false);
        if matches {
            files.push(path);
        }
    }

    if order == FileOrder::Period {
        sort_by_period(&mut files);
    }

    tracing::debug!(dir = %dir.display(), tag, matched = files.len(), "listed raw files");
    Ok(files)
}

fn sort_by_period(files: &mut [PathBuf]) {
    files.sort_by_cached_key(|path| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let token = period_token(&name);
        if token.is_none() {
            tracing::warn!(file = %name, "no year token in file name; ordering it last");
        }
        // `None` sorts before `Some`, so flip it to push untagged files last.
        (token.is_none(), token, name)
    });
}

/// First run of exactly four ASCII digits in `name`, read as a year.
pub fn period_token(name: &str) -> Option<u32> {
    let bytes = name.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i - start == 4 {
            return name[start..i].parse().ok();
        }
    }
    None
}
