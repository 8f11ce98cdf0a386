//! Filesystem sink
//!
//! Creates run directories and persists run artifacts. All writes overwrite
//! whatever is already at the target path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

/// Default maximum length of a sanitized run name
pub const DEFAULT_MAX_NAME_LEN: usize = 100;

/// Reduces a run name to a filesystem-safe component
///
/// Keeps ASCII letters, digits, spaces, `-` and `_`, trims the ends, turns
/// inner spaces into underscores and cuts the result at `max_len`.
pub fn sanitize_name(raw: &str, max_len: usize) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();

    kept.trim().replace(' ', "_").chars().take(max_len).collect()
}

/// Directory name of a run: `{run_id}_{sanitized name}`
pub fn run_dir_name(run_id: u64, run_name: &str) -> String {
    format!("{}_{}", run_id, sanitize_name(run_name, DEFAULT_MAX_NAME_LEN))
}

/// Creates (or reuses) the directory of a run under `base_dir`
pub fn create_run_directory(base_dir: &Path, run_id: u64, run_name: &str) -> Result<PathBuf> {
    let dir = base_dir.join(run_dir_name(run_id, run_name));
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create run directory {:?}", dir))?;
    Ok(dir)
}

/// Writes `value` as pretty-printed JSON
pub fn write_structured<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)
        .with_context(|| format!("Failed to serialize {:?}", path))?;
    fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))
}

pub fn write_text(text: &str, path: &Path) -> Result<()> {
    fs::write(path, text).with_context(|| format!("Failed to write {:?}", path))
}

pub fn write_binary(bytes: &[u8], path: &Path) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("Failed to write {:?}", path))
}

/// Removes a file left by an earlier export; a missing file is not an error
pub fn remove_file_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {:?}", path)),
    }
}

/// Recursively copies the contents of `src` into `dst`
///
/// `dst` is created if needed. Files already in `dst` are overwritten by
/// files with the same relative path; other files in `dst` are left alone.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).with_context(|| format!("Failed to create {:?}", dst))?;

    let entries = fs::read_dir(src).with_context(|| format!("Failed to read {:?}", src))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {:?}", src))?;
        let source = entry.path();
        let target = dst.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copy_tree(&source, &target)?;
        } else {
            fs::copy(&source, &target)
                .with_context(|| format!("Failed to copy {:?} to {:?}", source, target))?;
        }
    }

    Ok(())
}
