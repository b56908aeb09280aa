//! File operations for sgt: copy, move, delete, rename and create.
//!
//! Batch operations ([transfer], [delete]) work item by item. A failing item is recorded in
//! the [BatchReport] and the loop carries on with the next one; nothing is rolled back.
//!
//! Single-item operations ([rename], [create]) validate their input first and return an
//! [SgtError] without touching the filesystem when the name is rejected.

use crate::core::fm::EntryKind;
use crate::error::{Result, SgtError};
use crate::utils::{copy_recursive, get_unused_path};

use std::ffi::OsStr;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};

/// Decision for a single name collision during a paste.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Skip,
    Overwrite,
    Rename,
}

/// Asked once per colliding item while a batch runs.
///
/// `name` is the colliding file name, `dest` the existing destination path.
pub trait ConflictResolver {
    fn resolve(&mut self, name: &OsStr, dest: &Path) -> Resolution;
}

/// A fixed answer for every conflict.
impl ConflictResolver for Resolution {
    fn resolve(&mut self, _name: &OsStr, _dest: &Path) -> Resolution {
        *self
    }
}

impl<F> ConflictResolver for F
where
    F: FnMut(&OsStr, &Path) -> Resolution,
{
    fn resolve(&mut self, name: &OsStr, dest: &Path) -> Resolution {
        self(name, dest)
    }
}

/// Whether a paste copies or moves its sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Copy,
    Move,
}

/// Aggregated outcome of a batch operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    success_count: usize,
    error_count: usize,
    errors: Vec<String>,
}

impl BatchReport {
    // Accessors

    #[inline]
    pub fn success_count(&self) -> usize {
        self.success_count
    }

    #[inline]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    #[inline]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    fn record_success(&mut self) {
        self.success_count += 1;
    }

    fn record_error(&mut self, path: &Path, err: impl std::fmt::Display) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        tracing::warn!(path = %path.display(), error = %err, "file operation failed");
        self.error_count += 1;
        self.errors.push(format!("{name}: {err}"));
    }

    /// One-line summary, e.g. `Pasted 2, 1 error(s)` or `Successfully deleted 3 item(s)`.
    pub fn summary(&self, past_tense: &str) -> String {
        if self.has_errors() {
            let mut verb = past_tense.to_string();
            if let Some(first) = verb.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            format!("{verb} {}, {} error(s)", self.success_count, self.error_count)
        } else {
            format!("Successfully {past_tense} {} item(s)", self.success_count)
        }
    }
}

/// Copies or moves every source into `dest_dir`.
///
/// Sources that no longer exist are skipped without being counted. When the destination
/// name is taken, `resolver` decides for that item alone.
pub fn transfer<R: ConflictResolver + ?Sized>(
    sources: &[PathBuf],
    dest_dir: &Path,
    mode: TransferMode,
    resolver: &mut R,
) -> BatchReport {
    let mut report = BatchReport::default();

    for src in sources {
        let Ok(src_meta) = fs::symlink_metadata(src) else {
            continue;
        };
        let Some(name) = src.file_name() else {
            report.record_error(src, "invalid source path");
            continue;
        };

        if src_meta.is_dir() && dest_dir.starts_with(src) {
            report.record_error(src, "cannot paste a directory into itself");
            continue;
        }

        let mut target = dest_dir.join(name);
        if fs::symlink_metadata(&target).is_ok() {
            match resolver.resolve(name, &target) {
                Resolution::Skip => continue,
                Resolution::Rename => target = get_unused_path(&target),
                Resolution::Overwrite => {
                    if target == *src {
                        report.record_error(src, "source and destination are the same");
                        continue;
                    }
                    if src.starts_with(&target) {
                        report.record_error(src, "destination contains the source");
                        continue;
                    }
                    if let Err(e) = remove_path(&target) {
                        report.record_error(&target, e);
                        continue;
                    }
                }
            }
        }

        let res = match mode {
            TransferMode::Move => move_path(src, &target),
            TransferMode::Copy => copy_recursive(src, &target),
        };

        match res {
            Ok(()) => report.record_success(),
            Err(e) => report.record_error(src, e),
        }
    }

    tracing::info!(
        ?mode,
        dest = %dest_dir.display(),
        ok = report.success_count,
        failed = report.error_count,
        "transfer finished"
    );
    report
}

/// Removes every path recursively. A path that does not exist counts as a failure.
pub fn delete(paths: &[PathBuf]) -> BatchReport {
    let mut report = BatchReport::default();

    for path in paths {
        match remove_path(path) {
            Ok(()) => report.record_success(),
            Err(e) => report.record_error(path, e),
        }
    }

    tracing::info!(
        ok = report.success_count,
        failed = report.error_count,
        "delete finished"
    );
    report
}

/// Renames `old` to `new_name` within the same directory and returns the new path.
///
/// # Errors
/// Rejects empty, unchanged, or separator-containing names, and names that collide with an
/// existing path. The filesystem is not touched in those cases.
pub fn rename(old: &Path, new_name: &str) -> Result<PathBuf> {
    let new_name = new_name.trim();
    validate_name(new_name)?;

    if old.file_name() == Some(OsStr::new(new_name)) {
        return Err(SgtError::Unchanged);
    }

    let target = old.with_file_name(new_name);
    if fs::symlink_metadata(&target).is_ok() {
        return Err(SgtError::AlreadyExists(target));
    }

    fs::rename(old, &target)?;
    tracing::info!(from = %old.display(), to = %target.display(), "renamed");
    Ok(target)
}

/// Creates an empty file or directory named `name` inside `dir` and returns its path.
///
/// # Errors
/// Rejects empty names, names containing a path separator, and names that already exist.
pub fn create(kind: EntryKind, name: &str, dir: &Path) -> Result<PathBuf> {
    let name = name.trim();
    validate_name(name)?;

    let target = dir.join(name);
    if fs::symlink_metadata(&target).is_ok() {
        return Err(SgtError::AlreadyExists(target));
    }

    match kind {
        EntryKind::Directory => fs::create_dir_all(&target)?,
        EntryKind::File => {
            OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&target)?;
        }
    }

    tracing::info!(path = %target.display(), ?kind, "created");
    Ok(target)
}

/// Removes a file, symlink, or directory tree.
fn remove_path(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Renames when possible, otherwise copies and removes the source.
fn move_path(src: &Path, dest: &Path) -> io::Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            copy_recursive(src, dest)?;
            remove_path(src)
        }
        Err(e) => Err(e),
    }
}

/// Checks a user supplied name: a single plain path component.
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SgtError::EmptyName);
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', MAIN_SEPARATOR]) => Ok(()),
        _ => Err(SgtError::InvalidName(name.to_string())),
    }
}
