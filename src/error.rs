//! Error types for sgt.
//!
//! [SgtError] covers everything that can be reported back to the caller synchronously:
//! unreadable directories, rejected names, config failures.
//! Batch file operations never surface an [SgtError] directly; per-item failures are
//! collected into a [crate::core::ops::BatchReport] instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for sgt.
#[derive(Debug, Error)]
pub enum SgtError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The directory itself could not be enumerated.
    #[error("Cannot read directory {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{}' already exists", display_name(.0))]
    AlreadyExists(PathBuf),

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Name is unchanged")]
    Unchanged,

    #[error("Not found: {0:?}")]
    NotFound(PathBuf),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Failed to access config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = SgtError> = std::result::Result<T, E>;

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_exists_shows_file_name_only() {
        let err = SgtError::AlreadyExists(PathBuf::from("/tmp/some/dir/notes.txt"));
        assert_eq!(err.to_string(), "'notes.txt' already exists");
    }

    #[test]
    fn io_error_converts() {
        fn fails() -> Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "nope"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(SgtError::Io(_))));
    }
}
