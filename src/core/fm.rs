//! Entry and metadata types used throughout sgt.
//!
//! [Entry] is one row of a directory listing. [FileMetadata] is what the stat cache stores
//! per path. Owner and permission strings are left empty until a listing asks for them.

use crate::core::formatter::{format_permissions, owner_label};

use std::ffi::{OsStr, OsString};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Name of the synthetic parent entry.
pub const PARENT_NAME: &str = "..";

/// Kind of a listed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// Metadata of a single path as returned by a stat call.
///
/// `owner` and `permissions` are only filled in by [FileMetadata::with_ownership].
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetadata {
    is_dir: bool,
    size: u64,
    modified: Option<SystemTime>,
    mode: u32,
    uid: u32,
    gid: u32,
    owner: Option<String>,
    permissions: Option<String>,
}

impl FileMetadata {
    pub fn new(is_dir: bool, size: u64, modified: Option<SystemTime>) -> Self {
        Self {
            is_dir,
            size,
            modified,
            mode: 0,
            uid: 0,
            gid: 0,
            owner: None,
            permissions: None,
        }
    }

    /// Builds metadata from a std [Metadata], keeping the raw mode and owner ids so the
    /// labels can be resolved later without another stat call.
    pub fn from_std(md: &Metadata) -> Self {
        let mut meta = Self::new(md.is_dir(), md.len(), md.modified().ok());

        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            meta.mode = md.mode();
            meta.uid = md.uid();
            meta.gid = md.gid();
        }

        meta
    }

    /// Returns a copy with owner and permission labels resolved.
    pub fn with_ownership(&self) -> Self {
        let mut meta = self.clone();
        meta.owner = Some(owner_label(self.uid, self.gid));
        meta.permissions = Some(format_permissions(self.mode, self.is_dir));
        meta
    }

    // Accessors

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    #[inline]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    #[inline]
    pub fn permissions(&self) -> Option<&str> {
        self.permissions.as_deref()
    }
}

/// One listed filesystem object, or the synthetic `..` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    name: OsString,
    lowercase_name: String,
    kind: EntryKind,
    path: PathBuf,
    metadata: Option<FileMetadata>,
}

impl Entry {
    pub fn new(name: OsString, path: PathBuf, metadata: FileMetadata) -> Self {
        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        let lowercase_name = name.to_string_lossy().to_lowercase();
        Self {
            name,
            lowercase_name,
            kind,
            path,
            metadata: Some(metadata),
        }
    }

    /// The `..` entry pointing at `parent`. Carries no metadata.
    pub fn parent(parent: &Path) -> Self {
        Self {
            name: OsString::from(PARENT_NAME),
            lowercase_name: PARENT_NAME.to_string(),
            kind: EntryKind::Directory,
            path: parent.to_path_buf(),
            metadata: None,
        }
    }

    // Accessors

    #[inline]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    #[inline]
    pub fn name_str(&self) -> std::borrow::Cow<'_, str> {
        self.name.to_string_lossy()
    }

    #[inline]
    pub fn lowercase_name(&self) -> &str {
        &self.lowercase_name
    }

    #[inline]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn metadata(&self) -> Option<&FileMetadata> {
        self.metadata.as_ref()
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    #[inline]
    pub fn is_parent(&self) -> bool {
        self.metadata.is_none() && self.name == PARENT_NAME
    }
}
