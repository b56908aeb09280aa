//! Core engine of sgt.
//!
//! This module contains the non-UI pieces used by the application:
//! - [fm]: entry and metadata types (see [Entry], [FileMetadata]).
//! - [cache]: the time and size bounded [StatCache].
//! - [lister]: directory listing, sorting and filtering (see [list_dir]).
//! - [ops]: copy, move, delete, rename and create with conflict resolution.
//! - [history]: recent directories and the last-directory session slot.
//! - [formatter]: display helpers for permissions, owners, sizes and times.
//! - [proc]: handing the terminal to external programs (editor, pager, fzf).
//! - [terminal]: terminal setup/teardown and the main crossterm/ratatui event loop.

pub mod cache;
pub mod fm;
pub mod formatter;
pub mod history;
pub mod lister;
pub mod ops;
pub mod proc;
pub mod terminal;

pub use cache::{FsStat, StatCache, StatSource};
pub use fm::{Entry, EntryKind, FileMetadata, PARENT_NAME};
pub use formatter::{
    format_file_size, format_file_time, format_permissions, owner_label, sanitize_to_exact_width,
    truncate_left,
};
pub use history::{History, Session};
pub use lister::{filter_entries, list_dir, sort_entries};
pub use ops::{BatchReport, ConflictResolver, Resolution, TransferMode};
