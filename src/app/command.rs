//! Commands accepted by [AppState::apply](crate::app::AppState::apply).
//!
//! Key presses and dialog results are translated into a [Command] before they reach the
//! application state. Nothing else mutates navigation or the filesystem.

use crate::core::EntryKind;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    /// Open the selected entry: enter a directory, preview a file.
    Enter,
    Back,
    ToggleMark,
    UnmarkAll,
    Copy,
    Cut,
    Paste,
    /// Delete the marked entries. The caller confirms first.
    Delete,
    Rename(String),
    Filter(String),
    ClearFilter,
    CreateNew(EntryKind, String),
    ToggleOwnership,
    Refresh,
    GoTo(PathBuf),
    Quit,
}

/// What the caller has to do after a command was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// A file was opened and should be shown by a viewer.
    Preview(PathBuf),
    Quit,
}
