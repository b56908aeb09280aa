//! Action context and input mode logic for sgt.
//!
//! Contains the [ActionContext] struct, tracking the active dialog, the text input buffer
//! and the [Clipboard].

use crate::app::nav::migrate_path;
use crate::core::TransferMode;

use std::path::{Path, PathBuf};

/// Describes the current mode for action handling/input.
///
/// Used to determine which dialog, if any, receives the next key press.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionMode {
    Normal,
    Input { mode: InputMode, prompt: String },
    /// Waiting for `f` (file) or `d` (directory) before asking for a name.
    ChooseCreateKind,
    ConfirmDelete { count: usize },
    Picker(Picker),
    Help,
}

/// Enumerates all the available input field modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Rename,
    NewFile,
    NewFolder,
    Filter,
    /// A command line for the user's shell, run in the current directory.
    Shell,
}

/// What a [Picker] lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Bookmarks,
    History,
}

/// A selectable list of directories (bookmarks, history).
#[derive(Debug, Clone, PartialEq)]
pub struct Picker {
    kind: PickerKind,
    items: Vec<(String, PathBuf)>,
    selected: usize,
}

impl Picker {
    pub fn new(kind: PickerKind, items: Vec<(String, PathBuf)>) -> Self {
        Self {
            kind,
            items,
            selected: 0,
        }
    }

    #[inline]
    pub fn kind(&self) -> PickerKind {
        self.kind
    }

    #[inline]
    pub fn items(&self) -> &[(String, PathBuf)] {
        &self.items
    }

    #[inline]
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_path(&self) -> Option<&Path> {
        self.items.get(self.selected).map(|(_, p)| p.as_path())
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Selects item `idx` (0-based) if it exists. Used for the number shortcuts.
    pub fn select(&mut self, idx: usize) -> bool {
        if idx < self.items.len() {
            self.selected = idx;
            true
        } else {
            false
        }
    }
}

/// Snapshot of the paths captured by a copy or cut.
///
/// Changing the markers afterwards does not affect a pending clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clipboard {
    paths: Vec<PathBuf>,
    mode: TransferMode,
}

impl Clipboard {
    pub fn new(paths: Vec<PathBuf>, mode: TransferMode) -> Self {
        Self { paths, mode }
    }

    #[inline]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    #[inline]
    pub fn mode(&self) -> TransferMode {
        self.mode
    }

    #[inline]
    pub fn is_cut(&self) -> bool {
        self.mode == TransferMode::Move
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Rewrites paths at or below `old` to point below `new`.
    pub fn rename_path(&mut self, old: &Path, new: &Path) {
        for path in &mut self.paths {
            *path = migrate_path(std::mem::take(path), old, new);
        }
    }
}

/// Tracks current user action and input buffer state.
///
/// Stores the current mode/prompt, the input buffer with its cursor (a byte offset on a
/// char boundary), and the clipboard.
#[derive(Debug)]
pub struct ActionContext {
    mode: ActionMode,
    input_buffer: String,
    input_cursor_pos: usize,
    clipboard: Option<Clipboard>,
}

impl ActionContext {
    // Getters / accessors

    #[inline]
    pub fn mode(&self) -> &ActionMode {
        &self.mode
    }

    #[inline]
    pub fn mode_mut(&mut self) -> &mut ActionMode {
        &mut self.mode
    }

    #[inline]
    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    #[inline]
    pub fn input_cursor_pos(&self) -> usize {
        self.input_cursor_pos
    }

    #[inline]
    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.as_ref()
    }

    #[inline]
    pub fn clipboard_mut(&mut self) -> Option<&mut Clipboard> {
        self.clipboard.as_mut()
    }

    pub fn set_clipboard(&mut self, clipboard: Clipboard) {
        self.clipboard = Some(clipboard);
    }

    pub fn take_clipboard(&mut self) -> Option<Clipboard> {
        self.clipboard.take()
    }

    // Mode functions

    pub fn is_normal(&self) -> bool {
        matches!(self.mode, ActionMode::Normal)
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, ActionMode::Input { .. })
    }

    pub fn enter_mode(&mut self, mode: ActionMode, initial_value: String) {
        self.mode = mode;
        self.input_buffer = initial_value;
        self.input_cursor_pos = self.input_buffer.len();
    }

    pub fn exit_mode(&mut self) {
        self.mode = ActionMode::Normal;
        self.input_buffer.clear();
        self.input_cursor_pos = 0;
    }

    // Cursor actions

    /// Moves the input cursor one character to the left, if possible.
    pub fn action_move_cursor_left(&mut self) {
        if let Some((prev, _)) = self.input_buffer[..self.input_cursor_pos]
            .char_indices()
            .next_back()
        {
            self.input_cursor_pos = prev;
        }
    }

    /// Moves the input cursor one character to the right, if possible.
    pub fn action_move_cursor_right(&mut self) {
        if let Some(ch) = self.input_buffer[self.input_cursor_pos..].chars().next() {
            self.input_cursor_pos += ch.len_utf8();
        }
    }

    /// Inserts a character at the current cursor position in the input buffer.
    pub fn action_insert_at_cursor(&mut self, ch: char) {
        self.input_buffer.insert(self.input_cursor_pos, ch);
        self.input_cursor_pos += ch.len_utf8();
    }

    /// Deletes the character before the current cursor position in the input buffer.
    ///
    /// Moves the cursor back accordingly
    pub fn action_backspace_at_cursor(&mut self) {
        if let Some((previous, _)) = self.input_buffer[..self.input_cursor_pos]
            .char_indices()
            .next_back()
        {
            self.input_buffer.remove(previous);
            self.input_cursor_pos = previous;
        }
    }

    /// Deletes the character at the current cursor position in the input buffer.
    pub fn action_delete_at_cursor(&mut self) {
        if self.input_cursor_pos < self.input_buffer.len() {
            self.input_buffer.remove(self.input_cursor_pos);
        }
    }

    /// Moves the input cursor to the start of the input buffer.
    pub fn action_cursor_home(&mut self) {
        self.input_cursor_pos = 0;
    }

    /// Moves the input cursor to the end of the input buffer.
    pub fn action_cursor_end(&mut self) {
        self.input_cursor_pos = self.input_buffer.len();
    }
}

impl Default for ActionContext {
    fn default() -> Self {
        Self {
            mode: ActionMode::Normal,
            input_buffer: String::new(),
            input_cursor_pos: 0,
            clipboard: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_editing_is_char_aware() {
        let mut ctx = ActionContext::default();
        ctx.enter_mode(
            ActionMode::Input {
                mode: InputMode::Rename,
                prompt: "Rename".into(),
            },
            "añb".into(),
        );
        assert!(ctx.is_input_mode());

        ctx.action_move_cursor_left();
        ctx.action_move_cursor_left();
        assert_eq!(ctx.input_cursor_pos(), 1);
        ctx.action_delete_at_cursor();
        assert_eq!(ctx.input_buffer(), "ab");

        ctx.action_insert_at_cursor('é');
        ctx.action_cursor_end();
        ctx.action_backspace_at_cursor();
        assert_eq!(ctx.input_buffer(), "aé");

        ctx.action_cursor_home();
        ctx.action_backspace_at_cursor();
        ctx.action_move_cursor_right();
        ctx.action_move_cursor_right();
        ctx.action_move_cursor_right();
        assert_eq!(ctx.input_cursor_pos(), "aé".len());

        ctx.exit_mode();
        assert!(ctx.is_normal());
        assert!(ctx.input_buffer().is_empty());
    }

    #[test]
    fn clipboard_follows_renames() {
        let mut clip = Clipboard::new(
            vec![PathBuf::from("/a/old"), PathBuf::from("/a/keep")],
            TransferMode::Move,
        );
        clip.rename_path(Path::new("/a/old"), Path::new("/a/new"));
        assert_eq!(
            clip.paths(),
            [PathBuf::from("/a/new"), PathBuf::from("/a/keep")]
        );
        assert!(clip.is_cut());
        assert_eq!(clip.len(), 2);
    }

    #[test]
    fn picker_selection_is_bounded() {
        let mut picker = Picker::new(
            PickerKind::History,
            vec![("a".into(), "/a".into()), ("b".into(), "/b".into())],
        );
        picker.select_prev();
        assert_eq!(picker.selected(), 0);
        picker.select_next();
        picker.select_next();
        assert_eq!(picker.selected_path(), Some(Path::new("/b")));
        assert!(!picker.select(5));
        assert!(picker.select(0));
        assert_eq!(picker.selected_path(), Some(Path::new("/a")));
    }
}
