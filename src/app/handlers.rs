//! Input handler methods for sgt.
//!
//! This module implements [AppState] methods that turn key events into dialog transitions
//! and [Command]s. Work that needs the terminal (paste with conflict prompts, editors,
//! viewers, fzf, shell commands) is handed back to the event loop as a [KeypressResult].

use crate::app::actions::{ActionMode, InputMode, Picker, PickerKind};
use crate::app::command::{Command, Outcome};
use crate::app::keymap::Action;
use crate::app::state::AppState;
use crate::core::{EntryKind, Resolution};
use crate::utils::shorten_home_path;

use crossterm::event::{KeyCode::*, KeyEvent};
use std::path::PathBuf;

/// Result of a key press, for the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeypressResult {
    Continue,
    Consumed,
    Quit,
    /// Paste the clipboard. Conflicts are asked on the terminal.
    Paste,
    Preview(PathBuf),
    Edit(PathBuf),
    Search,
    /// Run this command line in the current directory.
    Shell(String),
}

/// AppState input and action handlers
impl<'a> AppState<'a> {
    /// Entry point for every key press.
    pub fn handle_keypress(&mut self, key: KeyEvent) -> KeypressResult {
        self.clear_message();

        match self.actions.mode() {
            ActionMode::Normal => match self.keymap.lookup(key) {
                Some(action) => self.handle_action(action),
                None => KeypressResult::Continue,
            },
            ActionMode::Input { .. } => self.handle_input_mode(key),
            ActionMode::ChooseCreateKind => self.handle_create_kind(key),
            ActionMode::ConfirmDelete { .. } => self.handle_confirm_delete(key),
            ActionMode::Picker(_) => self.handle_picker(key),
            ActionMode::Help => {
                self.actions.exit_mode();
                KeypressResult::Consumed
            }
        }
    }

    /// Applies a command that never pastes, so no conflict can come up.
    fn run(&mut self, cmd: Command) -> KeypressResult {
        match self.apply(cmd, &mut Resolution::Skip) {
            Outcome::Continue => KeypressResult::Continue,
            Outcome::Preview(path) => KeypressResult::Preview(path),
            Outcome::Quit => KeypressResult::Quit,
        }
    }

    /// Handles a normal-mode action.
    pub(super) fn handle_action(&mut self, action: Action) -> KeypressResult {
        match action {
            Action::GoUp => self.run(Command::MoveUp),
            Action::GoDown => self.run(Command::MoveDown),
            Action::GoIntoDir => self.run(Command::Enter),
            Action::GoParent => self.run(Command::Back),
            Action::PageUp => self.run(Command::PageUp),
            Action::PageDown => self.run(Command::PageDown),
            Action::GoToTop => self.run(Command::Top),
            Action::GoToBottom => self.run(Command::Bottom),
            Action::ToggleMarker => self.run(Command::ToggleMark),
            Action::UnmarkAll => self.run(Command::UnmarkAll),
            Action::Copy => self.run(Command::Copy),
            Action::Cut => self.run(Command::Cut),
            Action::ToggleOwnership => self.run(Command::ToggleOwnership),
            Action::Refresh => self.run(Command::Refresh),
            Action::Quit => self.run(Command::Quit),

            Action::Paste => {
                if self.clipboard().is_some_and(|c| !c.is_empty()) {
                    KeypressResult::Paste
                } else {
                    KeypressResult::Continue
                }
            }
            Action::Delete => {
                let count = self.nav.markers().len();
                if count > 0 {
                    self.actions
                        .enter_mode(ActionMode::ConfirmDelete { count }, String::new());
                }
                KeypressResult::Consumed
            }
            Action::Rename => {
                let Some(entry) = self.nav.selected_entry().filter(|e| !e.is_parent()) else {
                    return KeypressResult::Continue;
                };
                let name = entry.name_str().into_owned();
                self.enter_input(InputMode::Rename, "Rename to:", name);
                KeypressResult::Consumed
            }
            Action::Create => {
                self.actions
                    .enter_mode(ActionMode::ChooseCreateKind, String::new());
                KeypressResult::Consumed
            }
            Action::Filter => {
                let current = self.nav.filter().to_string();
                self.enter_input(InputMode::Filter, "Filter:", current);
                KeypressResult::Consumed
            }
            Action::Bookmarks => {
                let items: Vec<_> = self
                    .config
                    .bookmarks()
                    .iter()
                    .map(|b| (b.name().to_string(), b.path().to_path_buf()))
                    .collect();
                self.open_picker(PickerKind::Bookmarks, items, "No bookmarks configured")
            }
            Action::History => {
                let items: Vec<_> = self
                    .history
                    .entries()
                    .iter()
                    .map(|p| (shorten_home_path(p), p.clone()))
                    .collect();
                self.open_picker(PickerKind::History, items, "History is empty")
            }
            Action::Edit | Action::View => {
                let Some(entry) = self.nav.selected_entry() else {
                    return KeypressResult::Continue;
                };
                if entry.is_dir() {
                    self.set_message("Not a file");
                    return KeypressResult::Consumed;
                }
                let path = entry.path().to_path_buf();
                if action == Action::Edit {
                    KeypressResult::Edit(path)
                } else {
                    KeypressResult::Preview(path)
                }
            }
            Action::Search => KeypressResult::Search,
            Action::Shell => {
                self.enter_input(InputMode::Shell, "Run command:", String::new());
                KeypressResult::Consumed
            }
            Action::Help => {
                self.actions.enter_mode(ActionMode::Help, String::new());
                KeypressResult::Consumed
            }
        }
    }

    fn enter_input(&mut self, mode: InputMode, prompt: &str, initial: String) {
        self.actions.enter_mode(
            ActionMode::Input {
                mode,
                prompt: prompt.to_string(),
            },
            initial,
        );
    }

    fn open_picker(
        &mut self,
        kind: PickerKind,
        items: Vec<(String, PathBuf)>,
        empty_message: &str,
    ) -> KeypressResult {
        if items.is_empty() {
            self.set_message(empty_message);
        } else {
            self.actions
                .enter_mode(ActionMode::Picker(Picker::new(kind, items)), String::new());
        }
        KeypressResult::Consumed
    }

    /// Handles key events when in an input mode (rename, filter, etc).
    ///
    /// The filter is applied on every edit. Esc in filter mode also clears the filter.
    pub(super) fn handle_input_mode(&mut self, key: KeyEvent) -> KeypressResult {
        let mode = if let ActionMode::Input { mode, .. } = self.actions.mode() {
            *mode
        } else {
            return KeypressResult::Continue;
        };

        match key.code {
            Enter => {
                let text = self.actions.input_buffer().to_string();
                self.actions.exit_mode();
                let cmd = match mode {
                    InputMode::Rename => Command::Rename(text),
                    InputMode::NewFile => Command::CreateNew(EntryKind::File, text),
                    InputMode::NewFolder => Command::CreateNew(EntryKind::Directory, text),
                    InputMode::Filter => return KeypressResult::Consumed,
                    InputMode::Shell => {
                        let line = text.trim();
                        if line.is_empty() {
                            return KeypressResult::Consumed;
                        }
                        return KeypressResult::Shell(line.to_string());
                    }
                };
                self.run(cmd);
                KeypressResult::Consumed
            }
            Esc => {
                self.actions.exit_mode();
                if mode == InputMode::Filter {
                    self.run(Command::ClearFilter);
                }
                KeypressResult::Consumed
            }
            Left => {
                self.actions.action_move_cursor_left();
                KeypressResult::Consumed
            }
            Right => {
                self.actions.action_move_cursor_right();
                KeypressResult::Consumed
            }
            Home => {
                self.actions.action_cursor_home();
                KeypressResult::Consumed
            }
            End => {
                self.actions.action_cursor_end();
                KeypressResult::Consumed
            }
            Backspace => {
                self.actions.action_backspace_at_cursor();
                self.live_filter(mode);
                KeypressResult::Consumed
            }
            Delete => {
                self.actions.action_delete_at_cursor();
                self.live_filter(mode);
                KeypressResult::Consumed
            }
            Char(c) => {
                self.actions.action_insert_at_cursor(c);
                self.live_filter(mode);
                KeypressResult::Consumed
            }
            _ => KeypressResult::Consumed,
        }
    }

    fn live_filter(&mut self, mode: InputMode) {
        if mode == InputMode::Filter {
            let text = self.actions.input_buffer().to_string();
            self.run(Command::Filter(text));
        }
    }

    fn handle_create_kind(&mut self, key: KeyEvent) -> KeypressResult {
        self.actions.exit_mode();
        match key.code {
            Char('f') => self.enter_input(InputMode::NewFile, "New file:", String::new()),
            Char('d') => self.enter_input(InputMode::NewFolder, "New directory:", String::new()),
            _ => {}
        }
        KeypressResult::Consumed
    }

    fn handle_confirm_delete(&mut self, key: KeyEvent) -> KeypressResult {
        self.actions.exit_mode();
        match key.code {
            Char('y') | Char('Y') => {
                self.run(Command::Delete);
            }
            _ => self.set_message("Delete cancelled"),
        }
        KeypressResult::Consumed
    }

    fn handle_picker(&mut self, key: KeyEvent) -> KeypressResult {
        let ActionMode::Picker(picker) = self.actions.mode_mut() else {
            return KeypressResult::Continue;
        };

        let chosen = match key.code {
            Char('j') | Down => {
                picker.select_next();
                None
            }
            Char('k') | Up => {
                picker.select_prev();
                None
            }
            Enter => picker.selected_path().map(|p| p.to_path_buf()),
            Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                if picker.select(idx) {
                    picker.selected_path().map(|p| p.to_path_buf())
                } else {
                    None
                }
            }
            Esc | Char('q') => {
                self.actions.exit_mode();
                return KeypressResult::Consumed;
            }
            _ => None,
        };

        if let Some(path) = chosen {
            self.actions.exit_mode();
            self.run(Command::GoTo(path));
        }
        KeypressResult::Consumed
    }
}
