//! Application state and logic for sgt.
//!
//! - [state]: [AppState] and the single mutation entry point [AppState::apply].
//! - [command]: the [Command] set and the [Outcome] of applying one.
//! - [nav]: current directory, listing, selection, filter and marks.
//! - [actions]: dialogs, text input and the [Clipboard].
//! - [keymap]: key bindings from the config.
//! - [handlers]: key events to dialogs and commands.

pub mod actions;
pub mod command;
pub mod handlers;
pub mod keymap;
pub mod nav;
pub mod state;

pub use actions::{ActionContext, ActionMode, Clipboard, InputMode, Picker, PickerKind};
pub use command::{Command, Outcome};
pub use handlers::KeypressResult;
pub use keymap::{Action, Keymap};
pub use nav::NavState;
pub use state::AppState;
