//! Application State and main controller module for sgt.
//!
//! [AppState] owns everything that changes while sgt runs: the stat cache, the navigation
//! state, the dialog/clipboard context, history and session. Every change goes through
//! [AppState::apply] with a [Command]; key handling in `handlers.rs` only translates keys
//! into commands and dialog transitions.
//!
//! The listing is memoized on the current directory and the ownership flag.
//! [AppState::refresh_if_needed] relists only when one of them changed, while
//! [AppState::force_refresh] drops the memo and the cached stats below the current directory.

use crate::app::actions::{ActionContext, Clipboard};
use crate::app::command::{Command, Outcome};
use crate::app::keymap::Keymap;
use crate::app::nav::NavState;
use crate::config::Config;
use crate::core::ops::{self, BatchReport};
use crate::core::{
    ConflictResolver, Entry, EntryKind, History, Session, StatCache, TransferMode, list_dir,
};
use crate::error::Result;
use crate::utils::git_branch;

use std::path::{Path, PathBuf};

/// Rows moved by page up/down until the UI reports the real list height.
const DEFAULT_PAGE_SIZE: usize = 20;

/// Main struct which holds the central Application state of sgt
pub struct AppState<'a> {
    pub(super) config: &'a Config,
    pub(super) keymap: Keymap,

    pub(super) cache: StatCache,
    pub(super) nav: NavState,
    pub(super) actions: ActionContext,
    pub(super) history: History,
    pub(super) session: Session,

    pub(super) show_ownership: bool,
    last_refresh: Option<(PathBuf, bool)>,
    git_branch: Option<String>,
    page_size: usize,
    message: Option<String>,
}

impl<'a> AppState<'a> {
    /// Creates the state and lists `start_dir`.
    ///
    /// # Errors
    /// Fails when `start_dir` cannot be listed.
    pub fn new(
        config: &'a Config,
        start_dir: &Path,
        history: History,
        session: Session,
    ) -> Result<Self> {
        let general = config.general();
        let mut app = Self {
            config,
            keymap: Keymap::from_config(config),
            cache: StatCache::new(general.cache_ttl(), general.cache_capacity()),
            nav: NavState::new(start_dir.to_path_buf()),
            actions: ActionContext::default(),
            history,
            session,
            show_ownership: general.show_ownership(),
            last_refresh: None,
            git_branch: None,
            page_size: DEFAULT_PAGE_SIZE,
            message: None,
        };

        let items = list_dir(&mut app.cache, start_dir, app.show_ownership)?;
        app.install_listing(items);
        app.history.record_visit(start_dir);
        Ok(app)
    }

    // Getters/ accessors

    #[inline]
    pub fn config(&self) -> &Config {
        self.config
    }

    #[inline]
    pub fn nav(&self) -> &NavState {
        &self.nav
    }

    #[inline]
    pub fn nav_mut(&mut self) -> &mut NavState {
        &mut self.nav
    }

    #[inline]
    pub fn actions(&self) -> &ActionContext {
        &self.actions
    }

    #[inline]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[inline]
    pub fn cache(&self) -> &StatCache {
        &self.cache
    }

    #[inline]
    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.actions.clipboard()
    }

    #[inline]
    pub fn show_ownership(&self) -> bool {
        self.show_ownership
    }

    #[inline]
    pub fn git_branch(&self) -> Option<&str> {
        self.git_branch.as_deref()
    }

    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Tells the state how many list rows are visible. Used for paging.
    pub fn set_page_size(&mut self, rows: usize) {
        self.page_size = rows.max(1);
    }

    // Listing

    fn install_listing(&mut self, items: Vec<Entry>) {
        self.nav.set_items(items);
        self.last_refresh = Some((self.nav.current_dir().to_path_buf(), self.show_ownership));
        self.git_branch = git_branch(self.nav.current_dir());
    }

    /// Relists the current directory if it or the ownership flag changed since the last
    /// listing. Returns whether a listing was made.
    ///
    /// An unreadable directory keeps the previous listing and sets a message.
    pub fn refresh_if_needed(&mut self) -> bool {
        let key = (self.nav.current_dir().to_path_buf(), self.show_ownership);
        if self.last_refresh.as_ref() == Some(&key) {
            return false;
        }

        match list_dir(&mut self.cache, &key.0, self.show_ownership) {
            Ok(items) => {
                self.install_listing(items);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "refresh failed");
                self.last_refresh = Some(key);
                self.set_message(e.to_string());
                false
            }
        }
    }

    /// Drops cached stats below the current directory and relists it.
    pub fn force_refresh(&mut self) {
        self.cache.invalidate(self.nav.current_dir());
        self.last_refresh = None;
        self.refresh_if_needed();
    }

    /// Re-entry hook for when an external program gave the terminal back.
    pub fn after_external(&mut self) {
        self.force_refresh();
    }

    /// Lists `target` and makes it the current directory. The state is unchanged if the
    /// listing fails.
    fn change_dir(&mut self, target: PathBuf) -> bool {
        match list_dir(&mut self.cache, &target, self.show_ownership) {
            Ok(items) => {
                tracing::info!(dir = %target.display(), "changed directory");
                self.nav.set_path(target);
                self.install_listing(items);
                self.history.record_visit(self.nav.current_dir());
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot enter directory");
                self.set_message(e.to_string());
                false
            }
        }
    }

    // Commands

    /// Applies one command. `resolver` is asked about name conflicts during a paste.
    pub fn apply(&mut self, cmd: Command, resolver: &mut dyn ConflictResolver) -> Outcome {
        match cmd {
            Command::MoveUp => self.nav.move_selection(-1),
            Command::MoveDown => self.nav.move_selection(1),
            Command::PageUp => self.nav.move_selection(-(self.page_size as isize)),
            Command::PageDown => self.nav.move_selection(self.page_size as isize),
            Command::Top => self.nav.select_first(),
            Command::Bottom => self.nav.select_last(),
            Command::Enter => return self.enter_selected(),
            Command::Back => self.go_parent(),
            Command::ToggleMark => self.nav.toggle_mark_selected(),
            Command::UnmarkAll => self.nav.clear_markers(),
            Command::Copy => self.fill_clipboard(TransferMode::Copy),
            Command::Cut => self.fill_clipboard(TransferMode::Move),
            Command::Paste => self.paste(resolver),
            Command::Delete => self.delete_marked(),
            Command::Rename(name) => self.rename_selected(&name),
            Command::Filter(text) => self.nav.set_filter(text.trim().to_string()),
            Command::ClearFilter => self.nav.clear_filter(),
            Command::CreateNew(kind, name) => self.create(kind, &name),
            Command::ToggleOwnership => {
                self.show_ownership = !self.show_ownership;
                self.refresh_if_needed();
            }
            Command::Refresh => {
                self.cache.clear();
                self.force_refresh();
            }
            Command::GoTo(path) => self.go_to(path),
            Command::Quit => {
                self.session.save(self.nav.current_dir());
                return Outcome::Quit;
            }
        }
        Outcome::Continue
    }

    fn enter_selected(&mut self) -> Outcome {
        let Some(entry) = self.nav.selected_entry().cloned() else {
            return Outcome::Continue;
        };
        if entry.is_dir() {
            self.change_dir(entry.path().to_path_buf());
            Outcome::Continue
        } else {
            Outcome::Preview(entry.path().to_path_buf())
        }
    }

    fn go_parent(&mut self) {
        if let Some(parent) = self.nav.current_dir().parent() {
            let parent = parent.to_path_buf();
            self.change_dir(parent);
        }
    }

    fn go_to(&mut self, path: PathBuf) {
        if path.is_dir() {
            self.change_dir(path);
        } else if path.exists() {
            if let Some(parent) = path.parent()
                && self.change_dir(parent.to_path_buf())
            {
                self.nav.select_path(&path);
            }
        } else {
            self.set_message(format!("'{}' does not exist", path.display()));
        }
    }

    fn fill_clipboard(&mut self, mode: TransferMode) {
        let paths = self.nav.marked_paths();
        if paths.is_empty() {
            return;
        }
        let verb = if mode == TransferMode::Move { "cut" } else { "copied" };
        self.set_message(format!("{} item(s) {verb}", paths.len()));
        self.actions.set_clipboard(Clipboard::new(paths, mode));
    }

    fn paste(&mut self, resolver: &mut dyn ConflictResolver) {
        let Some(clipboard) = self.actions.clipboard().filter(|c| !c.is_empty()).cloned() else {
            return;
        };

        let dest = self.nav.current_dir().to_path_buf();
        let report = ops::transfer(clipboard.paths(), &dest, clipboard.mode(), resolver);

        self.nav.clear_markers();
        self.actions.take_clipboard();
        self.finish_batch(&report, "pasted");
    }

    fn delete_marked(&mut self) {
        let paths = self.nav.marked_paths();
        if paths.is_empty() {
            return;
        }

        let report = ops::delete(&paths);
        self.nav.clear_markers();
        self.finish_batch(&report, "deleted");
    }

    fn finish_batch(&mut self, report: &BatchReport, verb: &str) {
        let mut message = report.summary(verb);
        if let Some(first) = report.errors().first() {
            message.push_str(": ");
            message.push_str(first);
        }
        self.set_message(message);
        self.force_refresh();
    }

    fn rename_selected(&mut self, name: &str) {
        let Some(entry) = self.nav.selected_entry().filter(|e| !e.is_parent()).cloned() else {
            return;
        };

        match ops::rename(entry.path(), name) {
            Ok(new_path) => {
                self.nav.rename_marked(entry.path(), &new_path);
                if let Some(clipboard) = self.actions.clipboard_mut() {
                    clipboard.rename_path(entry.path(), &new_path);
                }
                self.force_refresh();
                self.nav.select_path(&new_path);
                self.set_message(format!("Renamed to '{}'", name.trim()));
            }
            Err(e) => self.set_message(e.to_string()),
        }
    }

    fn create(&mut self, kind: EntryKind, name: &str) {
        match ops::create(kind, name, self.nav.current_dir()) {
            Ok(path) => {
                self.force_refresh();
                self.nav.select_path(&path);
                let what = match kind {
                    EntryKind::Directory => "directory",
                    EntryKind::File => "file",
                };
                self.set_message(format!("Created {what} '{}'", name.trim()));
            }
            Err(e) => self.set_message(e.to_string()),
        }
    }
}
