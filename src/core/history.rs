//! Recent directories and the last-directory session slot.
//!
//! Both are plain text files under the home directory: `~/.sgt_history` holds one absolute
//! path per line, most recent first, and `~/.sgt_session` holds a single path. A missing
//! file is empty state. Write failures are logged and otherwise ignored.

use std::fs;
use std::path::{Path, PathBuf};

/// Default maximum number of remembered directories.
pub const DEFAULT_HISTORY_SIZE: usize = 50;

const HISTORY_FILE: &str = ".sgt_history";
const SESSION_FILE: &str = ".sgt_session";

/// Default location of the history file.
pub fn default_history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(HISTORY_FILE))
}

/// Default location of the session file.
pub fn default_session_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(SESSION_FILE))
}

/// Bounded, deduplicated list of visited directories, most recent first.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<PathBuf>,
    max_size: usize,
    file: Option<PathBuf>,
}

impl History {
    /// An empty history that is never persisted.
    pub fn in_memory(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_size: max_size.max(1),
            file: None,
        }
    }

    /// Loads the history stored at `file`. Blank lines are ignored, and extra lines past
    /// `max_size` are dropped.
    pub fn load(file: PathBuf, max_size: usize) -> Self {
        let mut history = Self::in_memory(max_size);
        if let Ok(content) = fs::read_to_string(&file) {
            for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
                let path = PathBuf::from(line);
                if !history.entries.contains(&path) {
                    history.entries.push(path);
                }
            }
            history.entries.truncate(history.max_size);
        }
        history.file = Some(file);
        history
    }

    #[inline]
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records a visit to `dir` and persists the list.
    ///
    /// Visiting the most recent directory again changes nothing. Otherwise any earlier
    /// occurrence is removed and `dir` moves to the front.
    pub fn record_visit(&mut self, dir: &Path) {
        if self.entries.first().is_some_and(|p| p == dir) {
            return;
        }

        self.entries.retain(|p| p != dir);
        self.entries.insert(0, dir.to_path_buf());
        self.entries.truncate(self.max_size);
        self.save();
    }

    fn save(&self) {
        let Some(file) = &self.file else {
            return;
        };

        let mut content = String::new();
        for path in &self.entries {
            content.push_str(&path.to_string_lossy());
            content.push('\n');
        }
        if let Err(e) = fs::write(file, content) {
            tracing::warn!(file = %file.display(), error = %e, "failed to write history");
        }
    }
}

/// Single-slot store for the directory the last run ended in.
#[derive(Debug, Clone)]
pub struct Session {
    file: Option<PathBuf>,
}

impl Session {
    pub fn new(file: Option<PathBuf>) -> Self {
        Self { file }
    }

    /// Writes `dir` as the last directory.
    pub fn save(&self, dir: &Path) {
        let Some(file) = &self.file else {
            return;
        };
        if let Err(e) = fs::write(file, format!("{}\n", dir.to_string_lossy())) {
            tracing::warn!(file = %file.display(), error = %e, "failed to write session");
        }
    }

    /// Returns the stored directory if it still exists.
    pub fn restore(&self) -> Option<PathBuf> {
        let content = fs::read_to_string(self.file.as_ref()?).ok()?;
        let path = PathBuf::from(content.trim());
        if path.as_os_str().is_empty() || !path.is_dir() {
            tracing::debug!(path = %path.display(), "session directory no longer exists");
            return None;
        }
        Some(path)
    }
}
