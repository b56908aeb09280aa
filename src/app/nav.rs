//! Navigation state and file list logic for sgt.
//!
//! Manages the current directory, the listed entries, selection, scrolling, markers and the
//! filter. Every mutation keeps these invariants:
//! - `selected < items.len()` whenever `items` is non-empty, `selected == 0` otherwise.
//! - `items` is `all_items` filtered by name, with the `..` entry always kept.
//! - the markers never contain the `..` entry.

use crate::core::{Entry, filter_entries};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Holds the navigation, selection and file list state of the browser.
#[derive(Debug)]
pub struct NavState {
    current_dir: PathBuf,
    all_items: Vec<Entry>,
    items: Vec<Entry>,
    selected: usize,
    scroll: usize,
    filter: String,
    markers: HashSet<PathBuf>,
}

impl NavState {
    pub fn new(path: PathBuf) -> Self {
        Self {
            current_dir: path,
            all_items: Vec::new(),
            items: Vec::new(),
            selected: 0,
            scroll: 0,
            filter: String::new(),
            markers: HashSet::new(),
        }
    }

    // Getters / Accessors

    #[inline]
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    #[inline]
    pub fn items(&self) -> &[Entry] {
        &self.items
    }

    #[inline]
    pub fn all_items(&self) -> &[Entry] {
        &self.all_items
    }

    #[inline]
    pub fn selected_idx(&self) -> usize {
        self.selected
    }

    #[inline]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    #[inline]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    #[inline]
    pub fn markers(&self) -> &HashSet<PathBuf> {
        &self.markers
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.items.get(self.selected)
    }

    pub fn is_marked(&self, path: &Path) -> bool {
        self.markers.contains(path)
    }

    // Listing

    /// Replaces the unfiltered listing. The filter is re-applied and the selection clamped.
    pub fn set_items(&mut self, all_items: Vec<Entry>) {
        self.all_items = all_items;
        self.apply_filter();
        self.clamp_selection();
    }

    fn apply_filter(&mut self) {
        self.items = filter_entries(&self.all_items, &self.filter);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
        self.scroll = self.scroll.min(self.selected);
    }

    fn reset_cursor(&mut self) {
        self.selected = 0;
        self.scroll = 0;
    }

    // Navigation functions

    /// Changes into `path`, resetting the cursor. The caller is responsible for listing
    /// the new directory.
    pub fn set_path(&mut self, path: PathBuf) {
        self.current_dir = path;
        self.reset_cursor();
    }

    /// Enters `entry` if it is a directory. Returns whether the directory changed.
    pub fn enter(&mut self, entry: &Entry) -> bool {
        if !entry.is_dir() {
            return false;
        }
        self.set_path(entry.path().to_path_buf());
        true
    }

    /// Moves to the parent directory. Returns `false` at the filesystem root.
    pub fn go_parent(&mut self) -> bool {
        match self.current_dir.parent() {
            Some(parent) => {
                let parent = parent.to_path_buf();
                self.set_path(parent);
                true
            }
            None => false,
        }
    }

    /// Moves the selection by `delta`, clamped to the listed items.
    pub fn move_selection(&mut self, delta: isize) {
        if self.items.is_empty() {
            return;
        }
        let last = self.items.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.items.len().saturating_sub(1);
    }

    /// Selects the entry whose path is `path`, if it is listed.
    pub fn select_path(&mut self, path: &Path) -> bool {
        match self.items.iter().position(|e| e.path() == path && !e.is_parent()) {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }

    /// Recomputes the scroll offset so the selection is inside a window of `visible` rows.
    pub fn update_scroll(&mut self, visible: usize) {
        self.scroll = compute_scroll(self.selected, self.scroll, visible);
    }

    // Marker functions

    /// Flips the marker of `entry`. The `..` entry is never marked.
    pub fn toggle_mark(&mut self, entry: &Entry) {
        if entry.is_parent() {
            return;
        }
        let path = entry.path();
        if !self.markers.remove(path) {
            self.markers.insert(path.to_path_buf());
        }
    }

    /// Toggles the marker of the selected entry and advances the selection.
    pub fn toggle_mark_selected(&mut self) {
        if let Some(entry) = self.selected_entry().cloned() {
            self.toggle_mark(&entry);
            self.move_selection(1);
        }
    }

    pub fn clear_markers(&mut self) {
        self.markers.clear();
    }

    /// Marked paths in a stable order.
    pub fn marked_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.markers.iter().cloned().collect();
        paths.sort();
        paths
    }

    /// Rewrites markers at or below `old` to point below `new`.
    pub fn rename_marked(&mut self, old: &Path, new: &Path) {
        self.markers = std::mem::take(&mut self.markers)
            .into_iter()
            .map(|p| migrate_path(p, old, new))
            .collect();
    }

    // Filter functions

    /// Sets a new filter string, resetting the cursor.
    pub fn set_filter(&mut self, filter: String) {
        self.filter = filter;
        self.apply_filter();
        self.reset_cursor();
    }

    /// Clears the current filter.
    pub fn clear_filter(&mut self) {
        self.set_filter(String::new());
    }
}

/// Scroll offset that keeps `selected` inside a window of `visible` rows starting at
/// `scroll`. The window moves as little as possible.
pub fn compute_scroll(selected: usize, scroll: usize, visible: usize) -> usize {
    if visible == 0 || selected < scroll {
        selected
    } else if selected >= scroll + visible {
        selected + 1 - visible
    } else {
        scroll
    }
}

/// Maps `path` from below `old` to below `new`. Unrelated paths are returned unchanged.
pub fn migrate_path(path: PathBuf, old: &Path, new: &Path) -> PathBuf {
    match path.strip_prefix(old) {
        Ok(rest) if rest.as_os_str().is_empty() => new.to_path_buf(),
        Ok(rest) => new.join(rest),
        Err(_) => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::core::{FileMetadata, StatCache, list_dir};

    use std::error;
    use std::ffi::OsString;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn file_entry(dir: &Path, name: &str) -> Entry {
        Entry::new(
            OsString::from(name),
            dir.join(name),
            FileMetadata::new(false, 0, None),
        )
    }

    fn nav_with_files(count: usize) -> NavState {
        let dir = Path::new("/virtual");
        let mut nav = NavState::new(dir.to_path_buf());
        let mut items = vec![Entry::parent(Path::new("/"))];
        items.extend((0..count).map(|i| file_entry(dir, &format!("f{i}"))));
        nav.set_items(items);
        nav
    }

    #[test]
    fn selection_clamps_large_negative_delta() {
        let mut nav = nav_with_files(4);
        assert_eq!(nav.items().len(), 5);

        nav.move_selection(3);
        assert_eq!(nav.selected_idx(), 3);
        nav.move_selection(-1000);
        assert_eq!(nav.selected_idx(), 0);
        nav.move_selection(isize::MAX);
        assert_eq!(nav.selected_idx(), 4);
    }

    #[test]
    fn move_on_empty_is_noop() {
        let mut nav = NavState::new(PathBuf::from("/"));
        nav.move_selection(5);
        assert_eq!(nav.selected_idx(), 0);
        assert!(nav.selected_entry().is_none());
    }

    #[test]
    fn parent_entry_cannot_be_marked() {
        let mut nav = nav_with_files(2);
        let parent = nav.items()[0].clone();
        nav.toggle_mark(&parent);
        assert!(nav.markers().is_empty());

        let file = nav.items()[1].clone();
        nav.toggle_mark(&file);
        assert!(nav.is_marked(file.path()));
        nav.toggle_mark(&file);
        assert!(!nav.is_marked(file.path()));
    }

    #[test]
    fn toggle_mark_selected_advances() {
        let mut nav = nav_with_files(3);
        nav.move_selection(1);
        nav.toggle_mark_selected();
        nav.toggle_mark_selected();
        assert_eq!(nav.selected_idx(), 3);
        assert_eq!(
            nav.marked_paths(),
            vec![PathBuf::from("/virtual/f0"), PathBuf::from("/virtual/f1")]
        );
    }

    #[test]
    fn filter_resets_cursor_and_pins_parent() {
        let mut nav = nav_with_files(12);
        nav.move_selection(8);
        nav.set_filter("f1".into());

        assert_eq!(nav.selected_idx(), 0);
        let names: Vec<String> = nav.items().iter().map(|e| e.name_str().into_owned()).collect();
        assert_eq!(names, vec!["..", "f1", "f10", "f11"]);

        nav.set_filter("nothing".into());
        assert_eq!(nav.items().len(), 1);
        assert!(nav.items()[0].is_parent());

        nav.clear_filter();
        assert_eq!(nav.items().len(), 13);
    }

    #[test]
    fn shrinking_listing_clamps_selection() {
        let mut nav = nav_with_files(10);
        nav.select_last();
        assert_eq!(nav.selected_idx(), 10);

        let items = nav.all_items()[..3].to_vec();
        nav.set_items(items);
        assert_eq!(nav.selected_idx(), 2);

        nav.set_items(Vec::new());
        assert_eq!(nav.selected_idx(), 0);
    }

    #[test]
    fn scroll_follows_selection() {
        assert_eq!(compute_scroll(0, 0, 10), 0);
        assert_eq!(compute_scroll(9, 0, 10), 0);
        assert_eq!(compute_scroll(10, 0, 10), 1);
        assert_eq!(compute_scroll(25, 3, 10), 16);
        assert_eq!(compute_scroll(2, 5, 10), 2);
        assert_eq!(compute_scroll(7, 5, 0), 7);

        let mut nav = nav_with_files(30);
        nav.move_selection(20);
        nav.update_scroll(5);
        assert_eq!(nav.scroll(), 16);
        nav.select_first();
        nav.update_scroll(5);
        assert_eq!(nav.scroll(), 0);
    }

    #[test]
    fn go_parent_stops_at_root() {
        let mut nav = NavState::new(PathBuf::from("/a/b"));
        assert!(nav.go_parent());
        assert_eq!(nav.current_dir(), Path::new("/a"));
        assert!(nav.go_parent());
        assert!(!nav.go_parent());
        assert_eq!(nav.current_dir(), Path::new("/"));
    }

    #[test]
    fn rename_migrates_markers() {
        let mut nav = NavState::new(PathBuf::from("/w"));
        nav.set_items(vec![
            file_entry(Path::new("/w"), "old"),
            file_entry(Path::new("/w/old"), "inner"),
            file_entry(Path::new("/w"), "other"),
        ]);
        for entry in nav.items().to_vec() {
            nav.toggle_mark(&entry);
        }

        nav.rename_marked(Path::new("/w/old"), Path::new("/w/new"));
        assert_eq!(
            nav.marked_paths(),
            vec![
                PathBuf::from("/w/new"),
                PathBuf::from("/w/new/inner"),
                PathBuf::from("/w/other")
            ]
        );
    }

    #[test]
    fn enter_and_leave_real_directories() -> Result<(), Box<dyn error::Error>> {
        let base = tempdir()?;
        let sub = base.path().join("subdir");
        fs::create_dir(&sub)?;
        File::create(sub.join("inner.txt"))?;
        File::create(base.path().join("file.txt"))?;

        let mut cache = StatCache::default();
        let mut nav = NavState::new(base.path().to_path_buf());
        nav.set_items(list_dir(&mut cache, base.path(), false)?);

        let file = nav.items()[2].clone();
        assert!(!nav.enter(&file));
        assert_eq!(nav.current_dir(), base.path());

        nav.move_selection(1);
        let dir = nav.selected_entry().cloned().ok_or("nothing selected")?;
        assert!(nav.enter(&dir));
        assert_eq!(nav.current_dir(), sub.as_path());
        assert_eq!(nav.selected_idx(), 0);

        nav.set_items(list_dir(&mut cache, &sub, false)?);
        assert!(nav.select_path(&sub.join("inner.txt")));
        assert_eq!(nav.selected_idx(), 1);

        assert!(nav.go_parent());
        assert_eq!(nav.current_dir(), base.path());
        Ok(())
    }
}
