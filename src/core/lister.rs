//! Directory listing for sgt.
//!
//! [list_dir] turns one directory into the ordered entry list shown to the user:
//! the pinned `..` entry first (except at the root), then directories, then files, each
//! group sorted case-insensitively. All metadata goes through the [StatCache].

use crate::core::cache::{StatCache, StatSource};
use crate::core::fm::Entry;
use crate::error::{Result, SgtError};

use std::fs;
use std::path::Path;

/// Lists `dir` through the stat cache.
///
/// Entries whose stat fails (removed in the meantime, permission denied) are skipped.
/// Owner and permission labels are resolved only when `show_ownership` is set.
///
/// # Errors
/// Returns [SgtError::ReadDir] when `dir` itself cannot be enumerated.
pub fn list_dir<S: StatSource>(
    cache: &mut StatCache<S>,
    dir: &Path,
    show_ownership: bool,
) -> Result<Vec<Entry>> {
    let read = fs::read_dir(dir).map_err(|source| SgtError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut directories = Vec::new();
    let mut files = Vec::new();

    for entry in read {
        let Ok(entry) = entry else {
            continue;
        };

        let name = entry.file_name();
        let path = dir.join(&name);
        let Some(metadata) = cache.get(&path) else {
            continue;
        };

        let metadata = if show_ownership {
            metadata.with_ownership()
        } else {
            metadata
        };

        let item = Entry::new(name, path, metadata);
        if item.is_dir() {
            directories.push(item);
        } else {
            files.push(item);
        }
    }

    sort_entries(&mut directories);
    sort_entries(&mut files);

    let mut items = Vec::with_capacity(directories.len() + files.len() + 1);
    if let Some(parent) = dir.parent() {
        items.push(Entry::parent(parent));
    }
    items.extend(directories);
    items.extend(files);

    tracing::debug!(dir = %dir.display(), count = items.len(), "listed directory");
    Ok(items)
}

/// Sorts entries by lowercase name. Names equal up to case fall back to byte order so the
/// result does not depend on enumeration order.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| {
        a.lowercase_name()
            .cmp(b.lowercase_name())
            .then_with(|| a.name().cmp(b.name()))
    });
}

/// Returns the entries whose name contains `filter` (case-insensitive).
///
/// The `..` entry is always kept. An empty filter keeps everything.
pub fn filter_entries(all: &[Entry], filter: &str) -> Vec<Entry> {
    if filter.is_empty() {
        return all.to_vec();
    }

    let needle = filter.to_lowercase();
    all.iter()
        .filter(|e| e.is_parent() || e.lowercase_name().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::core::fm::{EntryKind, FileMetadata};
    use rand::rng;
    use rand::seq::SliceRandom;
    use std::ffi::OsString;
    use std::fs::File;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::tempdir;

    fn names(entries: &[Entry]) -> Vec<String> {
        entries.iter().map(|e| e.name_str().into_owned()).collect()
    }

    #[test]
    fn dirs_first_then_case_insensitive() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        for f in ["zebra.txt", "alpha.txt", "beta.txt"] {
            File::create(dir.path().join(f))?;
        }
        for d in ["z_dir", "a_dir"] {
            fs::create_dir(dir.path().join(d))?;
        }

        let mut cache = StatCache::default();
        let entries = list_dir(&mut cache, dir.path(), false)?;

        assert_eq!(
            names(&entries),
            vec!["..", "a_dir", "z_dir", "alpha.txt", "beta.txt", "zebra.txt"]
        );
        assert_eq!(entries[1].kind(), EntryKind::Directory);
        assert_eq!(entries[3].kind(), EntryKind::File);
        Ok(())
    }

    #[test]
    fn mixed_case_sorting() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        for f in ["Banana", "apple", "Cherry", ".hidden"] {
            File::create(dir.path().join(f))?;
        }

        let mut cache = StatCache::default();
        let entries = list_dir(&mut cache, dir.path(), false)?;
        assert_eq!(
            names(&entries),
            vec!["..", ".hidden", "apple", "Banana", "Cherry"]
        );
        Ok(())
    }

    #[test]
    fn sort_is_independent_of_input_order() {
        let mut entries: Vec<Entry> = ["delta", "Alpha", "charlie", "bravo", "alpha"]
            .iter()
            .map(|n| {
                Entry::new(
                    OsString::from(n),
                    PathBuf::from("/v").join(n),
                    FileMetadata::new(false, 0, None),
                )
            })
            .collect();
        entries.shuffle(&mut rng());
        sort_entries(&mut entries);
        assert_eq!(
            names(&entries),
            vec!["Alpha", "alpha", "bravo", "charlie", "delta"]
        );
    }

    #[test]
    fn empty_dir_has_only_parent() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let mut cache = StatCache::default();
        let entries = list_dir(&mut cache, dir.path(), false)?;

        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_parent());
        assert_eq!(Some(entries[0].path()), dir.path().parent());
        Ok(())
    }

    #[test]
    fn root_has_no_parent_entry() -> Result<(), Box<dyn std::error::Error>> {
        let root = Path::new("/");
        if !root.is_dir() {
            return Ok(());
        }
        let mut cache = StatCache::default();
        let entries = list_dir(&mut cache, root, false)?;
        assert!(entries.iter().all(|e| !e.is_parent()));
        Ok(())
    }

    #[test]
    fn ownership_is_lazy() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        File::create(dir.path().join("file.txt"))?;
        let mut cache = StatCache::default();

        let plain = list_dir(&mut cache, dir.path(), false)?;
        let meta = plain[1].metadata().ok_or("missing metadata")?;
        assert!(meta.owner().is_none());
        assert!(meta.permissions().is_none());

        let owned = list_dir(&mut cache, dir.path(), true)?;
        let meta = owned[1].metadata().ok_or("missing metadata")?;
        assert!(meta.owner().is_some());
        assert!(meta.permissions().is_some());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn broken_symlink_is_skipped() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        File::create(dir.path().join("real.txt"))?;
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling"))?;

        let mut cache = StatCache::default();
        let entries = list_dir(&mut cache, dir.path(), false)?;
        assert_eq!(names(&entries), vec!["..", "real.txt"]);
        Ok(())
    }

    #[test]
    fn listing_uses_cache() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        File::create(dir.path().join("a.txt"))?;

        let mut cache = StatCache::new(Duration::from_secs(60), 100);
        list_dir(&mut cache, dir.path(), false)?;
        assert!(cache.contains(&dir.path().join("a.txt")));
        assert!(!cache.contains(dir.path().parent().ok_or("no parent")?));
        Ok(())
    }

    #[test]
    fn missing_dir_is_an_error() {
        let mut cache = StatCache::default();
        let result = list_dir(&mut cache, Path::new("/path/does/not/exist"), false);
        assert!(matches!(result, Err(SgtError::ReadDir { .. })));
    }

    #[test]
    fn filter_keeps_parent() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        for f in ["main.rs", "lib.rs", "README.md"] {
            File::create(dir.path().join(f))?;
        }
        let mut cache = StatCache::default();
        let all = list_dir(&mut cache, dir.path(), false)?;

        let none = filter_entries(&all, "xyz");
        assert_eq!(names(&none), vec![".."]);

        let rs = filter_entries(&all, "RS");
        assert_eq!(names(&rs), vec!["..", "lib.rs", "main.rs"]);

        assert_eq!(filter_entries(&all, "").len(), all.len());
        Ok(())
    }
}
