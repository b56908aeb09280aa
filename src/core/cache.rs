//! Time and size bounded stat cache.
//!
//! Listing a large directory stats every entry. [StatCache] keeps the result per absolute
//! path for a short TTL so that re-listing the same directory (after a filter change, a
//! toggle, or returning from a subdirectory) does not hit the filesystem again.
//!
//! Entries live in an [LruCache] ordered by refresh time, not access time: hits use
//! `peek`, so they never make an entry younger, and only a fresh stat moves a path to the
//! front. Stat failures never escape; the caller only sees `None`.

use crate::core::fm::FileMetadata;

use lru::LruCache;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Default validity window of a cached stat.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5);
/// Default maximum number of cached paths.
pub const DEFAULT_CAPACITY: usize = 5000;

/// Where the cache gets fresh metadata from.
pub trait StatSource {
    fn stat(&mut self, path: &Path) -> io::Result<FileMetadata>;
}

/// Stats the real filesystem, following symlinks.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStat;

impl StatSource for FsStat {
    fn stat(&mut self, path: &Path) -> io::Result<FileMetadata> {
        fs::metadata(path).map(|md| FileMetadata::from_std(&md))
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    metadata: FileMetadata,
    fetched_at: Instant,
}

/// Per-path metadata cache with a TTL and a capacity bound.
///
/// The underlying [LruCache] is unbounded; the bound is enforced in `cleanup` so that
/// expired entries go before live ones.
pub struct StatCache<S: StatSource = FsStat> {
    source: S,
    entries: LruCache<PathBuf, CacheEntry>,
    ttl: Duration,
    capacity: usize,
}

impl StatCache<FsStat> {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self::with_source(FsStat, ttl, capacity)
    }
}

impl Default for StatCache<FsStat> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}

impl<S: StatSource> StatCache<S> {
    pub fn with_source(source: S, ttl: Duration, capacity: usize) -> Self {
        Self {
            source,
            entries: LruCache::unbounded(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    // Getters / accessors

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains(path)
    }

    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    // Cache functions

    /// Returns the metadata for `path`, from the cache when it is still fresh.
    ///
    /// Any stat error removes a stale entry for the path and yields `None`.
    pub fn get(&mut self, path: &Path) -> Option<FileMetadata> {
        let now = Instant::now();

        if let Some(cached) = self.entries.peek(path)
            && now.duration_since(cached.fetched_at) < self.ttl
        {
            return Some(cached.metadata.clone());
        }

        match self.source.stat(path) {
            Ok(metadata) => {
                self.entries.push(
                    path.to_path_buf(),
                    CacheEntry {
                        metadata: metadata.clone(),
                        fetched_at: now,
                    },
                );
                if self.entries.len() > self.capacity {
                    self.cleanup(now);
                }
                Some(metadata)
            }
            Err(e) => {
                if self.entries.pop(path).is_some() {
                    tracing::debug!(path = %path.display(), error = %e, "dropped cached stat");
                }
                None
            }
        }
    }

    /// Removes every cached path that starts with `prefix`.
    pub fn invalidate(&mut self, prefix: &Path) {
        let stale: Vec<PathBuf> = self
            .entries
            .iter()
            .filter(|(path, _)| path.starts_with(prefix))
            .map(|(path, _)| path.clone())
            .collect();
        for path in &stale {
            self.entries.pop(path);
        }
        tracing::debug!(
            prefix = %prefix.display(),
            removed = stale.len(),
            "invalidated stat cache"
        );
    }

    /// Drops every cached entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drops expired entries, then the least recently refreshed ones until the capacity
    /// bound holds.
    ///
    /// The LRU end holds the oldest refresh, so expired entries are all found there.
    fn cleanup(&mut self, now: Instant) {
        let ttl = self.ttl;
        let mut expired = 0;
        while self
            .entries
            .peek_lru()
            .is_some_and(|(_, entry)| now.duration_since(entry.fetched_at) > ttl)
        {
            self.entries.pop_lru();
            expired += 1;
        }

        let mut evicted = 0;
        while self.entries.len() > self.capacity {
            self.entries.pop_lru();
            evicted += 1;
        }
        tracing::debug!(expired, evicted, "stat cache over capacity");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::{HashMap, HashSet};
    use std::fs::File;
    use std::thread;
    use tempfile::tempdir;

    /// Counts stat calls and serves every path that is not in `missing`.
    #[derive(Default)]
    struct CountingStat {
        calls: HashMap<PathBuf, usize>,
        missing: HashSet<PathBuf>,
    }

    impl CountingStat {
        fn calls_for(&self, path: &Path) -> usize {
            self.calls.get(path).copied().unwrap_or(0)
        }
    }

    impl StatSource for CountingStat {
        fn stat(&mut self, path: &Path) -> io::Result<FileMetadata> {
            *self.calls.entry(path.to_path_buf()).or_default() += 1;
            if self.missing.contains(path) {
                return Err(io::Error::from(io::ErrorKind::NotFound));
            }
            Ok(FileMetadata::new(false, 1, None))
        }
    }

    #[test]
    fn hit_within_ttl_skips_stat() {
        let mut cache =
            StatCache::with_source(CountingStat::default(), Duration::from_secs(60), 10);
        let path = Path::new("/virtual/a.txt");

        assert!(cache.get(path).is_some());
        assert!(cache.get(path).is_some());
        assert!(cache.get(path).is_some());
        assert_eq!(cache.source().calls_for(path), 1);
    }

    #[test]
    fn expired_entry_is_refetched() {
        let mut cache =
            StatCache::with_source(CountingStat::default(), Duration::from_millis(30), 10);
        let path = Path::new("/virtual/a.txt");

        cache.get(path);
        thread::sleep(Duration::from_millis(60));
        cache.get(path);
        assert_eq!(cache.source().calls_for(path), 2);
    }

    #[test]
    fn capacity_keeps_most_recent() {
        let mut cache =
            StatCache::with_source(CountingStat::default(), Duration::from_secs(60), 3);
        let paths: Vec<PathBuf> = (0..10)
            .map(|i| PathBuf::from(format!("/virtual/f{i}")))
            .collect();

        for p in &paths {
            cache.get(p);
            assert!(cache.len() <= 3);
        }

        assert_eq!(cache.len(), 3);
        for p in &paths[7..] {
            assert!(cache.contains(p), "{p:?} should be cached");
        }
        for p in &paths[..7] {
            assert!(!cache.contains(p), "{p:?} should be evicted");
        }
    }

    #[test]
    fn hits_do_not_protect_from_eviction() {
        let mut cache =
            StatCache::with_source(CountingStat::default(), Duration::from_secs(60), 2);
        let first = Path::new("/virtual/first");
        let second = Path::new("/virtual/second");
        let third = Path::new("/virtual/third");

        cache.get(first);
        cache.get(second);
        cache.get(first);
        cache.get(third);

        assert!(!cache.contains(first));
        assert!(cache.contains(second));
        assert!(cache.contains(third));
        assert_eq!(cache.source().calls_for(first), 1);
    }

    #[test]
    fn cleanup_drops_expired_first() {
        let mut cache =
            StatCache::with_source(CountingStat::default(), Duration::from_millis(30), 3);
        for i in 0..3 {
            cache.get(&PathBuf::from(format!("/virtual/old{i}")));
        }
        thread::sleep(Duration::from_millis(60));

        cache.get(Path::new("/virtual/new"));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(Path::new("/virtual/new")));
    }

    #[test]
    fn failure_removes_entry() {
        let mut cache =
            StatCache::with_source(CountingStat::default(), Duration::from_millis(10), 10);
        let path = PathBuf::from("/virtual/gone.txt");

        assert!(cache.get(&path).is_some());
        assert!(cache.contains(&path));

        cache.source.missing.insert(path.clone());
        thread::sleep(Duration::from_millis(20));

        assert!(cache.get(&path).is_none());
        assert!(!cache.contains(&path));
    }

    #[test]
    fn deleted_file_on_disk_reports_absence() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("test.txt");
        File::create(&path)?;

        let mut cache = StatCache::new(Duration::ZERO, 10);
        assert!(cache.get(&path).is_some());

        fs::remove_file(&path)?;
        assert!(cache.get(&path).is_none());
        assert!(!cache.contains(&path));
        assert!(cache.get(Path::new("/nonexistent/file.txt")).is_none());
        Ok(())
    }

    #[test]
    fn invalidate_by_prefix() {
        let mut cache =
            StatCache::with_source(CountingStat::default(), Duration::from_secs(60), 10);
        cache.get(Path::new("/a/one"));
        cache.get(Path::new("/a/two"));
        cache.get(Path::new("/b/three"));

        cache.invalidate(Path::new("/a"));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(Path::new("/b/three")));

        cache.clear();
        assert!(cache.is_empty());
    }
}
