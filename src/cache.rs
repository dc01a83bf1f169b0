use std::fmt;
use std::hash::BuildHasherDefault;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use rustc_hash::FxHasher;

use crate::{normalize::NormalizePath, DirCache, DirEntries, FileSystem, ImplicitDeps};

/// `None` until the one scan of the directory has finished.
type Slot = Arc<OnceCell<Arc<DirEntries>>>;

/// Directory listings keyed by normalised path, each filled at most once.
pub(crate) struct DirStore {
    slots: DashMap<PathBuf, Slot, BuildHasherDefault<FxHasher>>,
    fs: Arc<dyn FileSystem>,
    deps: Option<Arc<dyn ImplicitDeps>>,
}

impl DirStore {
    pub(crate) fn new(fs: Arc<dyn FileSystem>, deps: Option<Arc<dyn ImplicitDeps>>) -> Self {
        Self {
            slots: Default::default(),
            fs,
            deps,
        }
    }

    /// `key` must already be normalised.
    pub(crate) fn entries(&self, key: &Path) -> Arc<DirEntries> {
        let slot = self.claim(key);
        if let Some(cached) = slot.get() {
            tracing::trace!(dir = %key.display(), "dir cache hit");
            return Arc::clone(cached);
        }
        // Concurrent callers block here until the first one has scanned.
        Arc::clone(slot.get_or_init(|| self.scan(key)))
    }

    pub(crate) fn is_cached(&self, key: &Path) -> bool {
        self.slots
            .get(key)
            .map_or(false, |slot| slot.value().get().is_some())
    }

    // The map shard is locked only while the slot is looked up or inserted.
    fn claim(&self, key: &Path) -> Slot {
        if let Some(slot) = self.slots.get(key) {
            return Arc::clone(slot.value());
        }
        let slot = self.slots.entry(key.to_path_buf()).or_default();
        Arc::clone(slot.value())
    }

    fn scan(&self, key: &Path) -> Arc<DirEntries> {
        let entries = match self.fs.read_dir(key) {
            Ok(entries) => DirEntries::new(entries),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                tracing::debug!(dir = %key.display(), "directory does not exist");
                DirEntries::default()
            }
            Err(error) => {
                tracing::warn!(dir = %key.display(), %error, "failed to list directory");
                DirEntries::default()
            }
        };
        tracing::debug!(dir = %key.display(), entries = entries.len(), "scanned directory");
        // Recorded before the listing is published through the slot.
        if let Some(deps) = &self.deps {
            deps.record_directory_dependency(key);
        }
        Arc::new(entries)
    }
}

impl fmt::Debug for DirStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirStore")
            .field("dirs", &self.slots.len())
            .field("fs", &self.fs)
            .field("deps", &self.deps.is_some())
            .finish()
    }
}

impl DirCache {
    /// Returns the listing of `path`, reading the directory only on first use.
    ///
    /// Missing and unreadable directories are empty.
    pub fn dir_entries(&self, path: &Path) -> Arc<DirEntries> {
        self.store.entries(&path.normalize())
    }

    /// Joins `root` and `dir`, then behaves like [`DirCache::dir_entries`].
    pub fn dir_entries_in(&self, root: &Path, dir: &Path) -> Arc<DirEntries> {
        self.dir_entries(&root.join(dir))
    }

    /// Queues scans of `dirs` on the worker pool. Without a pool this does nothing;
    /// the directories are then scanned when first asked for.
    pub(crate) fn prefetch<I>(&self, dirs: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let Some(pool) = &self.pool else {
            return;
        };
        for dir in dirs {
            let key = dir.normalize().into_owned();
            if self.store.is_cached(&key) {
                continue;
            }
            let store = Arc::clone(&self.store);
            pool.spawn(move || {
                store.entries(&key);
            });
        }
    }
}
