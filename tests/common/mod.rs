#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dircache::{DirCache, DirCacheOptions, DirEntry, FileSystem, RecordedDeps};
use tempfile::TempDir;

/// In-memory tree that counts every `read_dir`.
#[derive(Debug, Default)]
pub struct MemoryFs {
    dirs: HashMap<PathBuf, Vec<DirEntry>>,
    denied: HashSet<PathBuf>,
    delay: Duration,
    reads: Mutex<HashMap<PathBuf, usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MemoryFs {
    /// A trailing `/` marks a directory; parents are created as needed.
    pub fn new(paths: &[&str]) -> Self {
        let mut fs = Self::default();
        for path in paths {
            let is_dir = path.ends_with('/');
            fs.add(Path::new(path.trim_end_matches('/')), is_dir);
        }
        fs
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }

    pub fn deny(mut self, path: &str) -> Self {
        self.denied.insert(PathBuf::from(path));
        self
    }

    fn add(&mut self, path: &Path, is_dir: bool) {
        if is_dir {
            self.dirs.entry(path.to_path_buf()).or_default();
        }
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return;
        };
        let name = name.to_str().unwrap();
        let siblings = self.dirs.entry(parent.to_path_buf()).or_default();
        if !siblings.iter().any(|entry| entry.name() == name) {
            siblings.push(DirEntry::new(name, is_dir));
        }
        self.add(parent, true);
    }

    pub fn reads(&self, path: &str) -> usize {
        self.reads
            .lock()
            .unwrap()
            .get(Path::new(path))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_reads(&self) -> usize {
        self.reads.lock().unwrap().values().sum()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl FileSystem for MemoryFs {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        *self
            .reads
            .lock()
            .unwrap()
            .entry(path.to_path_buf())
            .or_default() += 1;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.denied.contains(path) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        self.dirs
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }
}

pub fn options(threads: usize) -> DirCacheOptions {
    DirCacheOptions {
        threads,
        ..Default::default()
    }
}

pub fn memory_cache(fs: &Arc<MemoryFs>, threads: usize) -> (DirCache, Arc<RecordedDeps>) {
    let deps = Arc::new(RecordedDeps::default());
    let cache = DirCache::builder()
        .options(options(threads))
        .fs(fs.clone())
        .deps(deps.clone())
        .build();
    (cache, deps)
}

pub fn os_cache(options: DirCacheOptions) -> (DirCache, Arc<RecordedDeps>) {
    let deps = Arc::new(RecordedDeps::default());
    let cache = DirCache::builder()
        .options(options)
        .deps(deps.clone())
        .build();
    (cache, deps)
}

/// Real directory tree; a trailing `/` marks a directory.
pub fn tree(paths: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for path in paths {
        let full = dir.path().join(path.trim_end_matches('/'));
        if path.ends_with('/') {
            std::fs::create_dir_all(&full).unwrap();
        } else {
            std::fs::create_dir_all(full.parent().unwrap()).unwrap();
            std::fs::write(&full, b"").unwrap();
        }
    }
    dir
}

pub fn glob(cache: &DirCache, root: &Path, pattern: &str) -> Vec<(String, bool)> {
    let mut matches = Vec::new();
    cache
        .glob(root, pattern, |path, is_dir| {
            matches.push((path.display().to_string(), is_dir))
        })
        .unwrap();
    matches
}

pub fn sorted(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths.sort();
    paths
}
