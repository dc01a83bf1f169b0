use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Receives every directory the cache actually reads.
///
/// A change in any recorded directory's listing invalidates whatever was
/// derived from it. Each path is reported once per [`crate::DirCache`], and
/// always before its listing becomes visible to other callers.
pub trait ImplicitDeps: Send + Sync {
    fn record_directory_dependency(&self, path: &Path);
}

/// Collects reported directories in report order.
#[derive(Debug, Default)]
pub struct RecordedDeps {
    dirs: Mutex<Vec<PathBuf>>,
}

impl RecordedDeps {
    pub fn directories(&self) -> Vec<PathBuf> {
        self.dirs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn take(&self) -> Vec<PathBuf> {
        std::mem::take(&mut *self.dirs.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl ImplicitDeps for RecordedDeps {
    fn record_directory_dependency(&self, path: &Path) {
        self.dirs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_path_buf());
    }
}
