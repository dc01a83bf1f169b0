use std::fmt::Debug;
use std::io;
use std::path::Path;

use crate::DirEntry;

/// The directory listing primitive behind [`crate::DirCache`].
///
/// An `Err` is never fatal: the cache treats it as an empty directory.
pub trait FileSystem: Send + Sync + Debug {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;
}

#[derive(Debug, Clone, Copy)]
pub struct OsFileSystem {
    follow_symlinks: bool,
}

impl OsFileSystem {
    pub fn new(follow_symlinks: bool) -> Self {
        Self { follow_symlinks }
    }
}

impl Default for OsFileSystem {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FileSystem for OsFileSystem {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    tracing::warn!(dir = %path.display(), %error, "skipping unreadable entry");
                    continue;
                }
            };
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(name) => {
                    tracing::warn!(dir = %path.display(), ?name, "skipping non UTF-8 name");
                    continue;
                }
            };
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(error) => {
                    tracing::warn!(
                        dir = %path.display(),
                        %name,
                        %error,
                        "skipping entry without file type"
                    );
                    continue;
                }
            };
            let is_symlink = file_type.is_symlink();
            let is_dir = if is_symlink && self.follow_symlinks {
                // dangling links are plain entries
                std::fs::metadata(entry.path()).map_or(false, |meta| meta.is_dir())
            } else {
                file_type.is_dir()
            };
            entries.push(DirEntry::new(name, is_dir).with_symlink(is_symlink));
        }
        Ok(entries)
    }
}
