use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::pattern::{Component, Pattern};
use crate::normalize::NormalizePath;
use crate::{DirCache, DirEntries, DirEntry, Error, GlobResult};

impl DirCache {
    /// Calls `callback(path, is_dir)` for every path under `root` matching
    /// `pattern`. Paths are relative to `root` unless the pattern is absolute.
    ///
    /// Matches come out in name order at every directory level. A malformed
    /// pattern fails before any directory is read; a missing directory simply
    /// has no matches.
    pub fn glob<F>(&self, root: &Path, pattern: &str, callback: F) -> GlobResult<()>
    where
        F: FnMut(&Path, bool),
    {
        self.glob_at(root, Path::new(""), pattern, callback)
    }

    /// Like [`DirCache::glob`], for callers that only need the path.
    pub fn glob2<F>(&self, root: &Path, pattern: &str, mut callback: F) -> GlobResult<()>
    where
        F: FnMut(&Path),
    {
        self.glob(root, pattern, |path, _| callback(path))
    }

    /// Matches `pattern` inside `dir`, a plain directory path relative to `root`.
    /// Reported paths are relative to `root`, so they start with `dir`.
    #[tracing::instrument(level = "debug", skip(self, callback))]
    pub fn glob_at<F>(&self, root: &Path, dir: &Path, pattern: &str, callback: F) -> GlobResult<()>
    where
        F: FnMut(&Path, bool),
    {
        let parsed = Pattern::parse(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.into(),
            source,
        })?;
        let mut matcher = Matcher {
            cache: self,
            root,
            components: parsed.components(),
            match_hidden: self.options.match_hidden,
            // several `**` can reach one path in more than one way
            seen: (parsed.recursive_count() > 1).then(FxHashSet::default),
            callback,
        };
        let mut path = if parsed.is_absolute() {
            PathBuf::from("/")
        } else {
            dir.to_path_buf()
        };
        matcher.walk(&mut path, 0);
        Ok(())
    }

    /// Collects the matches of [`DirCache::glob`] in report order.
    pub fn glob_paths(&self, root: &Path, pattern: &str) -> GlobResult<Vec<PathBuf>> {
        let mut paths = Vec::new();
        self.glob2(root, pattern, |path| paths.push(path.to_path_buf()))?;
        Ok(paths)
    }
}

struct Matcher<'a, F> {
    cache: &'a DirCache,
    root: &'a Path,
    components: &'a [Component],
    match_hidden: bool,
    seen: Option<FxHashSet<PathBuf>>,
    callback: F,
}

impl<F> Matcher<'_, F>
where
    F: FnMut(&Path, bool),
{
    /// Matches `components[index..]` inside `path`, the directory matched so far.
    fn walk(&mut self, path: &mut PathBuf, index: usize) {
        let components = self.components;
        let Some(component) = components.get(index) else {
            return;
        };
        // Only the last component may match a file.
        let match_dirs = index + 1 < components.len();

        match component {
            Component::Parent => {
                if !self.is_dir(path) {
                    return;
                }
                path.push("..");
                if match_dirs {
                    self.walk(path, index + 1);
                } else {
                    self.emit(path, true);
                }
                path.pop();
            }
            Component::Literal(name) => {
                let entries = self.entries(path);
                if let Some(entry) = entries.find(name) {
                    self.visit(path, entry, index, match_dirs);
                }
            }
            Component::Wildcard(wildcard) => {
                let entries = self.entries(path);
                let match_hidden = self.match_hidden;
                let matched: Vec<&DirEntry> = entries
                    .iter()
                    .filter(|entry| !match_dirs || entry.is_dir())
                    .filter(|entry| wildcard.matches(entry.name(), match_hidden))
                    .collect();
                if match_dirs {
                    self.prefetch(path, &matched);
                }
                for entry in matched {
                    self.visit(path, entry, index, match_dirs);
                }
            }
            Component::Recursive => self.descend(path, index, match_dirs),
        }
    }

    fn visit(&mut self, path: &mut PathBuf, entry: &DirEntry, index: usize, match_dirs: bool) {
        path.push(entry.name());
        if !match_dirs {
            self.emit(path, entry.is_dir());
        } else if entry.is_dir() {
            self.walk(path, index + 1);
        }
        path.pop();
    }

    /// `**` at `index`: the rest of the pattern is tried here, then the same
    /// `**` is re-applied in every subdirectory. A trailing `**` matches every
    /// entry below `path`. Symlinked directories are never descended into.
    fn descend(&mut self, path: &mut PathBuf, index: usize, match_dirs: bool) {
        if match_dirs {
            self.walk(path, index + 1);
        }

        let entries = self.entries(path);
        let match_hidden = self.match_hidden;
        let visible: Vec<&DirEntry> = entries
            .iter()
            .filter(|entry| match_hidden || !entry.is_hidden())
            .collect();
        let subdirs: Vec<&DirEntry> = entries
            .dirs()
            .filter(|entry| match_hidden || !entry.is_hidden())
            .filter(|entry| !entry.is_symlink())
            .collect();
        self.prefetch(path, &subdirs);

        if match_dirs {
            for entry in subdirs {
                path.push(entry.name());
                self.walk(path, index);
                path.pop();
            }
        } else {
            for entry in visible {
                path.push(entry.name());
                self.emit(path, entry.is_dir());
                if entry.is_dir() && !entry.is_symlink() {
                    self.walk(path, index);
                }
                path.pop();
            }
        }
    }

    fn entries(&self, path: &Path) -> Arc<DirEntries> {
        self.cache.dir_entries_in(self.root, path)
    }

    /// Existence check through the parent's listing, so a missing directory
    /// still leaves a dependency behind. Paths without a final name (`/`,
    /// `.`, leading `..`) are taken to exist.
    fn is_dir(&self, path: &Path) -> bool {
        let dir = self.root.join(path);
        let dir = dir.normalize();
        match (dir.parent(), dir.file_name()) {
            (Some(parent), Some(name)) => self
                .cache
                .dir_entries(parent)
                .find(&name.to_string_lossy())
                .map_or(false, DirEntry::is_dir),
            _ => true,
        }
    }

    /// Starts scanning directories the walk is certain to enter.
    fn prefetch(&self, path: &Path, dirs: &[&DirEntry]) {
        if dirs.is_empty() {
            return;
        }
        let parent = self.root.join(path);
        self.cache
            .prefetch(dirs.iter().map(|entry| parent.join(entry.name())));
    }

    fn emit(&mut self, path: &Path, is_dir: bool) {
        if let Some(seen) = &mut self.seen {
            if !seen.insert(path.to_path_buf()) {
                return;
            }
        }
        (self.callback)(path, is_dir);
    }
}
