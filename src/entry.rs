use std::ops::Deref;

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DirEntry {
    // `name` must stay the first field: the derived ordering sorts listings by name.
    name: Box<str>,
    is_dir: bool,
    is_symlink: bool,
}

impl DirEntry {
    pub fn new(name: impl Into<Box<str>>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            is_dir,
            is_symlink: false,
        }
    }

    #[must_use]
    pub fn with_symlink(self, is_symlink: bool) -> Self {
        Self { is_symlink, ..self }
    }

    /// Base name, never containing a separator.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `true` for directories, including symlinks that resolve to one.
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    pub fn is_symlink(&self) -> bool {
        self.is_symlink
    }

    pub(crate) fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// Snapshot of a directory, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirEntries(Box<[DirEntry]>);

impl DirEntries {
    pub fn new(mut entries: Vec<DirEntry>) -> Self {
        entries.sort_unstable();
        entries.dedup_by(|a, b| a.name == b.name);
        Self(entries.into_boxed_slice())
    }

    /// Looks up a child by exact name.
    pub fn find(&self, name: &str) -> Option<&DirEntry> {
        self.0
            .binary_search_by(|entry| entry.name().cmp(name))
            .ok()
            .map(|index| &self.0[index])
    }

    pub fn dirs(&self) -> impl Iterator<Item = &DirEntry> {
        self.0.iter().filter(|entry| entry.is_dir)
    }
}

impl Deref for DirEntries {
    type Target = [DirEntry];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a DirEntries {
    type Item = &'a DirEntry;
    type IntoIter = std::slice::Iter<'a, DirEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
