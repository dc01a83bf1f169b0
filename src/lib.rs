//! # dircache
//!
//! Directory listings for a build tool's dependency tracker. Each directory is
//! read from disk at most once per [`DirCache`]; glob patterns, including `**`,
//! are matched against the cached listings, and every directory actually read
//! is reported to an [`ImplicitDeps`] so the build can be invalidated when a
//! listing changes.
//!
//! ## How to use?
//!
//! ```rust,no_run
//! // |-- src
//! // |---- main.rs
//! // |---- util
//! // |------ mod.rs
//!
//! use std::{path::Path, sync::Arc};
//! use dircache::{DirCache, RecordedDeps};
//!
//! let deps = Arc::new(RecordedDeps::default());
//! let cache = DirCache::builder().deps(deps.clone()).build();
//!
//! cache
//!     .glob(Path::new("."), "src/**/*.rs", |path, is_dir| {
//!         println!("{} {is_dir}", path.display());
//!     })
//!     .unwrap();
//! // -> src/main.rs false
//! // -> src/util/mod.rs false
//!
//! deps.directories();
//! // -> [".", "src", "src/util"]
//! ```

mod builder;
mod cache;
mod deps;
mod entry;
mod error;
mod fs;
mod glob;
mod log;
mod normalize;
mod options;
mod pattern;

pub use builder::DirCacheBuilder;
pub use deps::{ImplicitDeps, RecordedDeps};
pub use entry::{DirEntries, DirEntry};
pub use error::*;
pub use fs::{FileSystem, OsFileSystem};
pub use normalize::NormalizePath;
pub use options::DirCacheOptions;

use cache::DirStore;
use std::sync::Arc;

/// Memoized directory listings for one build session.
///
/// Listings are never refreshed; a new session starts with a new cache.
#[derive(Debug)]
pub struct DirCache {
    pub options: DirCacheOptions,
    pub(crate) store: Arc<DirStore>,
    /// Scans listings ahead of a glob; `None` when `options.threads == 0`.
    pub(crate) pool: Option<rayon::ThreadPool>,
}

impl DirCache {
    pub fn new(deps: Option<Arc<dyn ImplicitDeps>>) -> Self {
        let builder = Self::builder();
        match deps {
            Some(deps) => builder.deps(deps).build(),
            None => builder.build(),
        }
    }

    pub fn builder() -> DirCacheBuilder {
        DirCacheBuilder::default()
    }
}

impl Default for DirCache {
    fn default() -> Self {
        Self::new(None)
    }
}
