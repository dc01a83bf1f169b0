use std::sync::Arc;

use crate::cache::DirStore;
use crate::log;
use crate::{DirCache, DirCacheOptions, FileSystem, ImplicitDeps, OsFileSystem};

#[derive(Default)]
pub struct DirCacheBuilder {
    options: DirCacheOptions,
    fs: Option<Arc<dyn FileSystem>>,
    deps: Option<Arc<dyn ImplicitDeps>>,
}

impl DirCacheBuilder {
    #[must_use]
    pub fn options(self, options: DirCacheOptions) -> Self {
        Self { options, ..self }
    }

    /// Replaces the OS filesystem. `options.follow_symlinks` only applies to the default.
    #[must_use]
    pub fn fs(self, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs: Some(fs),
            ..self
        }
    }

    #[must_use]
    pub fn deps(self, deps: Arc<dyn ImplicitDeps>) -> Self {
        Self {
            deps: Some(deps),
            ..self
        }
    }

    pub fn build(self) -> DirCache {
        log::enable_by_env();

        let options = self.options;
        let fs = self
            .fs
            .unwrap_or_else(|| Arc::new(OsFileSystem::new(options.follow_symlinks)));
        let pool = build_pool(options.threads);
        DirCache {
            store: Arc::new(DirStore::new(fs, self.deps)),
            pool,
            options,
        }
    }
}

fn build_pool(threads: usize) -> Option<rayon::ThreadPool> {
    if threads == 0 {
        return None;
    }
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|index| format!("dircache-scan-{index}"))
        .build()
    {
        Ok(pool) => Some(pool),
        Err(error) => {
            tracing::warn!(%error, "failed to start scan pool, scanning on the caller");
            None
        }
    }
}
