use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirCacheOptions {
    /// Threads used to prefetch listings of directories a glob is about to
    /// enter. `0` disables the pool and every scan runs on the caller.
    pub threads: usize,
    /// Let wildcards and `**` match names starting with `.`.
    pub match_hidden: bool,
    /// Classify symlinks by their target when listing the OS filesystem.
    pub follow_symlinks: bool,
}

impl Default for DirCacheOptions {
    fn default() -> Self {
        let threads = std::thread::available_parallelism()
            .map_or(4, |threads| threads.get())
            .min(8);
        Self {
            threads,
            match_hidden: false,
            follow_symlinks: true,
        }
    }
}
