use thiserror::Error;

/// Authoring mistakes in a glob pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error(transparent)]
    Glob(#[from] globset::Error),
    #[error("'..' cannot follow a wildcard component")]
    ParentAfterWildcard,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: Box<str>,
        #[source]
        source: PatternError,
    },
}

pub type GlobResult<T> = Result<T, Error>;
