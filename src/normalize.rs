use std::borrow::Cow;
use std::path::{is_separator, Component, Path, PathBuf};

/// Lexical normalisation used for cache keys. Symlinks are not resolved.
pub trait NormalizePath {
    fn normalize(&self) -> Cow<'_, Path>;
}

impl NormalizePath for Path {
    fn normalize(&self) -> Cow<'_, Path> {
        let is_normal = !self.as_os_str().is_empty()
            && !has_redundant_separators(self)
            && !self
                .components()
                .any(|component| matches!(component, Component::CurDir | Component::ParentDir));
        if is_normal {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(normalize_path(self))
        }
    }
}

/// `a//b` and `a/b/` name the same directory as `a/b`.
fn has_redundant_separators(path: &Path) -> bool {
    let Some(path) = path.to_str() else {
        return true;
    };
    let mut previous = false;
    for c in path.chars() {
        let is_sep = is_separator(c);
        if is_sep && previous {
            return true;
        }
        previous = is_sep;
    }
    previous && path.len() > 1
}

fn normalize_path(path: &Path) -> PathBuf {
    let normalized = path
        .components()
        .fold(PathBuf::new(), |mut acc, path_component| {
            match path_component {
                Component::Prefix(prefix) => acc.push(prefix.as_os_str()),
                Component::Normal(name) => acc.push(name),
                Component::RootDir => acc.push("/"),
                Component::CurDir => {}
                Component::ParentDir => match acc.components().next_back() {
                    Some(Component::Normal(_)) => {
                        acc.pop();
                    }
                    // `/..` is `/`
                    Some(Component::RootDir | Component::Prefix(_)) => {}
                    _ => acc.push(".."),
                },
            }
            acc
        });
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}
