//! Glob pattern parsing and single-component matching.
//!
//! A pattern is split on `/` into components. Within a component:
//! - `*` matches zero or more characters
//! - `?` matches exactly one character
//! - `[abc]`, `[a-z]` match one character of the set, `[!abc]` negates it
//! - `{a,b}` matches either alternative
//! - `\x` matches `x` literally
//!
//! A component that is exactly `**` matches zero or more directory levels.
//! Components without any of these are compared as plain names.

use globset::{GlobBuilder, GlobMatcher};

use crate::PatternError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Component {
    /// `..` that could not be folded into a preceding literal.
    Parent,
    Literal(Box<str>),
    Wildcard(Wildcard),
    /// `**`
    Recursive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pattern {
    absolute: bool,
    components: Vec<Component>,
}

impl Pattern {
    pub(crate) fn parse(pattern: &str) -> Result<Self, PatternError> {
        let absolute = pattern.starts_with('/');
        let mut components: Vec<Component> = Vec::new();
        for part in pattern.split('/') {
            match part {
                "" | "." => {}
                ".." => match components.last() {
                    Some(Component::Literal(_)) => {
                        components.pop();
                    }
                    None if absolute => {}
                    None | Some(Component::Parent) => components.push(Component::Parent),
                    Some(Component::Wildcard(_) | Component::Recursive) => {
                        return Err(PatternError::ParentAfterWildcard)
                    }
                },
                "**" => {
                    if components.last() != Some(&Component::Recursive) {
                        components.push(Component::Recursive);
                    }
                }
                part => components.push(Component::parse(part)?),
            }
        }
        Ok(Self {
            absolute,
            components,
        })
    }

    pub(crate) fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub(crate) fn components(&self) -> &[Component] {
        &self.components
    }

    pub(crate) fn recursive_count(&self) -> usize {
        self.components
            .iter()
            .filter(|component| matches!(component, Component::Recursive))
            .count()
    }
}

impl Component {
    fn parse(part: &str) -> Result<Self, PatternError> {
        if let Some(name) = unescape_literal(part) {
            return Ok(Component::Literal(name.into()));
        }
        let matcher = GlobBuilder::new(&collapse_stars(part))
            .literal_separator(true)
            .backslash_escape(true)
            .build()?
            .compile_matcher();
        Ok(Component::Wildcard(Wildcard {
            matcher,
            explicit_dot: part.starts_with('.'),
        }))
    }
}

/// `None` if `part` holds an unescaped metacharacter or ends in a dangling `\`.
fn unescape_literal(part: &str) -> Option<String> {
    let mut name = String::with_capacity(part.len());
    let mut chars = part.chars();
    while let Some(c) = chars.next() {
        match c {
            '*' | '?' | '[' | '{' => return None,
            '\\' => name.push(chars.next()?),
            c => name.push(c),
        }
    }
    Some(name)
}

// `a**b` is `a*b` inside a single component.
fn collapse_stars(part: &str) -> String {
    let mut glob = String::with_capacity(part.len());
    let mut chars = part.chars();
    let mut after_star = false;
    while let Some(c) = chars.next() {
        match c {
            '*' if after_star => continue,
            '\\' => {
                glob.push(c);
                glob.extend(chars.next());
                after_star = false;
            }
            c => {
                glob.push(c);
                after_star = c == '*';
            }
        }
    }
    glob
}

/// A single path component containing at least one wildcard.
#[derive(Debug, Clone)]
pub(crate) struct Wildcard {
    matcher: GlobMatcher,
    explicit_dot: bool,
}

impl Wildcard {
    /// A leading `.` in `name` has to be matched by a literal `.` unless
    /// `match_hidden` is set.
    pub(crate) fn matches(&self, name: &str, match_hidden: bool) -> bool {
        if !match_hidden && name.starts_with('.') && !self.explicit_dot {
            return false;
        }
        self.matcher.is_match(name)
    }
}

impl PartialEq for Wildcard {
    fn eq(&self, other: &Self) -> bool {
        self.matcher.glob() == other.matcher.glob()
    }
}

impl Eq for Wildcard {}

#[cfg(test)]
mod tests {
    use globset::ErrorKind;

    use super::*;

    fn glob_match(pattern: &str, name: &str) -> bool {
        match Component::parse(pattern).unwrap() {
            Component::Wildcard(wildcard) => wildcard.matches(name, false),
            Component::Literal(literal) => &*literal == name,
            other => panic!("unexpected component {other:?}"),
        }
    }

    fn literal(name: &str) -> Component {
        Component::Literal(name.into())
    }

    #[test]
    fn star_wildcard() {
        assert!(glob_match("*", "anything"));
        assert!(glob_match("*.rs", "main.rs"));
        assert!(glob_match("test*", "test"));
        assert!(glob_match("*test*", "mytestfile"));
        assert!(glob_match("a*b*c", "aXXXbYYYc"));
        assert!(glob_match("a**b", "ab"));
        assert!(!glob_match("*.rs", "main.txt"));
        assert!(!glob_match("test*", "mytest"));
        assert!(!glob_match("a*b*c", "aXXXbYYY"));
    }

    #[test]
    fn question_wildcard() {
        assert!(glob_match("test?", "test1"));
        assert!(glob_match("???", "abc"));
        assert!(!glob_match("?", ""));
        assert!(!glob_match("???", "ab"));
    }

    #[test]
    fn char_classes() {
        assert!(glob_match("[abc]", "b"));
        assert!(!glob_match("[abc]", "d"));
        assert!(glob_match("[a-z]", "m"));
        assert!(glob_match("[a-zA-Z]", "M"));
        assert!(!glob_match("[a-z]", "0"));
        assert!(glob_match("[!abc]", "d"));
        assert!(!glob_match("[!abc]", "a"));
        assert!(glob_match("[]]", "]"));
        assert!(glob_match("file[0-9].txt", "file5.txt"));
        assert!(!glob_match("file[0-9].txt", "filea.txt"));
    }

    #[test]
    fn escapes() {
        assert!(glob_match("\\*", "*"));
        assert!(!glob_match("\\*", "a"));
        assert!(glob_match("a\\?*", "a?bc"));
        assert!(glob_match("\\{a,b\\}", "{a,b}"));
    }

    #[test]
    fn hidden_names() {
        let Component::Wildcard(star) = Component::parse("*").unwrap() else {
            unreachable!()
        };
        assert!(!star.matches(".git", false));
        assert!(star.matches(".git", true));

        let Component::Wildcard(dot) = Component::parse(".*").unwrap() else {
            unreachable!()
        };
        assert!(dot.matches(".git", false));
    }

    #[test]
    fn literal_components() {
        assert_eq!(Component::parse("main.rs").unwrap(), literal("main.rs"));
        assert_eq!(Component::parse("a\\*b").unwrap(), literal("a*b"));
        assert_eq!(Component::parse("a,b}").unwrap(), literal("a,b}"));
    }

    #[test]
    fn alternatives() {
        assert!(glob_match("{a,b}", "a"));
        assert!(glob_match("*.{rs,toml}", "Cargo.toml"));
        assert!(!glob_match("*.{rs,toml}", "main.c"));
        assert!(!glob_match("{src,lib}", "srclib"));
    }

    fn error_kind(part: &str) -> ErrorKind {
        match Component::parse(part) {
            Err(PatternError::Glob(err)) => err.kind().clone(),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn malformed_components() {
        assert_eq!(error_kind("[abc"), ErrorKind::UnclosedClass);
        assert_eq!(error_kind("[]"), ErrorKind::UnclosedClass);
        assert_eq!(error_kind("abc\\"), ErrorKind::DanglingEscape);
        assert_eq!(error_kind("[z-a]"), ErrorKind::InvalidRange('z', 'a'));
        assert_eq!(error_kind("{a,b"), ErrorKind::UnclosedAlternates);
    }

    #[test]
    fn split_pattern() {
        let pattern = Pattern::parse("src//./**/**/*.rs").unwrap();
        assert!(!pattern.is_absolute());
        assert_eq!(pattern.components().len(), 3);
        assert_eq!(pattern.components()[0], literal("src"));
        assert_eq!(pattern.components()[1], Component::Recursive);
        assert!(matches!(pattern.components()[2], Component::Wildcard(_)));
        assert_eq!(pattern.recursive_count(), 1);

        assert!(Pattern::parse("").unwrap().components().is_empty());
        assert!(Pattern::parse("/usr/*").unwrap().is_absolute());
    }

    #[test]
    fn parent_components() {
        let pattern = Pattern::parse("../a/b/../c").unwrap();
        assert_eq!(
            pattern.components(),
            &[Component::Parent, literal("a"), literal("c")]
        );
        assert_eq!(
            Pattern::parse("/../a").unwrap().components(),
            &[literal("a")]
        );
        assert_eq!(
            Pattern::parse("*/../a"),
            Err(PatternError::ParentAfterWildcard)
        );
        assert_eq!(
            Pattern::parse("**/.."),
            Err(PatternError::ParentAfterWildcard)
        );
    }
}
