//! Glob pattern sets for build byproducts.

use glob::{MatchOptions, Pattern};

use super::error::{BookError, BookResult};

/// Files that are never published: objects, editor backups, LaTeX
/// intermediates, IDE project files.
pub const DEFAULT_IGNORED_FILES: &[&str] = &[
    "*.o",
    "*.so",
    "*.a",
    "*.pyc",
    "*.bak",
    "*.swp",
    "*~",
    ".*~",
    "*.old",
    "tmp*",
    "temp*",
    ".#*",
    "#*",
    "*.log",
    "*.dvi",
    "*.aux",
    "*.blg",
    "*.idx",
    "*.nav",
    "*.out",
    "*.toc",
    "*.snm",
    "*.vrb",
    "*.cproject",
    "*.project",
    ".DS_Store",
    "Trash",
];

/// Wildcards never match a leading dot, so dotfiles need their own patterns.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// An unordered set of compiled glob patterns matched against file names.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Compile a set of patterns.
    pub fn new<I, S>(patterns: I) -> BookResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Pattern::new(p).map_err(|e| BookError::Pattern {
                    pattern: p.to_string(),
                    message: e.msg.to_string(),
                })
            })
            .collect::<BookResult<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Whether any pattern matches `file_name` (a bare name, not a path).
    pub fn matches(&self, file_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches_with(file_name, MATCH_OPTIONS))
    }

    /// Number of patterns in the set.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> PatternSet {
        PatternSet::new(DEFAULT_IGNORED_FILES).unwrap()
    }

    #[test]
    fn test_default_set_compiles() {
        assert_eq!(defaults().len(), DEFAULT_IGNORED_FILES.len());
    }

    #[test]
    fn test_matches_build_byproducts() {
        let set = defaults();
        let ignored = ["a.o", "lib.so", "x.pyc", "notes.txt~", ".vimrc~", "#draft#", ".#lock"];
        for name in ignored {
            assert!(set.matches(name), "{name} should be ignored");
        }
        assert!(set.matches("tmp1"));
        assert!(set.matches(".DS_Store"));
        assert!(set.matches("Trash"));
    }

    #[test]
    fn test_keeps_sources() {
        let set = defaults();
        for name in ["a.c", "main.py", "Makefile", "data.dat", "README"] {
            assert!(!set.matches(name), "{name} should be kept");
        }
    }

    #[test]
    fn test_wildcards_skip_dotfiles() {
        let set = defaults();
        for name in [".hidden.o", ".cache.pyc", ".tmprc", ".profile.log"] {
            assert!(!set.matches(name), "{name} should be kept");
        }
        // Dotfile patterns spell the dot out
        assert!(set.matches(".bashrc~"));
        assert!(set.matches(".#notes"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PatternSet::new(["[oops"]).unwrap_err();
        assert!(matches!(err, BookError::Pattern { ref pattern, .. } if pattern == "[oops"));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let set = PatternSet::new(Vec::<String>::new()).unwrap();
        assert!(set.is_empty());
        assert!(!set.matches("a.o"));
    }
}
