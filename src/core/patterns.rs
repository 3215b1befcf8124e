//! Include/exclude pattern matching
//!
//! Patterns are shell-style globs (`*`, `?`, character classes)
//! matched against the base name of a candidate path. Exclude patterns
//! additionally match when their raw text occurs anywhere in the
//! relative path, which lets a bare directory name like `node_modules`
//! exclude that directory at any depth. The substring rule is
//! deliberately broad: an exclude pattern `log` also drops a file
//! named `catalog.txt`. A pattern that fails to compile never matches.

use globset::{Glob, GlobMatcher};

/// Exclude set used when the caller supplies none: common binary and
/// archive extensions, dependency and VCS directories, OS artifacts
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "*.exe",
    "*.dll",
    "*.so",
    "*.dylib",
    "*.jpg",
    "*.jpeg",
    "*.png",
    "*.gif",
    "*.bmp",
    "*.mp3",
    "*.mp4",
    "*.avi",
    "*.mov",
    "*.zip",
    "*.tar",
    "*.gz",
    "*.rar",
    "node_modules",
    ".git",
    ".svn",
    ".hg",
    "*.log",
    "*.tmp",
    "*.cache",
    ".DS_Store",
    "Thumbs.db",
];

/// A glob with its raw text retained for the substring fallback
#[derive(Debug, Clone)]
struct Pattern {
    raw: String,
    matcher: Option<GlobMatcher>,
}

impl Pattern {
    fn new(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let matcher = match Glob::new(&raw) {
            Ok(glob) => Some(glob.compile_matcher()),
            Err(e) => {
                log::warn!("malformed glob pattern {:?} never matches: {}", raw, e);
                None
            }
        };
        Self { raw, matcher }
    }

    fn matches_name(&self, name: &str) -> bool {
        self.matcher
            .as_ref()
            .map(|m| m.is_match(name))
            .unwrap_or(false)
    }
}

fn compile(patterns: &[String]) -> Vec<Pattern> {
    patterns.iter().map(|p| Pattern::new(p)).collect()
}

/// Decides whether a relative path is excluded or included for one
/// scan. Ignore-file patterns are scan-scoped: they are registered on
/// the matcher instance, never in process-global state.
#[derive(Debug)]
pub struct PatternMatcher {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
    ignores: Vec<Pattern>,
}

impl PatternMatcher {
    /// Build a matcher from user patterns; an empty exclude list
    /// selects the built-in default set
    pub fn new(include_patterns: &[String], exclude_patterns: &[String]) -> Self {
        let excludes = if exclude_patterns.is_empty() {
            DEFAULT_EXCLUDES.iter().map(|p| Pattern::new(p)).collect()
        } else {
            compile(exclude_patterns)
        };

        Self {
            includes: compile(include_patterns),
            excludes,
            ignores: Vec::new(),
        }
    }

    /// Register patterns loaded from the root ignore file
    pub fn add_ignore_patterns<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignores
            .extend(patterns.into_iter().map(|p| Pattern::new(p.as_ref())));
    }

    /// True when the entry must be dropped: any ignore-file pattern
    /// matching the base name, any exclude pattern matching the base
    /// name, or any exclude pattern text occurring in the path
    pub fn should_exclude(&self, relative_path: &str) -> bool {
        let name = base_name(relative_path);

        if self.ignores.iter().any(|p| p.matches_name(name)) {
            return true;
        }

        self.excludes
            .iter()
            .any(|p| p.matches_name(name) || relative_path.contains(&p.raw))
    }

    /// True when the file passes include filtering; an empty include
    /// set means no restriction. Applies to files only, directories
    /// are always traversed.
    pub fn should_include(&self, relative_path: &str) -> bool {
        if self.includes.is_empty() {
            return true;
        }
        let name = base_name(relative_path);
        self.includes.iter().any(|p| p.matches_name(name))
    }
}

fn base_name(relative_path: &str) -> &str {
    relative_path.rsplit('/').next().unwrap_or(relative_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(include: &[&str], exclude: &[&str]) -> PatternMatcher {
        let include: Vec<String> = include.iter().map(|s| s.to_string()).collect();
        let exclude: Vec<String> = exclude.iter().map(|s| s.to_string()).collect();
        PatternMatcher::new(&include, &exclude)
    }

    #[test]
    fn test_default_excludes_apply_when_none_given() {
        let m = matcher(&[], &[]);
        assert!(m.should_exclude("build.log"));
        assert!(m.should_exclude("node_modules"));
        assert!(m.should_exclude(".DS_Store"));
        assert!(!m.should_exclude("main.go"));
    }

    #[test]
    fn test_explicit_excludes_replace_defaults() {
        let m = matcher(&[], &["*.md"]);
        assert!(m.should_exclude("README.md"));
        // defaults are gone once the caller supplies excludes
        assert!(!m.should_exclude("build.log"));
    }

    #[test]
    fn test_exclude_matches_base_name_at_any_depth() {
        let m = matcher(&[], &[]);
        assert!(m.should_exclude("sub/dir/trace.tmp"));
        assert!(!m.should_exclude("sub/dir/trace.txt"));
    }

    #[test]
    fn test_exclude_substring_fallback() {
        // known broad-match policy: the raw pattern text anywhere in
        // the relative path excludes the entry
        let m = matcher(&[], &["log"]);
        assert!(m.should_exclude("catalog.txt"));
        assert!(m.should_exclude("log/app.txt"));
        assert!(!m.should_exclude("main.go"));
    }

    #[test]
    fn test_gitignore_itself_caught_by_git_substring() {
        let m = matcher(&[], &[]);
        assert!(m.should_exclude(".gitignore"));
    }

    #[test]
    fn test_ignore_patterns_match_base_names_only() {
        let mut m = matcher(&[], &["never-matches-anything"]);
        m.add_ignore_patterns(["*.tmp"]);
        assert!(m.should_exclude("a.tmp"));
        assert!(m.should_exclude("deep/nested/b.tmp"));
        assert!(!m.should_exclude("keep.txt"));
    }

    #[test]
    fn test_malformed_glob_never_matches() {
        let m = matcher(&[], &["[invalid"]);
        assert!(!m.should_exclude("whatever.txt"));
        // the substring fallback still applies to the raw text
        assert!(m.should_exclude("x/[invalid/y.txt"));
    }

    #[test]
    fn test_include_empty_means_no_restriction() {
        let m = matcher(&[], &[]);
        assert!(m.should_include("anything.xyz"));
    }

    #[test]
    fn test_include_filters_by_base_name() {
        let m = matcher(&["*.go"], &[]);
        assert!(m.should_include("main.go"));
        assert!(m.should_include("pkg/util/helper.go"));
        assert!(!m.should_include("readme.md"));
    }

    #[test]
    fn test_character_class_globs() {
        let m = matcher(&[], &["data[0-9].csv"]);
        assert!(m.should_exclude("data1.csv"));
        assert!(!m.should_exclude("datax.csv"));
    }

    #[test]
    fn test_question_mark_glob() {
        let m = matcher(&["?.rs"], &[]);
        assert!(m.should_include("a.rs"));
        assert!(!m.should_include("ab.rs"));
    }

    #[test]
    fn test_root_sentinel_never_excluded_by_defaults() {
        let m = matcher(&[], &[]);
        assert!(!m.should_exclude("."));
    }
}
