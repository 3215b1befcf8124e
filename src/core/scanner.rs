//! Directory scanning
//!
//! Recursive pre-order traversal with early pruning: excluded
//! directories are never descended into, excluded files are skipped in
//! place. Surviving files are read whole, classified, token-counted,
//! and recorded in discovery order. Only a failure at the scan root is
//! fatal; every per-entry problem is a silent soft-skip.

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::core::model::{FileEntry, ScanError, ScanOptions, ScanResult};
use crate::core::paths::{extension_lower, make_relative};
use crate::core::patterns::PatternMatcher;
use crate::core::tokenizer::count_tokens;

/// Files larger than this are skipped outright; whole-file content is
/// held in memory for the lifetime of the scan result
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Per-root ignore file, loaded once per scan
pub const IGNORE_FILE: &str = ".gitignore";

/// Extensions kept as text (with lossy conversion) even when the
/// bytes fail UTF-8 validation
const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "rst", "json", "xml", "yaml", "yml", "go", "py", "js", "ts", "java", "c", "cpp",
    "h", "hpp", "cs", "php", "rb", "swift", "kt", "rs", "sh", "bat", "html", "css", "scss", "less",
    "sql", "r", "m",
];

/// Walks a directory tree and accumulates a flat result set
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Scan `root`, applying exclude/include/ignore rules and the
    /// content-aware size and token filters.
    ///
    /// Pattern state (including ignore-file patterns) is scoped to
    /// this call, so one Scanner can serve scans of different roots
    /// without leakage.
    pub fn scan_directory(&self, root: &Path) -> Result<ScanResult, ScanError> {
        if !root.exists() {
            return Err(ScanError::RootNotFound(root.to_path_buf()));
        }

        let mut matcher =
            PatternMatcher::new(&self.options.include_patterns, &self.options.exclude_patterns);
        matcher.add_ignore_patterns(load_ignore_file(root));

        let mut result = ScanResult::new(root.to_path_buf());

        let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
            // never filter the root itself; for everything else an
            // exclusion prunes the whole subtree
            if entry.depth() == 0 {
                return true;
            }
            match make_relative(entry.path(), root) {
                Some(rel) => !matcher.should_exclude(&rel),
                None => false,
            }
        });

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    if err.depth() == 0 {
                        return Err(ScanError::Walk {
                            path: root.to_path_buf(),
                            source: err.into(),
                        });
                    }
                    log::debug!("skipping unreadable entry: {}", err);
                    continue;
                }
            };

            let path = entry.path();
            let rel = match make_relative(path, root) {
                Some(rel) if rel.is_empty() => ".".to_string(),
                Some(rel) => rel,
                None => continue,
            };

            if entry.file_type().is_dir() {
                result.push(FileEntry::directory(path.to_path_buf(), rel));
                continue;
            }

            // include filtering applies to files only, so directories
            // above still get traversed
            if !matcher.should_include(&rel) {
                continue;
            }

            if let Some(file) = self.process_file(path, rel) {
                result.push(file);
            }
        }

        Ok(result)
    }

    /// Read and classify one file; None means soft-skip
    fn process_file(&self, path: &Path, rel: String) -> Option<FileEntry> {
        let size = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                log::debug!("skipping {}: cannot stat: {}", rel, e);
                return None;
            }
        };

        if size > MAX_FILE_SIZE {
            log::debug!("skipping {}: {} bytes exceeds size limit", rel, size);
            return None;
        }

        let bytes = match fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                log::debug!("skipping {}: cannot read: {}", rel, e);
                return None;
            }
        };

        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                if is_text_extension(path) {
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                } else {
                    log::debug!("skipping {}: binary content", rel);
                    return None;
                }
            }
        };

        let token_count = count_tokens(&content, self.options.token_model);
        if self.options.max_tokens > 0 && token_count > self.options.max_tokens {
            log::debug!(
                "skipping {}: {} tokens exceeds limit {}",
                rel,
                token_count,
                self.options.max_tokens
            );
            return None;
        }

        Some(FileEntry::file(
            path.to_path_buf(),
            rel,
            size,
            token_count,
            content,
        ))
    }
}

fn is_text_extension(path: &Path) -> bool {
    extension_lower(path)
        .map(|ext| TEXT_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Read the root ignore file, dropping blank lines and `#` comments
fn load_ignore_file(root: &Path) -> Vec<String> {
    let Ok(raw) = fs::read_to_string(root.join(IGNORE_FILE)) else {
        return Vec::new();
    };
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}
