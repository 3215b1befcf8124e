//! Scan data model
//!
//! A scan produces a flat, discovery-ordered list of entries plus
//! aggregate counters. Entries are immutable once recorded and live
//! only for the scan invocation that produced them.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::tokenizer::TokenModel;

/// Options controlling a single scan
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Include globs for files; empty means no restriction
    pub include_patterns: Vec<String>,

    /// Exclude globs; empty means the built-in default set applies
    pub exclude_patterns: Vec<String>,

    /// Skip files whose token estimate exceeds this (0 disables)
    pub max_tokens: usize,

    /// Token model used for estimates
    pub token_model: TokenModel,
}

/// A single surviving entry from a scan
#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    /// Absolute path on disk
    pub path: PathBuf,

    /// Path relative to the scan root, '/'-separated
    /// ("." for the root itself)
    pub relative_path: String,

    /// Size in bytes (0 for directories)
    pub size: u64,

    /// Whether this entry is a directory
    pub is_directory: bool,

    /// Estimated token count (0 for directories)
    pub token_count: usize,

    /// Raw text content (empty for directories)
    pub content: String,
}

impl FileEntry {
    /// Create a directory entry
    pub fn directory(path: PathBuf, relative_path: impl Into<String>) -> Self {
        Self {
            path,
            relative_path: relative_path.into(),
            size: 0,
            is_directory: true,
            token_count: 0,
            content: String::new(),
        }
    }

    /// Create a file entry with its content and token estimate
    pub fn file(
        path: PathBuf,
        relative_path: impl Into<String>,
        size: u64,
        token_count: usize,
        content: String,
    ) -> Self {
        Self {
            path,
            relative_path: relative_path.into(),
            size,
            is_directory: false,
            token_count,
            content,
        }
    }
}

/// The flat result of one scan invocation
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    /// The scan root
    pub root_path: PathBuf,

    /// Entries in discovery order, directories and files interleaved
    pub entries: Vec<FileEntry>,

    /// Sum of token counts over file entries
    pub total_tokens: usize,

    /// Number of file entries (directories excluded)
    pub total_files: usize,
}

impl ScanResult {
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            entries: Vec::new(),
            total_tokens: 0,
            total_files: 0,
        }
    }

    /// Append an entry; file entries contribute to the aggregate
    /// counters, directory entries never do
    pub fn push(&mut self, entry: FileEntry) {
        if !entry.is_directory {
            self.total_tokens += entry.token_count;
            self.total_files += 1;
        }
        self.entries.push(entry);
    }

    /// File entries only, in discovery order
    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter().filter(|e| !e.is_directory)
    }
}

/// Fatal scan failure at the root; every per-entry problem is a
/// silent soft-skip instead
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan root does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
