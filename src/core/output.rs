//! Output assembly
//!
//! Concatenates the rendered tree, a summary line, and per-file
//! content blocks into the final bundle. The JSON format serializes
//! the scan result directly for machine consumers.

use std::str::FromStr;

use crate::core::model::{FileEntry, ScanResult};
use crate::core::tokenizer::token_size_class;
use crate::core::tree::{build_tree, render_tree};

/// Output format for the assembled bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Options controlling output assembly
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    /// Annotate tree nodes and file headers with token counts
    pub show_tokens: bool,

    /// Emit the directory tree section
    pub show_tree: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            show_tokens: false,
            show_tree: true,
        }
    }
}

/// Assembles scan results into their final textual form
pub struct OutputAssembler {
    options: OutputOptions,
}

impl OutputAssembler {
    pub fn new(options: OutputOptions) -> Self {
        Self { options }
    }

    /// Build the text bundle: tree section, summary line, then one
    /// content block per file sorted by relative path
    pub fn assemble(&self, result: &ScanResult) -> String {
        let mut out = String::new();

        if self.options.show_tree {
            out.push_str("Directory Structure:\n");
            let tree = build_tree(result);
            out.push_str(&render_tree(&tree, self.options.show_tokens));
            out.push('\n');

            if self.options.show_tokens {
                out.push_str(&format!(
                    "Total: {} tokens ({})\n\n",
                    format_count(result.total_tokens),
                    token_size_class(result.total_tokens)
                ));
            } else {
                out.push_str(&format!("Total files: {}\n\n", result.total_files));
            }
        }

        out.push_str("File Contents:\n");
        out.push_str(&"=".repeat(50));
        out.push_str("\n\n");

        let mut files: Vec<&FileEntry> = result.files().collect();
        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        for (i, file) in files.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }

            let mut header = format!("File: {}", file.relative_path);
            if self.options.show_tokens {
                header.push_str(&format!(" ({} tokens)", file.token_count));
            }
            out.push_str(&header);
            out.push('\n');
            out.push_str(&"-".repeat(header.len()));
            out.push('\n');

            if file.content.is_empty() {
                out.push_str("(empty file)\n");
            } else {
                out.push_str(&file.content);
                if !file.content.ends_with('\n') {
                    out.push('\n');
                }
            }
        }

        out
    }

    /// Serialize the scan result as pretty JSON
    pub fn assemble_json(&self, result: &ScanResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// One line per file with aligned token counts
    #[allow(dead_code)]
    pub fn file_list(&self, result: &ScanResult) -> String {
        let mut out = String::new();
        out.push_str("Files and Token Counts:\n");
        out.push_str(&"=".repeat(30));
        out.push('\n');

        for file in result.files() {
            out.push_str(&format!(
                "{:<40} {:>6} tokens\n",
                file.relative_path, file.token_count
            ));
        }

        out.push_str(&"-".repeat(50));
        out.push('\n');
        out.push_str(&format!(
            "Total: {} files, {} tokens\n",
            result.total_files,
            format_count(result.total_tokens)
        ));
        out
    }

    /// Short scan summary: root, file count, token total with class
    #[allow(dead_code)]
    pub fn summary(&self, result: &ScanResult) -> String {
        format!(
            "Scan Summary:\nRoot Path: {}\nFiles: {}\nTotal Tokens: {} ({})\n",
            result.root_path.display(),
            result.total_files,
            format_count(result.total_tokens),
            token_size_class(result.total_tokens)
        )
    }
}

/// Human number formatting: 950, 1.2k, 3.4M
fn format_count(n: usize) -> String {
    if n < 1000 {
        format!("{}", n)
    } else if n < 1_000_000 {
        format!("{:.1}k", n as f64 / 1000.0)
    } else {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    }
}
