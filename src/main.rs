//! codepack - convert a code repository into an AI-ready text bundle
//!
//! codepack provides:
//! - Directory scanning with include/exclude globs and ignore-file rules
//! - Per-file token estimation for LLM context budgeting
//! - A box-drawn directory tree plus a flattened content dump
//! - Text and JSON output formats

use anyhow::Result;
use clap::Parser;

mod cli;
mod core;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(&cli);
    cli::run(cli)
}
