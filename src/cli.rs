//! CLI module - argument definitions and dispatch

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use crate::core::model::ScanOptions;
use crate::core::output::{OutputAssembler, OutputFormat, OutputOptions};
use crate::core::scanner::Scanner;
use crate::core::tokenizer::TokenModel;

/// codepack - convert a code repository into an AI-ready text bundle.
#[derive(Parser, Debug)]
#[command(name = "codepack")]
#[command(
    author,
    version,
    about,
    long_about = r#"codepack scans a directory tree, filters files with include/exclude
globs and the root .gitignore, estimates per-file token counts, and
emits a box-drawn directory tree followed by every file's content.

The bundle is meant to be pasted into (or piped to) an LLM as context.

Examples:
    codepack ./my-project                    # scan, print to stdout
    codepack ./src --tokens                  # annotate with token counts
    codepack ./app -o context.txt            # write the bundle to a file
    codepack ./code -i "*.go,*.md"           # only Go sources and docs
    codepack ./proj -e "*.lock,target"       # drop lockfiles and build output
    codepack ./svc --max-tokens 4000         # skip oversized files
    codepack ./lib --format json             # machine-readable result
"#
)]
pub struct Cli {
    /// Directory to scan.
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Save output to a file instead of printing to stdout.
    #[arg(
        short,
        long,
        value_name = "FILE",
        long_help = "Save the assembled bundle to a file instead of printing it.\n\n\
A confirmation line is printed to stderr (suppressed by --quiet)."
    )]
    pub output: Option<PathBuf>,

    /// Only include files matching these glob patterns.
    #[arg(
        short,
        long,
        value_name = "PATTERNS",
        value_delimiter = ',',
        long_help = "Comma-separated glob patterns matched against file base names.\n\n\
When present, only matching files are bundled. Directories are still\n\
traversed so nested matches are found.\n\n\
Example: -i \"*.go,*.js,*.py\""
    )]
    pub include: Vec<String>,

    /// Exclude files/directories matching these glob patterns.
    #[arg(
        short,
        long,
        value_name = "PATTERNS",
        value_delimiter = ',',
        long_help = "Comma-separated glob patterns matched against base names; a bare\n\
directory name excludes that directory at any depth.\n\n\
Supplying any pattern replaces the built-in default exclude set\n\
(binaries, media, archives, node_modules, VCS directories, ...).\n\n\
Example: -e \"*.lock,node_modules,target\""
    )]
    pub exclude: Vec<String>,

    /// Skip files whose token estimate exceeds N (0 = no limit).
    #[arg(
        long,
        default_value = "0",
        value_name = "N",
        long_help = "Skip any file whose estimated token count exceeds N.\n\n\
The filter runs after reading, so it composes with the include/exclude\n\
rules. 0 disables it."
    )]
    pub max_tokens: usize,

    /// Annotate output with estimated token counts.
    #[arg(
        long,
        long_help = "Show the estimated token count next to each file, and the total\n\
for the whole bundle. Useful for budgeting LLM context windows."
    )]
    pub tokens: bool,

    /// Skip the directory tree section.
    #[arg(
        long,
        long_help = "Omit the directory tree visualization and emit file contents only."
    )]
    pub no_tree: bool,

    /// Output format.
    #[arg(
        long,
        default_value = "text",
        value_parser = ["text", "json"],
        value_name = "FORMAT",
        long_help = "Select the output format.\n\n\
Supported values:\n\
- text (default): tree plus per-file content blocks\n\
- json: the raw scan result for piping into other tools"
    )]
    pub format: String,

    /// Token model for estimates (cl100k/o200k/heuristic).
    #[arg(
        long,
        default_value = "cl100k",
        value_name = "MODEL",
        long_help = "Token model used for estimates.\n\n\
Supported values:\n\
- cl100k (default): GPT-4/Claude-style BPE\n\
- o200k: GPT-4o native BPE\n\
- heuristic: fast word-based estimate, no BPE data"
    )]
    pub model: String,

    /// Quiet mode (suppress diagnostics).
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose diagnostics (repeat for more).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Configure the logger from --quiet/--verbose before any scanning
pub fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        log::LevelFilter::Off
    } else {
        match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new().filter_level(level).init();
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if !cli.folder.exists() {
        bail!("folder does not exist: {}", cli.folder.display());
    }

    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let model: TokenModel = cli.model.parse().unwrap_or_default();

    let scanner = Scanner::new(ScanOptions {
        include_patterns: cli.include,
        exclude_patterns: cli.exclude,
        max_tokens: cli.max_tokens,
        token_model: model,
    });

    let result = scanner
        .scan_directory(&cli.folder)
        .context("failed to scan directory")?;
    log::info!(
        "scanned {} files, {} tokens",
        result.total_files,
        result.total_tokens
    );

    let assembler = OutputAssembler::new(OutputOptions {
        show_tokens: cli.tokens,
        show_tree: !cli.no_tree,
    });

    let output = match format {
        OutputFormat::Text => assembler.assemble(&result),
        OutputFormat::Json => assembler.assemble_json(&result),
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("failed to write output file: {}", path.display()))?;
            if !cli.quiet {
                eprintln!("{} {}", "Output written to:".green(), path.display());
            }
        }
        None => print!("{}", output),
    }

    Ok(())
}
