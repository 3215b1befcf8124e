//! Token estimation for LLM context budgeting
//!
//! Counting is total: it never fails and never returns an error. The
//! BPE-backed models use tiktoken encodings loaded lazily on first
//! use; if an encoding cannot be loaded, the word-based heuristic is
//! the fallback, so callers always get a number.

use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use tiktoken_rs::{cl100k_base, o200k_base, CoreBPE};

/// Supported token models/encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenModel {
    /// cl100k_base encoding (GPT-4, GPT-3.5-turbo, Claude 3)
    #[default]
    Cl100k,
    /// o200k_base encoding (GPT-4o native)
    O200k,
    /// Word-based estimation, no BPE encoding
    Heuristic,
}

impl TokenModel {
    fn bpe(&self) -> Option<&'static CoreBPE> {
        match self {
            TokenModel::Cl100k => CL100K_BPE.as_ref(),
            TokenModel::O200k => O200K_BPE.as_ref(),
            TokenModel::Heuristic => None,
        }
    }
}

impl fmt::Display for TokenModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenModel::Cl100k => "cl100k",
            TokenModel::O200k => "o200k",
            TokenModel::Heuristic => "heuristic",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TokenModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cl100k" | "cl100k_base" | "default" | "gpt4" | "gpt-4" | "claude" | "claude3" => {
                Ok(TokenModel::Cl100k)
            }
            "o200k" | "o200k_base" | "gpt4o" | "gpt-4o" => Ok(TokenModel::O200k),
            "heuristic" | "fast" | "estimate" => Ok(TokenModel::Heuristic),
            _ => Err(format!(
                "Unknown model: {}. Available: cl100k, o200k, heuristic",
                s
            )),
        }
    }
}

// Lazy-initialized BPE encodings (loaded once on first use)
static CL100K_BPE: Lazy<Option<CoreBPE>> = Lazy::new(|| match cl100k_base() {
    Ok(bpe) => Some(bpe),
    Err(e) => {
        log::warn!("cl100k_base unavailable, falling back to heuristic: {}", e);
        None
    }
});

static O200K_BPE: Lazy<Option<CoreBPE>> = Lazy::new(|| match o200k_base() {
    Ok(bpe) => Some(bpe),
    Err(e) => {
        log::warn!("o200k_base unavailable, falling back to heuristic: {}", e);
        None
    }
});

/// Count tokens in text using the specified model
pub fn count_tokens(text: &str, model: TokenModel) -> usize {
    if text.is_empty() {
        return 0;
    }

    match model.bpe() {
        Some(bpe) => bpe.encode_with_special_tokens(text).len(),
        None => estimate_tokens_heuristic(text),
    }
}

/// Estimate tokens without BPE data: per-word character counts plus a
/// structural adjustment for newlines and code operators
pub fn estimate_tokens_heuristic(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }

    let word_tokens: usize = text.split_whitespace().map(word_tokens).sum();
    word_tokens + structural_tokens(text)
}

/// Roughly one token per 4 characters, with punctuation-heavy words
/// costing extra (operators and delimiters usually split)
fn word_tokens(word: &str) -> usize {
    let punct = word.chars().filter(|c| c.is_ascii_punctuation()).count();
    let clean_len = word.chars().count() - punct;

    if clean_len == 0 {
        // punctuation-only word
        return 1;
    }

    let tokens = clean_len.div_ceil(4).max(1);
    tokens + (punct + 1) / 2
}

// Operators that tend to tokenize on their own in code
const CODE_PATTERNS: &[&str] = &[
    "{", "}", "(", ")", "[", "]", ";", "->", "=>", "==", "!=", "<=", ">=", "&&", "||", "++", "--",
    "+=", "-=", "*=", "/=",
];

fn structural_tokens(text: &str) -> usize {
    let newlines = text.matches('\n').count();
    let ops: usize = CODE_PATTERNS
        .iter()
        .map(|p| text.matches(p).count() / 3)
        .sum();
    newlines / 2 + ops
}

/// Human-readable size class for a token total
pub fn token_size_class(total_tokens: usize) -> &'static str {
    if total_tokens < 1000 {
        "Small"
    } else if total_tokens < 5000 {
        "Medium"
    } else if total_tokens < 15000 {
        "Large"
    } else {
        "Very Large"
    }
}
