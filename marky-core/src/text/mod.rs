//! Text handling: turning raw input into word tokens.

/// Whitespace tokenizer with sentence boundary detection.
pub mod tokenizer;

pub use tokenizer::{tokenize, Token, Tokens};
