//! Word-pair Markov chain text generation library.
//!
//! This crate learns which word follows each pair of consecutive words in a
//! text, keeps that knowledge in memory or on disk, and walks it at random
//! to produce new text with the same statistical flavour:
//! - Tokenization of raw text with sentence boundary detection
//! - A chain of two-word states with weighted successors and start states
//! - Weighted random generation of a requested number of words
//! - JSON persistence with atomic saves and merging of dictionaries
//!
//! ```no_run
//! use marky_core::Dictionary;
//!
//! # fn main() -> marky_core::Result<()> {
//! let mut markov = Dictionary::open("speeches")?;
//! markov.parse_file("speech.txt")?;
//! markov.parse_string("I could really go for some Chicken Makhani.");
//! println!("{}", markov.generate_n_words(40)?);
//! markov.save()?;
//! # Ok(())
//! # }
//! ```

/// Temporary and persistent dictionaries, the high-level entry point.
pub mod dictionary;

/// Error type and result alias.
pub mod error;

/// Chain data structures, ingestion and generation.
pub mod model;

/// Persistence strategies and the dictionary file format.
pub mod persistence;

/// Tokenization of raw text.
pub mod text;

/// File helpers (reading, atomic writes, path building).
///
/// Not exposed
pub(crate) mod io;

pub use dictionary::Dictionary;
pub use error::{MarkovError, Result};
pub use model::{ChainStore, DeadEndPolicy, GenerationInput, StateKey, SuccessorDistribution};
