use crate::error::{MarkovError, Result};

/// What the generator does when the walk reaches a state with no successor
/// before the requested word count.
///
/// # Variants
/// - `Restart`: sample a fresh start state and keep emitting words from it.
///   Each restart emits the two words of the new start, so the output always
///   reaches the requested length.
/// - `Stop`: return the words emitted so far; the output may be shorter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeadEndPolicy {
	#[default]
	Restart,
	Stop,
}

/// Parameters of one generation call.
///
/// # Invariants
/// - `word_count` is validated at generation time and must be >= 1. It is
///   signed so that callers passing a negative count get an `InvalidArgument`
///   rather than a silent wrap.
#[derive(Clone, Debug)]
pub struct GenerationInput {
	/// Number of words requested.
	pub word_count: i64,

	/// Behaviour on dead ends.
	pub dead_end: DeadEndPolicy,

	/// Upper-case the first character of the first emitted word.
	pub capitalize: bool,
}

impl GenerationInput {
	/// Creates an input asking for `word_count` words, with default settings.
	pub fn new(word_count: i64) -> Self {
		Self {
			word_count,
			dead_end: DeadEndPolicy::default(),
			capitalize: true,
		}
	}

	/// Validates `word_count` and returns it as a length.
	///
	/// # Errors
	/// Returns `InvalidArgument` if the count is zero or negative.
	pub fn validated_word_count(&self) -> Result<usize> {
		if self.word_count <= 0 {
			return Err(MarkovError::InvalidArgument(format!(
				"word count must be positive, got {}",
				self.word_count
			)));
		}
		usize::try_from(self.word_count).map_err(|_| {
			MarkovError::InvalidArgument(format!("word count {} is too large", self.word_count))
		})
	}
}
