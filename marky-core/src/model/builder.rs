use log::debug;

use crate::text::Token;

use super::chain_store::ChainStore;
use super::state::StateKey;

/// Counters describing one ingestion pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
	/// Tokens consumed.
	pub tokens: usize,
	/// Transition observations recorded.
	pub transitions: usize,
	/// Start observations recorded.
	pub starts: usize,
}

/// Feeds token sequences into a [`ChainStore`] through a two-word sliding window.
///
/// # Start marking
/// - The first pair of the whole input is always recorded as a start, so any
///   input of two words or more can seed a generation.
/// - With `mark_starts`, the first pair of every following sentence is
///   recorded too. Text parsed from files uses it, bare strings do not.
///
/// Parsing `"The cat sat. The cat ran."` therefore gives `("The", "cat")` a
/// start weight of 2 with `mark_starts`, and 1 without.
#[derive(Clone, Copy, Debug)]
pub struct Builder {
	mark_starts: bool,
}

impl Builder {
	/// Creates a builder, choosing whether sentence boundaries open new starts.
	pub fn new(mark_starts: bool) -> Self {
		Self { mark_starts }
	}

	/// Builder used for whole documents (`mark_starts = true`).
	pub fn for_documents() -> Self {
		Self::new(true)
	}

	/// Builder used for single utterances (`mark_starts = false`).
	pub fn for_utterances() -> Self {
		Self::new(false)
	}

	/// Ingests `tokens` into `store`.
	///
	/// For each token `t`, the current window `(w1, w2)` (once full) gains one
	/// observation of `t`, then the window slides to `(w2, t)`.
	/// Inputs shorter than two tokens leave the store untouched.
	pub fn ingest<'a, I>(&self, store: &mut ChainStore, tokens: I) -> IngestStats
	where
		I: IntoIterator<Item = Token<'a>>,
	{
		let mut stats = IngestStats::default();
		let mut previous: Option<&str> = None;
		let mut current: Option<&str> = None;
		// Tokens of the sentence in progress
		let mut sentence_len = 0usize;

		for token in tokens {
			stats.tokens += 1;

			if let (Some(w1), Some(w2)) = (previous, current) {
				store.observe(&StateKey::new(w1, w2), token.text);
				stats.transitions += 1;
			}

			previous = current;
			current = Some(token.text);
			sentence_len += 1;

			if let (Some(w1), Some(w2)) = (previous, current) {
				let input_start = stats.tokens == 2;
				let sentence_start = self.mark_starts && sentence_len == 2;
				if input_start || sentence_start {
					store.add_start(&StateKey::new(w1, w2));
					stats.starts += 1;
				}
			}

			if token.sentence_end {
				sentence_len = 0;
			}
		}

		debug!(
			"ingested {} tokens: {} transitions, {} starts",
			stats.tokens, stats.transitions, stats.starts
		);
		stats
	}

	/// Builds a fresh store out of `tokens`.
	pub fn build<'a, I>(&self, tokens: I) -> (ChainStore, IngestStats)
	where
		I: IntoIterator<Item = Token<'a>>,
	{
		let mut store = ChainStore::new();
		let stats = self.ingest(&mut store, tokens);
		(store, stats)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::text::tokenize;
	use proptest::prelude::*;

	fn key(a: &str, b: &str) -> StateKey {
		StateKey::new(a, b)
	}

	#[test]
	fn sentences_share_the_window() {
		let (store, stats) = Builder::for_utterances().build(tokenize("The cat sat. The cat ran."));

		let successors = store.successors(&key("The", "cat")).unwrap();
		assert_eq!(successors.count("sat"), 1);
		assert_eq!(successors.count("ran"), 1);
		assert_eq!(successors.len(), 2);
		// The window crosses the sentence boundary
		assert_eq!(store.successors(&key("cat", "sat")).unwrap().count("The"), 1);
		assert_eq!(store.successors(&key("sat", "The")).unwrap().count("cat"), 1);
		assert_eq!(stats.tokens, 6);
		assert_eq!(stats.transitions, 4);
	}

	#[test]
	fn utterances_only_mark_the_first_pair() {
		let (store, _) = Builder::for_utterances().build(tokenize("The cat sat. The cat ran."));
		assert_eq!(store.start_weight(&key("The", "cat")), 1);
		assert_eq!(store.start_count(), 1);
	}

	#[test]
	fn documents_mark_every_sentence() {
		let (store, _) = Builder::for_documents().build(tokenize("The cat sat. The cat ran. A dog barked!"));
		assert_eq!(store.start_weight(&key("The", "cat")), 2);
		assert_eq!(store.start_weight(&key("A", "dog")), 1);
		assert_eq!(store.start_weight(&key("sat", "The")), 0);
		assert_eq!(store.total_start_weight(), 3);
	}

	#[test]
	fn one_word_sentence_does_not_open_a_start_pair() {
		let (store, _) = Builder::for_documents().build(tokenize("Stop. Go home now."));
		assert_eq!(store.start_weight(&key("Stop", "Go")), 1);
		assert_eq!(store.start_weight(&key("Go", "home")), 1);
	}

	#[test]
	fn short_inputs_are_no_ops() {
		for text in ["", "alone", "   !!!  "] {
			let (store, stats) = Builder::for_documents().build(tokenize(text));
			assert!(store.is_empty(), "{text:?} should not change the store");
			assert_eq!(stats.transitions, 0);
			assert_eq!(stats.starts, 0);
		}
	}

	#[test]
	fn two_words_make_a_start_without_successors() {
		let (store, _) = Builder::for_utterances().build(tokenize("hello world"));
		assert_eq!(store.start_weight(&key("hello", "world")), 1);
		assert!(store.successors(&key("hello", "world")).unwrap().is_empty());
	}

	#[test]
	fn ingest_accumulates_into_existing_store() {
		let builder = Builder::for_utterances();
		let mut store = ChainStore::new();
		builder.ingest(&mut store, tokenize("a b c"));
		builder.ingest(&mut store, tokenize("a b c"));
		assert_eq!(store.successors(&key("a", "b")).unwrap().count("c"), 2);
		assert_eq!(store.start_weight(&key("a", "b")), 2);
	}

	proptest! {
		#[test]
		fn first_state_leads_to_third_word(words in prop::collection::vec("[a-z]{1,8}", 3..40)) {
			let text = words.join(" ");
			let (store, _) = Builder::for_utterances().build(tokenize(&text));
			let successors = store.successors(&key(&words[0], &words[1]));
			prop_assert!(successors.is_some());
			prop_assert!(successors.unwrap().count(words[2].as_str()) >= 1);
		}

		#[test]
		fn starts_are_known_states(text in "[a-z.!? ]{0,200}", mark in any::<bool>()) {
			let (store, _) = Builder::new(mark).build(tokenize(&text));
			for (state, weight) in store.starts() {
				prop_assert!(weight >= 1);
				prop_assert!(store.successors(state).is_some());
			}
		}

		#[test]
		fn every_transition_count_is_positive(text in "[a-zA-Z,.!? ]{0,200}") {
			let (store, stats) = Builder::for_documents().build(tokenize(&text));
			let total: usize = store.transitions().map(|(_, dist)| dist.total()).sum();
			prop_assert_eq!(total, stats.transitions);
			for (_, dist) in store.transitions() {
				for (_, count) in dist.iter() {
					prop_assert!(count >= 1);
				}
			}
		}
	}
}
