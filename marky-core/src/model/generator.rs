use log::{debug, trace};
use rand::Rng;

use crate::error::{MarkovError, Result};

use super::chain_store::ChainStore;
use super::generation_input::{DeadEndPolicy, GenerationInput};
use super::state::StateKey;

/// Words reserved up front, whatever the requested count.
const INITIAL_CAPACITY: usize = 1024;

/// Weighted random walk over a [`ChainStore`].
///
/// # Responsibilities
/// - Pick the first state among the recorded starts, weighted by start count
/// - Extend the text one word at a time, weighted by successor count
/// - Apply the [`DeadEndPolicy`] when a state has no successor
///
/// The generator only borrows the store: generation never mutates it.
#[derive(Clone, Copy, Debug)]
pub struct Generator<'s> {
	store: &'s ChainStore,
}

impl<'s> Generator<'s> {
	/// Creates a generator reading `store`.
	pub fn new(store: &'s ChainStore) -> Self {
		Self { store }
	}

	/// Generates `word_count` words with the default settings and the thread RNG.
	///
	/// # Errors
	/// - `InvalidArgument` if `word_count <= 0`
	/// - `EmptyModel` if the store has no start state
	pub fn generate(&self, word_count: i64) -> Result<String> {
		self.generate_with(&GenerationInput::new(word_count), &mut rand::rng())
	}

	/// Generates text as configured by `input`, drawing from `rng`.
	///
	/// # Behavior
	/// - The two words of the sampled start state are emitted first.
	/// - Each following word is sampled among the successors of the last two
	///   words emitted.
	/// - On a dead end, `DeadEndPolicy::Restart` samples a new start and goes
	///   on; `DeadEndPolicy::Stop` returns the shorter text.
	/// - The output is cut to exactly `word_count` words (a start state brings
	///   two words at once).
	/// - Words are joined by single spaces; no punctuation is added.
	///
	/// # Errors
	/// - `InvalidArgument` if `input.word_count <= 0`
	/// - `EmptyModel` if the store has no start state
	pub fn generate_with<R: Rng + ?Sized>(&self, input: &GenerationInput, rng: &mut R) -> Result<String> {
		let word_count = input.validated_word_count()?;
		let words = self.walk(word_count, input, rng)?;
		Ok(render(&words, input.capitalize))
	}

	/// Performs the random walk and returns the emitted words.
	fn walk<R: Rng + ?Sized>(&self, word_count: usize, input: &GenerationInput, rng: &mut R) -> Result<Vec<&'s str>> {
		let start = self.store.sample_start(rng).ok_or(MarkovError::EmptyModel)?;

		// Grows past this as needed; `word_count` alone may be huge
		let mut words: Vec<&'s str> = Vec::with_capacity(word_count.min(INITIAL_CAPACITY));
		words.push(start.first());
		words.push(start.second());
		let mut state: StateKey = start.clone();
		let mut restarts = 0usize;

		while words.len() < word_count {
			let next = self.store.successors(&state).and_then(|successors| successors.sample(rng));
			match next {
				Some(word) => {
					words.push(word);
					state = state.advance(word);
				}
				None if input.dead_end == DeadEndPolicy::Stop => {
					debug!("dead end at {}, stopping after {} words", state, words.len());
					break;
				}
				None => {
					restarts += 1;
					// Should not be None: a start was already sampled from this store
					let start = self.store.sample_start(rng).ok_or(MarkovError::EmptyModel)?;
					trace!("dead end at {}, restarting from {}", state, start);
					words.push(start.first());
					words.push(start.second());
					state = start.clone();
				}
			}
		}

		words.truncate(word_count);
		debug!("generated {} words ({} restarts)", words.len(), restarts);
		Ok(words)
	}
}

/// Joins `words` with single spaces, optionally capitalising the first one.
fn render(words: &[&str], capitalize: bool) -> String {
	let mut text = words.join(" ");
	if capitalize {
		if let Some(first) = text.chars().next() {
			let upper: String = first.to_uppercase().collect();
			text.replace_range(..first.len_utf8(), &upper);
		}
	}
	text
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::builder::Builder;
	use crate::text::tokenize;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn store_from(text: &str) -> ChainStore {
		Builder::for_documents().build(tokenize(text)).0
	}

	fn word_count(text: &str) -> usize {
		text.split(' ').count()
	}

	#[test]
	fn rejects_non_positive_word_counts() {
		let store = store_from("the cat sat on the mat");
		let generator = Generator::new(&store);
		for count in [0, -5] {
			let err = generator.generate(count).unwrap_err();
			assert!(matches!(err, MarkovError::InvalidArgument(_)), "{count}: {err:?}");
		}
	}

	#[test]
	fn empty_store_is_an_empty_model() {
		let store = ChainStore::new();
		let err = Generator::new(&store).generate(5).unwrap_err();
		assert!(matches!(err, MarkovError::EmptyModel));
	}

	#[test]
	fn linear_chain_is_reproduced() {
		let store = store_from("one two three four five");
		let mut rng = StdRng::seed_from_u64(11);
		let text = Generator::new(&store)
			.generate_with(&GenerationInput::new(5), &mut rng)
			.unwrap();
		assert_eq!(text, "One two three four five");
	}

	#[test]
	fn short_requests_are_truncated() {
		let store = store_from("alpha beta gamma");
		let mut rng = StdRng::seed_from_u64(5);
		let generator = Generator::new(&store);
		assert_eq!(generator.generate_with(&GenerationInput::new(1), &mut rng).unwrap(), "Alpha");
		assert_eq!(generator.generate_with(&GenerationInput::new(2), &mut rng).unwrap(), "Alpha beta");
	}

	#[test]
	fn restart_policy_fills_the_requested_length() {
		// Walk: one two three, then dead end at (two, three)
		let store = store_from("one two three");
		let mut rng = StdRng::seed_from_u64(9);
		let text = Generator::new(&store)
			.generate_with(&GenerationInput::new(8), &mut rng)
			.unwrap();
		assert_eq!(text, "One two three one two three one two");
	}

	#[test]
	fn stop_policy_returns_short_text() {
		let store = store_from("one two three");
		let mut input = GenerationInput::new(8);
		input.dead_end = DeadEndPolicy::Stop;
		let mut rng = StdRng::seed_from_u64(9);
		let text = Generator::new(&store).generate_with(&input, &mut rng).unwrap();
		assert_eq!(text, "One two three");
	}

	#[test]
	fn long_requests_restart_as_often_as_needed() {
		let store = store_from("one two three");
		let mut rng = StdRng::seed_from_u64(4);
		let text = Generator::new(&store)
			.generate_with(&GenerationInput::new(5000), &mut rng)
			.unwrap();
		assert_eq!(word_count(&text), 5000);
	}

	#[test]
	fn start_without_successor_still_fills_the_request() {
		// Every step is a dead end, each restart brings two words
		let store = store_from("lonely pair");
		let mut rng = StdRng::seed_from_u64(2);
		let text = Generator::new(&store)
			.generate_with(&GenerationInput::new(101), &mut rng)
			.unwrap();
		assert_eq!(word_count(&text), 101);
		assert!(text.ends_with("pair lonely"));
	}

	#[test]
	fn huge_request_with_stop_policy_returns_short_text() {
		let store = store_from("one two three");
		let mut input = GenerationInput::new(i64::MAX);
		input.dead_end = DeadEndPolicy::Stop;
		let mut rng = StdRng::seed_from_u64(3);
		let text = Generator::new(&store).generate_with(&input, &mut rng).unwrap();
		assert_eq!(text, "One two three");
	}

	#[test]
	fn capitalisation_can_be_disabled() {
		let store = store_from("élan vital forever");
		let mut rng = StdRng::seed_from_u64(1);
		let mut input = GenerationInput::new(3);
		let generator = Generator::new(&store);
		assert_eq!(generator.generate_with(&input, &mut rng).unwrap(), "Élan vital forever");

		input.capitalize = false;
		assert_eq!(generator.generate_with(&input, &mut rng).unwrap(), "élan vital forever");
	}

	#[test]
	fn start_selection_follows_weights() {
		let mut store = ChainStore::new();
		let heavy = StateKey::new("heavy", "start");
		let light = StateKey::new("light", "start");
		for _ in 0..3 {
			store.add_start(&heavy);
		}
		store.add_start(&light);

		let generator = Generator::new(&store);
		let mut input = GenerationInput::new(1);
		input.capitalize = false;
		let mut rng = StdRng::seed_from_u64(1234);

		let trials = 20_000;
		let heavy_hits = (0..trials)
			.filter(|_| generator.generate_with(&input, &mut rng).unwrap() == "heavy")
			.count();
		let ratio = heavy_hits as f64 / (trials - heavy_hits) as f64;
		assert!((ratio - 3.0).abs() < 0.25, "ratio was {ratio}");
	}

	#[test]
	fn generation_does_not_mutate_the_store() {
		let store = store_from("The cat sat. The cat ran. The dog sat.");
		let snapshot = store.clone();
		let generator = Generator::new(&store);
		for _ in 0..50 {
			generator.generate(12).unwrap();
		}
		assert_eq!(store, snapshot);
	}
}
