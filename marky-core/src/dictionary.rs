use std::path::Path;

use log::debug;
use rand::Rng;

use crate::error::Result;
use crate::io::read_file;
use crate::model::{Builder, ChainStore, GenerationInput, Generator, IngestStats};
use crate::persistence::{delete_store, store_path, FilePersistence, NullPersistence, Persistence};
use crate::text::tokenize;

/// A Markov chain dictionary with its sentence generator.
///
/// # Responsibilities
/// - Learn from files (`parse_file`) and strings (`parse_string`)
/// - Generate text (`generate_n_words`, `generate_with`)
/// - Forget everything (`clear`) and, for persistent dictionaries, save to
///   and delete from disk
///
/// Temporary and persistent dictionaries are the same type; they differ by
/// the [`Persistence`] strategy chosen at construction.
///
/// # Notes
/// - Every parse builds a separate batch then merges it, so a failing read
///   leaves the dictionary untouched.
/// - There is no internal locking. Parsing while generating from another
///   thread must be serialized by the caller.
#[derive(Debug)]
pub struct Dictionary {
	store: ChainStore,
	persistence: Box<dyn Persistence>,
}

impl Dictionary {
	/// Creates an empty dictionary that lives only in memory.
	pub fn temporary() -> Self {
		Self { store: ChainStore::new(), persistence: Box::new(NullPersistence) }
	}

	/// Opens the persistent dictionary named `locator`, creating it empty if
	/// it does not exist yet.
	///
	/// The file is `<locator>.mmd`; do not include the extension.
	/// Nothing is written until [`Dictionary::save`].
	///
	/// # Errors
	/// - `InvalidArgument` if the locator has no file name
	/// - `CorruptStore` if the file exists but is not a dictionary
	/// - `Io` if the file cannot be read
	pub fn open<P: AsRef<Path>>(locator: P) -> Result<Self> {
		Self::with_persistence(Box::new(FilePersistence::from_locator(locator)?))
	}

	/// Creates a dictionary hydrated from an arbitrary persistence strategy.
	pub fn with_persistence(persistence: Box<dyn Persistence>) -> Result<Self> {
		let store = persistence.load()?;
		Ok(Self { store, persistence })
	}

	/// Adds the sentences of a text file to the dictionary.
	///
	/// Every sentence of the file can start a generated text.
	///
	/// # Errors
	/// Returns `Io` if the file cannot be read; the dictionary is then unchanged.
	pub fn parse_file<P: AsRef<Path>>(&mut self, path: P) -> Result<IngestStats> {
		let contents = read_file(&path)?;
		debug!("parsing file {}", path.as_ref().display());
		Ok(self.absorb(Builder::for_documents(), &contents))
	}

	/// Adds a string to the dictionary.
	///
	/// The string is one utterance: only its first two words are recorded as
	/// a start.
	pub fn parse_string(&mut self, text: &str) -> IngestStats {
		self.absorb(Builder::for_utterances(), text)
	}

	/// Generates `word_count` words with the default settings.
	///
	/// # Errors
	/// - `InvalidArgument` if `word_count <= 0`
	/// - `EmptyModel` if nothing was parsed yet
	pub fn generate_n_words(&self, word_count: i64) -> Result<String> {
		Generator::new(&self.store).generate(word_count)
	}

	/// Generates text with explicit settings and random source.
	///
	/// # Errors
	/// Same as [`Dictionary::generate_n_words`].
	pub fn generate_with<R: Rng + ?Sized>(&self, input: &GenerationInput, rng: &mut R) -> Result<String> {
		Generator::new(&self.store).generate_with(input, rng)
	}

	/// Forgets everything learned. A persistent dictionary keeps its location;
	/// the file itself changes only on the next save.
	pub fn clear(&mut self) {
		self.store.clear();
	}

	/// Writes the dictionary to its file, replacing the previous content.
	///
	/// # Errors
	/// - `InvalidArgument` on a temporary dictionary
	/// - `Io` if the file cannot be written
	pub fn save(&self) -> Result<()> {
		self.persistence.save(&self.store)
	}

	/// Deletes the persistent dictionary named `locator` (`<locator>.mmd`).
	///
	/// Deleting a dictionary that does not exist succeeds.
	///
	/// # Errors
	/// - `InvalidArgument` if the locator has no file name
	/// - `Io` if the file exists but cannot be removed
	pub fn delete<P: AsRef<Path>>(locator: P) -> Result<()> {
		delete_store(store_path(locator)?)?;
		Ok(())
	}

	/// Adds everything `other` learned to this dictionary.
	pub fn merge_from(&mut self, other: &Dictionary) {
		self.store.merge(&other.store);
	}

	/// Read-only view of the learned chain.
	pub fn store(&self) -> &ChainStore {
		&self.store
	}

	/// True when the dictionary is backed by a file.
	pub fn is_persistent(&self) -> bool {
		self.persistence.location().is_some()
	}

	/// File backing the dictionary, if persistent.
	pub fn location(&self) -> Option<&Path> {
		self.persistence.location()
	}

	/// Tokenizes `text` into a separate batch and merges it in.
	fn absorb(&mut self, builder: Builder, text: &str) -> IngestStats {
		let (batch, stats) = builder.build(tokenize(text));
		self.store.merge(&batch);
		stats
	}
}

impl Default for Dictionary {
	fn default() -> Self {
		Self::temporary()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::MarkovError;
	use crate::model::StateKey;

	#[test]
	fn temporary_dictionary_learns_and_generates() {
		let mut dictionary = Dictionary::temporary();
		let stats = dictionary.parse_string("The cat sat. The cat ran.");
		assert_eq!(stats.tokens, 6);

		let successors = dictionary.store().successors(&StateKey::new("The", "cat")).unwrap();
		assert_eq!(successors.count("sat"), 1);
		assert_eq!(successors.count("ran"), 1);
		assert_eq!(dictionary.store().start_weight(&StateKey::new("The", "cat")), 1);

		let text = dictionary.generate_n_words(6).unwrap();
		assert_eq!(text.split(' ').count(), 6);
		assert!(text.starts_with("The cat"));
	}

	#[test]
	fn temporary_dictionary_cannot_be_saved() {
		let dictionary = Dictionary::temporary();
		assert!(!dictionary.is_persistent());
		assert!(matches!(dictionary.save(), Err(MarkovError::InvalidArgument(_))));
	}

	#[test]
	fn clear_makes_generation_fail() {
		let mut dictionary = Dictionary::default();
		dictionary.parse_string("one two three four");
		assert!(dictionary.generate_n_words(3).is_ok());

		dictionary.clear();
		assert!(dictionary.store().is_empty());
		assert!(matches!(dictionary.generate_n_words(3), Err(MarkovError::EmptyModel)));
	}

	#[test]
	fn missing_file_leaves_dictionary_untouched() {
		let dir = tempfile::tempdir().unwrap();
		let mut dictionary = Dictionary::temporary();
		dictionary.parse_string("one two three");
		let before = dictionary.store().clone();

		let err = dictionary.parse_file(dir.path().join("nope.txt")).unwrap_err();
		assert!(matches!(err, MarkovError::Io { .. }));
		assert_eq!(dictionary.store(), &before);
	}

	#[test]
	fn merge_from_combines_evidence() {
		let mut left = Dictionary::temporary();
		left.parse_string("a b c");
		let mut right = Dictionary::temporary();
		right.parse_string("a b d");

		left.merge_from(&right);
		let successors = left.store().successors(&StateKey::new("a", "b")).unwrap();
		assert_eq!(successors.count("c"), 1);
		assert_eq!(successors.count("d"), 1);
		assert_eq!(left.store().start_weight(&StateKey::new("a", "b")), 2);
	}
}
