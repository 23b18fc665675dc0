use std::collections::{BTreeMap, HashMap};

use rand::Rng;

use super::state::{weighted_choice, StateKey, SuccessorDistribution};

/// The learned model: two-word states mapped to their successors, plus the
/// weighted set of states a generated text may start from.
///
/// # Responsibilities
/// - Accumulate transition counts (`observe`) and start weights (`add_start`)
/// - Answer lookups for the generator (`successors`, `sample_start`)
/// - Merge with another store, summing every count
/// - Reset to empty (`clear`)
///
/// # Invariants
/// - Every state in `starts` is also a key of `transitions`. A start that has
///   not been followed by any word yet maps to an empty distribution.
/// - Every count and start weight is >= 1
/// - Counts only grow until `clear`
///
/// The store holds no lock: sharing one across threads is the caller's job.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChainStore {
	/// State → observed next words.
	transitions: HashMap<StateKey, SuccessorDistribution>,

	/// State → number of times it opened a sentence.
	starts: BTreeMap<StateKey, usize>,
}

impl ChainStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records that `next` followed `state` once.
	pub fn observe(&mut self, state: &StateKey, next: &str) {
		self.distribution_mut(state).add(next);
	}

	/// Records one more occurrence of `state` at the start of a sentence.
	pub fn add_start(&mut self, state: &StateKey) {
		self.add_start_weight(state, 1);
	}

	/// Adds `weight` to the start weight of `state`. A zero weight is ignored.
	pub(crate) fn add_start_weight(&mut self, state: &StateKey, weight: usize) {
		if weight == 0 {
			return;
		}
		self.distribution_mut(state);
		match self.starts.get_mut(state) {
			Some(existing) => *existing += weight,
			None => {
				self.starts.insert(state.clone(), weight);
			}
		}
	}

	/// Adds every count of `successors` to `state`, registering the state even
	/// when `successors` is empty.
	pub(crate) fn merge_successors(&mut self, state: &StateKey, successors: &SuccessorDistribution) {
		self.distribution_mut(state).merge(successors);
	}

	/// Successors recorded for `state`, `None` if the state was never seen.
	pub fn successors(&self, state: &StateKey) -> Option<&SuccessorDistribution> {
		self.transitions.get(state)
	}

	/// Start weight recorded for `state`, 0 if it never opened a sentence.
	pub fn start_weight(&self, state: &StateKey) -> usize {
		self.starts.get(state).copied().unwrap_or(0)
	}

	/// Iterates over `(state, weight)` start pairs, in state order.
	pub fn starts(&self) -> impl Iterator<Item = (&StateKey, usize)> {
		self.starts.iter().map(|(state, weight)| (state, *weight))
	}

	/// Iterates over every known state and its successors, in no particular order.
	pub fn transitions(&self) -> impl Iterator<Item = (&StateKey, &SuccessorDistribution)> {
		self.transitions.iter()
	}

	/// Picks a start state with probability proportional to its weight.
	///
	/// Returns `None` if no start was ever recorded.
	pub fn sample_start<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&StateKey> {
		weighted_choice(self.starts.iter(), rng)
	}

	/// Number of known states.
	pub fn len(&self) -> usize {
		self.transitions.len()
	}

	/// True when nothing was ever learned (or since the last `clear`).
	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty() && self.starts.is_empty()
	}

	/// Number of distinct start states.
	pub fn start_count(&self) -> usize {
		self.starts.len()
	}

	/// Sum of every start weight.
	pub fn total_start_weight(&self) -> usize {
		self.starts.values().sum()
	}

	/// Drops all accumulated evidence.
	pub fn clear(&mut self) {
		self.transitions.clear();
		self.starts.clear();
	}

	/// Adds every count and start weight of `other` into this store.
	///
	/// Used to fold a freshly parsed batch into a loaded dictionary, or to
	/// combine two dictionaries. Merging is commutative on the resulting counts.
	pub fn merge(&mut self, other: &Self) {
		for (state, successors) in &other.transitions {
			self.merge_successors(state, successors);
		}

		for (state, weight) in &other.starts {
			self.add_start_weight(state, *weight);
		}
	}

	/// Distribution of `state`, created empty if needed.
	fn distribution_mut(&mut self, state: &StateKey) -> &mut SuccessorDistribution {
		self.transitions.entry(state.clone()).or_default()
	}
}
