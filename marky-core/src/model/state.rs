use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;

use serde::{Deserialize, Serialize};

/// Ordered pair of consecutive words, the unit of state of the chain.
///
/// Order matters: `("a", "b")` and `("b", "a")` are distinct states.
/// Serialises as a two element array, never as a joined string.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(String, String);

impl StateKey {
	/// Creates the state `(first, second)`.
	pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
		Self(first.into(), second.into())
	}

	/// Older of the two words.
	pub fn first(&self) -> &str {
		&self.0
	}

	/// Most recent of the two words.
	pub fn second(&self) -> &str {
		&self.1
	}

	/// State reached after emitting `next` from this one.
	pub fn advance(&self, next: &str) -> Self {
		Self(self.1.clone(), next.to_owned())
	}
}

impl fmt::Display for StateKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({}, {})", self.0, self.1)
	}
}

/// Weighted set of the words observed right after a given state.
///
/// Conceptually, the outgoing edges of a node in the Markov chain, weighted
/// by their number of observations.
///
/// ## Invariants
/// - Each occurrence count is strictly positive
/// - Counts only grow: evidence is accumulated, never decayed
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct SuccessorDistribution {
	/// Next word → number of times it was observed.
	/// Example: { "sat" => 1, "ran" => 1 }
	counts: BTreeMap<String, usize>,
}

impl SuccessorDistribution {
	/// Records one more occurrence of `next`.
	pub fn add(&mut self, next: &str) {
		self.add_count(next, 1);
	}

	/// Records `count` occurrences of `next` at once. A zero count is ignored.
	pub(crate) fn add_count(&mut self, next: &str, count: usize) {
		if count == 0 {
			return;
		}
		match self.counts.get_mut(next) {
			Some(existing) => *existing += count,
			None => {
				self.counts.insert(next.to_owned(), count);
			}
		}
	}

	/// Number of times `next` was observed, 0 if never.
	pub fn count<Q>(&self, next: &Q) -> usize
	where
		String: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		self.counts.get(next).copied().unwrap_or(0)
	}

	/// Sum of every occurrence count.
	pub fn total(&self) -> usize {
		self.counts.values().sum()
	}

	/// Number of distinct successors.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	/// True when no successor was ever recorded.
	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Iterates over `(word, count)` pairs in word order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
		self.counts.iter().map(|(word, count)| (word.as_str(), *count))
	}

	/// Picks the next word with probability proportional to its count.
	///
	/// Returns `None` if the distribution is empty.
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		weighted_choice(self.counts.iter(), rng).map(String::as_str)
	}

	/// Adds every count of `other` into this distribution.
	pub fn merge(&mut self, other: &Self) {
		for (next, count) in &other.counts {
			self.add_count(next, *count);
		}
	}
}

/// Weighted random choice over `(item, weight)` pairs.
///
/// Builds the cumulative weights once, then binary searches the random draw,
/// so a pick costs O(n) to prepare and O(log n) to locate.
/// Zero weights are never selected. Returns `None` when the total weight is 0.
pub(crate) fn weighted_choice<'a, K, I, R>(entries: I, rng: &mut R) -> Option<&'a K>
where
	K: ?Sized + 'a,
	I: IntoIterator<Item = (&'a K, &'a usize)>,
	R: Rng + ?Sized,
{
	let mut items = Vec::new();
	let mut cumulative = Vec::new();
	let mut total = 0usize;
	for (item, weight) in entries {
		if *weight == 0 {
			continue;
		}
		total += *weight;
		items.push(item);
		cumulative.push(total);
	}

	if total == 0 {
		return None;
	}

	let draw = rng.random_range(0..total);
	// First bucket whose cumulative weight exceeds the draw
	let index = cumulative.partition_point(|&bound| bound <= draw);
	items.get(index).copied()
}
