//! Persistence strategies for chain stores.
//!
//! A persistent dictionary is addressed by a base locator (ex.
//! `~/speeches`). The adapter appends [`STORE_EXTENSION`] to form the file
//! path, so callers never include the extension themselves and nothing but a
//! `.mmd` file can be deleted by mistake.
//!
//! The file is a JSON document with tagged fields:
//!
//! ```json
//! {
//!   "version": 1,
//!   "transitions": [
//!     { "state": ["The", "cat"], "successors": { "ran": 1, "sat": 1 } }
//!   ],
//!   "starts": [
//!     { "state": ["The", "cat"], "weight": 1 }
//!   ]
//! }
//! ```
//!
//! States are written as two element arrays so that words containing spaces
//! (or any delimiter) round-trip unchanged.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{MarkovError, Result};
use crate::io::{build_store_path, remove_if_exists, write_atomic};
use crate::model::{ChainStore, StateKey, SuccessorDistribution};

/// Extension appended to every persistent locator.
pub const STORE_EXTENSION: &str = "mmd";

/// Latest file format version written by this crate.
pub const FORMAT_VERSION: u32 = 1;

/// Where a dictionary comes from and where it goes on save.
///
/// Selected once, when the dictionary is created.
pub trait Persistence: fmt::Debug {
	/// Returns the stored chain, or an empty one if nothing is stored yet.
	fn load(&self) -> Result<ChainStore>;

	/// Replaces the stored chain with `store`.
	fn save(&self, store: &ChainStore) -> Result<()>;

	/// File backing the dictionary, if any.
	fn location(&self) -> Option<&Path>;
}

/// Strategy of temporary dictionaries: nothing is read, saving is refused.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPersistence;

impl Persistence for NullPersistence {
	fn load(&self) -> Result<ChainStore> {
		Ok(ChainStore::new())
	}

	fn save(&self, _store: &ChainStore) -> Result<()> {
		Err(MarkovError::InvalidArgument(
			"a temporary dictionary cannot be saved".to_owned(),
		))
	}

	fn location(&self) -> Option<&Path> {
		None
	}
}

/// Strategy of persistent dictionaries: a JSON file on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePersistence {
	path: PathBuf,
}

impl FilePersistence {
	/// Builds the strategy for the dictionary named `locator`.
	///
	/// # Errors
	/// Returns `InvalidArgument` if the locator has no file name.
	pub fn from_locator<P: AsRef<Path>>(locator: P) -> Result<Self> {
		Ok(Self { path: store_path(locator)? })
	}

	/// Full path of the dictionary file, extension included.
	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl Persistence for FilePersistence {
	fn load(&self) -> Result<ChainStore> {
		load_store(&self.path)
	}

	fn save(&self, store: &ChainStore) -> Result<()> {
		save_store(&self.path, store)
	}

	fn location(&self) -> Option<&Path> {
		Some(&self.path)
	}
}

/// On-disk representation of a [`ChainStore`].
#[derive(Serialize, Deserialize, Debug)]
struct StoreDocument {
	version: u32,
	#[serde(default)]
	transitions: Vec<TransitionEntry>,
	#[serde(default)]
	starts: Vec<StartEntry>,
}

#[derive(Serialize, Deserialize, Debug)]
struct TransitionEntry {
	state: StateKey,
	successors: SuccessorDistribution,
}

#[derive(Serialize, Deserialize, Debug)]
struct StartEntry {
	state: StateKey,
	weight: usize,
}

impl StoreDocument {
	/// Snapshot of `store`, sorted by state so that saves are reproducible.
	fn from_store(store: &ChainStore) -> Self {
		let mut transitions: Vec<TransitionEntry> = store
			.transitions()
			.map(|(state, successors)| TransitionEntry {
				state: state.clone(),
				successors: successors.clone(),
			})
			.collect();
		transitions.sort_by(|a, b| a.state.cmp(&b.state));

		let starts = store
			.starts()
			.map(|(state, weight)| StartEntry { state: state.clone(), weight })
			.collect();

		Self { version: FORMAT_VERSION, transitions, starts }
	}

	/// Rebuilds a store, rejecting documents that break the chain invariants.
	///
	/// Returns the reason of the rejection as a message.
	fn into_store(self) -> std::result::Result<ChainStore, String> {
		if self.version == 0 || self.version > FORMAT_VERSION {
			return Err(format!("unsupported format version {}", self.version));
		}

		let mut store = ChainStore::new();
		for entry in &self.transitions {
			if let Some((word, _)) = entry.successors.iter().find(|(_, count)| *count == 0) {
				return Err(format!("zero count for {word:?} after {}", entry.state));
			}
			store.merge_successors(&entry.state, &entry.successors);
		}
		for entry in &self.starts {
			if entry.weight == 0 {
				return Err(format!("zero start weight for {}", entry.state));
			}
			store.add_start_weight(&entry.state, entry.weight);
		}
		Ok(store)
	}
}

/// Path of the dictionary file for `locator` (`<locator>.mmd`).
///
/// # Errors
/// Returns `InvalidArgument` if the locator has no file name.
pub fn store_path<P: AsRef<Path>>(locator: P) -> Result<PathBuf> {
	build_store_path(&locator, STORE_EXTENSION)
		.map_err(|err| MarkovError::InvalidArgument(format!("{:?}: {err}", locator.as_ref())))
}

/// Loads the chain stored at `path`.
///
/// A missing file is a brand new dictionary and yields an empty store.
///
/// # Errors
/// - `CorruptStore` if the file is not a valid dictionary document
/// - `Io` if the file exists but cannot be read
pub fn load_store<P: AsRef<Path>>(path: P) -> Result<ChainStore> {
	let path = path.as_ref();
	let bytes = match fs::read(path) {
		Ok(bytes) => bytes,
		Err(err) if err.kind() == io::ErrorKind::NotFound => {
			debug!("no dictionary at {}, starting empty", path.display());
			return Ok(ChainStore::new());
		}
		Err(err) => return Err(MarkovError::io(err, Some(path.to_path_buf()))),
	};

	let document: StoreDocument =
		serde_json::from_slice(&bytes).map_err(|err| MarkovError::corrupt(path, err))?;
	let store = document.into_store().map_err(|reason| MarkovError::corrupt(path, reason))?;

	info!(
		"loaded dictionary {} ({} states, {} starts)",
		path.display(),
		store.len(),
		store.start_count()
	);
	Ok(store)
}

/// Writes `store` to `path`, atomically replacing any previous content.
///
/// # Errors
/// Returns `Io` if the file cannot be written or renamed into place.
pub fn save_store<P: AsRef<Path>>(path: P, store: &ChainStore) -> Result<()> {
	let path = path.as_ref();
	let document = StoreDocument::from_store(store);
	let bytes = serde_json::to_vec_pretty(&document)
		.map_err(|err| MarkovError::io(io::Error::other(err), Some(path.to_path_buf())))?;

	write_atomic(path, &bytes).map_err(|err| MarkovError::io(err, Some(path.to_path_buf())))?;

	info!(
		"saved dictionary {} ({} states, {} starts)",
		path.display(),
		store.len(),
		store.start_count()
	);
	Ok(())
}

/// Deletes the dictionary file at `path`.
///
/// Idempotent: a file that is already gone counts as deleted.
/// Returns whether a file was actually removed.
///
/// # Errors
/// Returns `Io` if the file exists but cannot be removed.
pub fn delete_store<P: AsRef<Path>>(path: P) -> Result<bool> {
	let path = path.as_ref();
	let removed = remove_if_exists(path).map_err(|err| MarkovError::io(err, Some(path.to_path_buf())))?;
	if removed {
		info!("deleted dictionary {}", path.display());
	} else {
		debug!("dictionary {} already absent", path.display());
	}
	Ok(removed)
}
