//! Error type shared by every fallible operation of the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result type used throughout the crate.
pub type Result<T, E = MarkovError> = std::result::Result<T, E>;

/// Failures surfaced by the dictionary, the generator and the persistence layer.
///
/// Nothing is retried internally: every variant is returned to the caller,
/// which decides whether to retry, recreate the store or abort.
#[derive(Debug, Error)]
pub enum MarkovError {
	/// A caller supplied parameter is out of range (ex. a word count of zero).
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	/// Generation was requested on a store that never recorded a start state.
	#[error("the dictionary is empty, parse some text first")]
	EmptyModel,

	/// The persisted dictionary exists but does not hold a valid chain.
	#[error("corrupt dictionary {path:?}: {reason}")]
	CorruptStore {
		/// File that failed to decode.
		path: PathBuf,
		/// Human readable decoding failure.
		reason: String,
	},

	/// The dictionary file does not exist.
	#[error("dictionary not found: {0:?}")]
	NotFound(PathBuf),

	/// Filesystem failure, with the path involved when known.
	#[error("io error while processing {path:?}: {source}")]
	Io {
		/// Underlying error returned by the standard library.
		source: std::io::Error,
		/// Target path associated with the failure if available.
		path: Option<PathBuf>,
	},
}

impl MarkovError {
	/// Wraps an IO error, attaching the path it happened on.
	pub fn io(source: std::io::Error, path: Option<PathBuf>) -> Self {
		Self::Io { source, path }
	}

	/// Builds a `CorruptStore` error for `path`.
	pub fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
		Self::CorruptStore { path: path.into(), reason: reason.to_string() }
	}
}
