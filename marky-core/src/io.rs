use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{MarkovError, Result};

/// Reads a whole text file into memory.
///
/// The file handle is dropped before returning, on success and on failure.
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> Result<String> {
	let path = filename.as_ref();
	let mut contents = String::new();
	File::open(path)
		.and_then(|mut file| file.read_to_string(&mut contents))
		.map_err(|err| MarkovError::io(err, Some(path.to_path_buf())))?;
	Ok(contents)
}

/// Builds the on-disk path of a dictionary from its base locator.
///
/// The extension is appended, never substituted:
/// - `data/speeches` + `"mmd"` → `data/speeches.mmd`
/// - `data/v1.2` + `"mmd"` → `data/v1.2.mmd`
pub(crate) fn build_store_path<P: AsRef<Path>>(locator: P, extension: &str) -> io::Result<PathBuf> {
	let locator = locator.as_ref();
	if locator.file_name().is_none() {
		return Err(io::Error::new(io::ErrorKind::InvalidInput, "Locator has no filename"));
	}

	let mut raw: OsString = locator.as_os_str().to_owned();
	raw.push(".");
	raw.push(extension);
	Ok(PathBuf::from(raw))
}

/// Writes `bytes` to `path` atomically.
///
/// The data goes to `<path>.tmp` first, is flushed and synced, then renamed
/// over the target so a crash never leaves a half written dictionary.
pub(crate) fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> io::Result<()> {
	let path = path.as_ref();
	let mut tmp: OsString = path.as_os_str().to_owned();
	tmp.push(".tmp");
	let tmp = PathBuf::from(tmp);

	let written = (|| {
		let mut file = File::create(&tmp)?;
		file.write_all(bytes)?;
		file.flush()?;
		file.sync_all()
	})();

	if let Err(err) = written.and_then(|_| fs::rename(&tmp, path)) {
		let _ = fs::remove_file(&tmp);
		return Err(err);
	}
	Ok(())
}

/// Removes a file, returning `false` when it was already gone.
pub(crate) fn remove_if_exists<P: AsRef<Path>>(path: P) -> io::Result<bool> {
	match fs::remove_file(path) {
		Ok(()) => Ok(true),
		Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
		Err(err) => Err(err),
	}
}
