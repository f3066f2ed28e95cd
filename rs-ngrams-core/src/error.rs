//! Error types shared by every module of the crate.
//!
//! Errors fall in four families:
//! - configuration errors, raised before any input is read
//! - I/O errors, always tagged with the path that failed
//! - format errors, raised while parsing CSV tables
//! - cancellation, which is never reported as success

use std::io;
use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;

use thiserror::Error;

use crate::alphabet::LanguageCode;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
	/// The n-gram size must be at least 1.
	#[error("invalid ngram size {0}")]
	InvalidTokenSize(usize),

	/// The language code is not part of the loaded language map.
	#[error("no language found with code \"{0}\"")]
	LanguageNotFound(LanguageCode),

	/// The language code is not one of the built-in languages.
	#[error("no built-in language found with code \"{0}\"")]
	BuiltinNotFound(LanguageCode),

	/// A language file did not contain a single usable row.
	#[error("no languages")]
	NoLanguages,

	/// The run was cancelled by the caller.
	#[error("operation cancelled")]
	Cancelled,

	/// Reading or writing an already opened stream failed.
	#[error("I/O error: {0}")]
	Io(#[from] io::Error),

	/// A file could not be opened or inspected.
	#[error("failed to open {path:?}: {source}")]
	Open { path: PathBuf, source: io::Error },

	/// A file could not be written.
	#[error("failed to write {path:?}: {source}")]
	Write { path: PathBuf, source: io::Error },

	/// A zip archive could not be opened or indexed.
	#[error("failed to open zip file {path:?}: {source}")]
	Zip { path: PathBuf, source: zip::result::ZipError },

	/// A single entry inside a zip archive could not be opened.
	#[error("failed to open file {entry:?} inside of zip file {path:?}: {source}")]
	ZipEntry {
		path: PathBuf,
		entry: String,
		source: zip::result::ZipError,
	},

	/// CSV failure: bad quoting, invalid UTF-8 or an unwritable sink.
	#[error("csv error: {0}")]
	Csv(#[from] csv::Error),

	/// The count column of a frequency row is not a non-negative integer.
	#[error("failed to parse the count field from the csv {record:?}: {source}")]
	InvalidCount { record: Vec<String>, source: ParseIntError },

	/// The percentage column of a frequency row is not a decimal number.
	#[error("failed to parse the percentage field from the csv {record:?}: {source}")]
	InvalidPercentage { record: Vec<String>, source: ParseFloatError },

	/// Processing one of the top-level input paths failed.
	#[error("failed to process the file {path:?}: {source}")]
	Source { path: PathBuf, source: Box<Error> },

	/// Loading a table or language file failed.
	#[error("failed to load {path:?}: {source}")]
	Load { path: PathBuf, source: Box<Error> },
}

impl Error {
	/// Returns `true` if this error, or the error it wraps, is a cancellation.
	pub fn is_cancelled(&self) -> bool {
		match self {
			Error::Cancelled => true,
			Error::Source { source, .. } | Error::Load { source, .. } => source.is_cancelled(),
			_ => false,
		}
	}

	/// Wraps `self` with the top-level input path being processed.
	pub(crate) fn in_source(self, path: impl Into<PathBuf>) -> Self {
		Error::Source { path: path.into(), source: Box::new(self) }
	}

	/// Wraps `self` with the file being loaded.
	pub(crate) fn in_load(self, path: impl Into<PathBuf>) -> Self {
		Error::Load { path: path.into(), source: Box::new(self) }
	}
}
