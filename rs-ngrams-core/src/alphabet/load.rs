use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::language::{Language, LanguageMap};
use crate::error::{Error, Result};
use crate::io::open_file;

/// Header line written at the top of a language file.
pub const LANGUAGES_HEADER: &str = "#code,name,letters";

/// Parses a set of languages from CSV rows `code,name,letters`.
///
/// - Rows whose first field starts with `#` are comments
/// - Rows with fewer than 3 fields are skipped
/// - Letters are lowercased
/// - A code appearing more than once keeps its last row, so a row can be
///   commented out and replaced further down the file
///
/// # Errors
/// - [`Error::Csv`] on malformed CSV
/// - [`Error::NoLanguages`] if not a single usable row was found
pub fn load_languages<R: Read>(reader: R) -> Result<LanguageMap> {
	let mut csv_reader = csv::ReaderBuilder::new()
		.has_headers(false)
		.flexible(true)
		.from_reader(reader);

	let mut languages = LanguageMap::new();
	for record in csv_reader.records() {
		let record = record?;
		if record.len() < 3 || record[0].starts_with('#') {
			continue;
		}

		let language = Language::new(&record[0], &record[1], &record[2]);
		if let Some(previous) = languages.insert(language) {
			debug!(code = %previous.code, "language redefined, keeping the later row");
		}
	}

	if languages.is_empty() {
		return Err(Error::NoLanguages);
	}
	Ok(languages)
}

/// Loads a set of languages from a UTF-8 CSV file. See [`load_languages`].
pub fn load_languages_from_file<P: AsRef<Path>>(path: P) -> Result<LanguageMap> {
	let path = path.as_ref();
	let file = open_file(path)?;
	load_languages(file).map_err(|e| e.in_load(path))
}
