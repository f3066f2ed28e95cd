use std::collections::BTreeSet;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use super::language::Language;
use super::load::LANGUAGES_HEADER;
use crate::cancel::Cancellation;
use crate::error::Result;
use crate::io::{Runes, open_file, write_atomically};
use crate::traversal::SourceWalker;
use crate::traversal::progress::ProgressReporter;

/// Code and name of the language produced by discovery.
pub const UNKNOWN: &str = "unknown";

/// Collects every distinct non-whitespace character of `input`, lowercased.
///
/// Cancellation is checked once per character.
///
/// # Errors
/// [`Error::Cancelled`] or [`Error::Io`]; no partial set is returned.
pub fn discover_letters<R: Read>(cancel: &Cancellation, input: R) -> Result<BTreeSet<char>> {
	let mut letters = BTreeSet::new();
	discover_into(cancel, input, &mut letters)?;
	Ok(letters)
}

/// Discovers the letters of a single file. See [`discover_letters`].
pub fn discover_letters_from_file<P: AsRef<Path>>(cancel: &Cancellation, path: P) -> Result<BTreeSet<char>> {
	let path = path.as_ref();
	let file = open_file(path)?;
	discover_letters(cancel, file).map_err(|e| e.in_source(path))
}

fn discover_into<R: Read>(cancel: &Cancellation, input: R, letters: &mut BTreeSet<char>) -> Result<()> {
	let mut runes = Runes::new(input);
	loop {
		cancel.check()?;
		let c = match runes.next_rune()? {
			Some(c) => c,
			None => return Ok(()),
		};
		if !c.is_whitespace() {
			letters.extend(c.to_lowercase());
		}
	}
}

/// Derives an alphabet from unfamiliar text.
///
/// Walks the same sources as the frequency processor but, instead of
/// filtering through a language, records every character it sees.
#[derive(Default)]
pub struct DiscoverProcessor {
	walker: SourceWalker,
	letters: BTreeSet<char>,
}

impl DiscoverProcessor {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the progress reporter.
	pub fn set_progress_reporter(&mut self, reporter: Arc<dyn ProgressReporter>) {
		self.walker.set_progress_reporter(reporter);
	}

	/// Letters discovered so far, sorted by code point.
	pub fn letters(&self) -> Vec<char> {
		self.letters.iter().copied().collect()
	}

	/// Records the letters of every source in `paths`.
	///
	/// Letters found before a failure or cancellation are kept.
	pub fn process_files<P: AsRef<Path>>(&mut self, cancel: &Cancellation, paths: &[P]) -> Result<()> {
		debug!(sources = paths.len(), "discovering letters");
		let letters = &mut self.letters;
		self.walker.process_files(cancel, paths, |cancel, reader| discover_into(cancel, reader, letters))?;
		info!(letters = self.letters.len(), "letters discovered");
		Ok(())
	}

	/// The synthetic language holding the discovered letters.
	pub fn language(&self) -> Language {
		let letters: String = self.letters.iter().collect();
		Language::new(UNKNOWN, UNKNOWN, &letters)
	}

	/// Writes a language file holding a single `unknown` language.
	///
	/// The letters field is always quoted; embedded `"` are doubled.
	pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
		let letters: String = self.letters.iter().collect();
		let letters = letters.replace('"', "\"\"");
		writeln!(writer, "{LANGUAGES_HEADER}")?;
		writeln!(writer, "{UNKNOWN},{UNKNOWN},\"{letters}\"")?;
		Ok(())
	}

	/// Saves the language file to `path`, atomically replacing any existing file.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		write_atomically(path, |w| self.write_to(w))
	}
}
