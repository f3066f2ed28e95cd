use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use super::frequency::FrequencyTable;
use crate::alphabet::Language;
use crate::cancel::Cancellation;
use crate::error::{Error, Result};
use crate::traversal::SourceWalker;
use crate::traversal::progress::ProgressReporter;

/// Whether n-grams are built from letters or from words.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProcessorMode {
	#[default]
	Letters,
	Words,
}

impl ProcessorMode {
	/// `"letters"` or `"words"`.
	pub fn as_str(&self) -> &'static str {
		match self {
			ProcessorMode::Letters => "letters",
			ProcessorMode::Words => "words",
		}
	}
}

/// Validated settings of a [`FrequencyProcessor`].
///
/// Built with chained setters:
/// ```
/// use rs_ngrams_core::alphabet::builtin;
/// use rs_ngrams_core::ngrams::ProcessorConfig;
///
/// let config = ProcessorConfig::new(builtin("en").unwrap()).words().token_size(2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessorConfig {
	pub mode: ProcessorMode,
	pub token_size: usize,
	pub language: Language,
}

impl ProcessorConfig {
	/// Letter monograms over `language`.
	pub fn new(language: Language) -> Self {
		Self { mode: ProcessorMode::Letters, token_size: 1, language }
	}

	pub fn letters(mut self) -> Self {
		self.mode = ProcessorMode::Letters;
		self
	}

	pub fn words(mut self) -> Self {
		self.mode = ProcessorMode::Words;
		self
	}

	pub fn mode(mut self, mode: ProcessorMode) -> Self {
		self.mode = mode;
		self
	}

	pub fn token_size(mut self, token_size: usize) -> Self {
		self.token_size = token_size;
		self
	}

	/// # Errors
	/// [`Error::InvalidTokenSize`] if the token size is 0.
	pub fn validate(&self) -> Result<()> {
		if self.token_size < 1 {
			return Err(Error::InvalidTokenSize(self.token_size));
		}
		Ok(())
	}
}

/// Builds a frequency table of letter or word n-grams from input files.
///
/// # Behavior
/// - Sources are walked in order by a [`SourceWalker`] (plain files and zip archives)
/// - Each source is tokenized independently into one shared [`FrequencyTable`]
/// - Percentages are recomputed once, after every source was processed
pub struct FrequencyProcessor {
	config: ProcessorConfig,
	table: FrequencyTable,
	walker: SourceWalker,
}

impl FrequencyProcessor {
	/// Creates a processor with an empty table and no progress reporting.
	///
	/// # Errors
	/// Fails if `config` does not validate. No I/O happens before that.
	pub fn new(config: ProcessorConfig) -> Result<Self> {
		config.validate()?;
		Ok(Self {
			config,
			table: FrequencyTable::new(),
			walker: SourceWalker::new(),
		})
	}

	pub fn config(&self) -> &ProcessorConfig {
		&self.config
	}

	/// Replaces the progress reporter.
	pub fn set_progress_reporter(&mut self, reporter: Arc<dyn ProgressReporter>) {
		self.walker.set_progress_reporter(reporter);
	}

	/// The frequency table built so far.
	pub fn table(&self) -> &FrequencyTable {
		&self.table
	}

	/// Consumes the processor, returning its table.
	pub fn into_table(self) -> FrequencyTable {
		self.table
	}

	/// Merges a previously saved table into the current one.
	///
	/// Counts of tokens seen afterwards keep increasing on top of the loaded
	/// counts, which is what "update" runs rely on.
	pub fn load_frequencies_from_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let path = path.as_ref();
		let loaded = FrequencyTable::load_from_file(path)?;
		debug!(path = %path.display(), tokens = loaded.len(), "loaded existing frequency table");
		self.table.merge(&loaded);
		self.table.update();
		Ok(())
	}

	/// Tokenizes every source in `paths` into the table, then updates percentages.
	///
	/// # Errors
	/// The first failure aborts the run (see [`SourceWalker::process_files`]).
	/// Tokens counted before a failure or a cancellation stay in the table,
	/// but percentages are not recomputed.
	pub fn process_files<P: AsRef<Path>>(&self, cancel: &Cancellation, paths: &[P]) -> Result<()> {
		let (mode, token_size, language) = (self.config.mode, self.config.token_size, &self.config.language);
		debug!(mode = mode.as_str(), token_size, language = %language.code, "generating ngrams");

		self.walker.process_files(cancel, paths, |cancel, reader| match mode {
			ProcessorMode::Letters => self.table.parse_letter_tokens(cancel, reader, language, token_size),
			ProcessorMode::Words => self.table.parse_word_tokens(cancel, reader, token_size),
		})?;

		self.table.update();
		info!(sources = paths.len(), tokens = self.table.len(), "frequency table updated");
		Ok(())
	}

	/// Saves the table to `path`, atomically replacing any existing file.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		self.table.save_to_file(path)
	}
}
