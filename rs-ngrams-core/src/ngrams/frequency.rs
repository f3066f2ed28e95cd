use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::tokens::{parse_letter_tokens, parse_word_tokens};
use crate::alphabet::Language;
use crate::cancel::Cancellation;
use crate::error::{Error, Result};
use crate::io::{open_file, write_atomically};

/// Header record written at the top of a frequency file.
pub const FREQUENCY_HEADER: &str = "#token,count,percentage";

/// Occurrence statistics for a single token.
///
/// `percentage` is the share of `count` in the table's total count, in `[0, 1]`.
/// It is only meaningful after [`FrequencyTable::update`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Frequency {
	pub token: String,
	pub count: u64,
	pub percentage: f64,
}

/// Concurrent-safe token → [`Frequency`] table.
///
/// # Responsibilities
/// - Count tokens (`add`), from any number of threads
/// - Compute percentages once counting is done (`update`)
/// - Enumerate entries in a deterministic order (`entries_sorted_by_count`)
/// - Load and save the CSV format `token,count,percentage`
///
/// # Invariants
/// - Counts only ever increase while a run is ingesting
/// - Each token appears at most once
///
/// `add` takes the write lock; every read takes the shared lock.
#[derive(Debug, Default)]
pub struct FrequencyTable {
	frequencies: RwLock<HashMap<String, Frequency>>,
}

impl FrequencyTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a table from CSV.
	///
	/// # Format
	/// - Rows are `token,count,percentage`
	/// - Lines starting with `#` are comments; a quoted token starting with `#` is data
	/// - Rows with fewer than 3 fields are skipped
	/// - Surrounding whitespace of the numeric fields is ignored
	///
	/// # Errors
	/// - [`Error::Csv`] on malformed CSV
	/// - [`Error::InvalidCount`] / [`Error::InvalidPercentage`] naming the offending record
	pub fn load<R: Read>(reader: R) -> Result<Self> {
		let mut csv_reader = csv::ReaderBuilder::new()
			.has_headers(false)
			.flexible(true)
			.comment(Some(b'#'))
			.from_reader(reader);

		let mut frequencies = HashMap::new();
		for record in csv_reader.records() {
			let record = record?;
			if record.len() < 3 {
				continue;
			}

			let fields = || record.iter().map(str::to_owned).collect::<Vec<_>>();
			let count = record[1]
				.trim()
				.parse::<u64>()
				.map_err(|source| Error::InvalidCount { record: fields(), source })?;
			let percentage = record[2]
				.trim()
				.parse::<f64>()
				.map_err(|source| Error::InvalidPercentage { record: fields(), source })?;

			let token = record[0].to_owned();
			frequencies.insert(token.clone(), Frequency { token, count, percentage });
		}

		Ok(Self { frequencies: RwLock::new(frequencies) })
	}

	/// Loads a table from a CSV file. See [`FrequencyTable::load`].
	pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let file = open_file(path)?;
		let table = Self::load(file).map_err(|e| e.in_load(path))?;
		if table.is_empty() {
			warn!(path = %path.display(), "loaded an empty frequency table");
		}
		Ok(table)
	}

	/// Number of distinct tokens.
	pub fn len(&self) -> usize {
		self.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.read().is_empty()
	}

	/// Adds `count` occurrences of `token`, creating the entry if needed.
	pub fn add(&self, token: &str, count: u64) {
		let mut frequencies = self.write();
		match frequencies.get_mut(token) {
			Some(freq) => freq.count += count,
			None => {
				frequencies.insert(
					token.to_owned(),
					Frequency { token: token.to_owned(), count, percentage: 0.0 },
				);
			}
		}
	}

	/// Returns a copy of the entry for `token`.
	pub fn get(&self, token: &str) -> Option<Frequency> {
		self.read().get(token).cloned()
	}

	/// All entries, in no particular order.
	pub fn entries(&self) -> Vec<Frequency> {
		self.read().values().cloned().collect()
	}

	/// All tokens, in no particular order.
	pub fn tokens(&self) -> Vec<String> {
		self.read().keys().cloned().collect()
	}

	/// All entries ordered by count (descending), ties broken by token (ascending).
	///
	/// This is a total order, so the result is the same on every call for the
	/// same content; saving and comparing tables rely on it.
	pub fn entries_sorted_by_count(&self) -> Vec<Frequency> {
		let mut entries = self.entries();
		entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.token.cmp(&b.token)));
		entries
	}

	/// Recomputes every entry's percentage as `count / total count`.
	///
	/// O(n) over the table. Call once after the last `add` of a run rather
	/// than after every `add`. Percentages are 0 while the total count is 0.
	pub fn update(&self) {
		let mut frequencies = self.write();
		let total: u64 = frequencies.values().map(|f| f.count).sum();
		for freq in frequencies.values_mut() {
			freq.percentage = if total == 0 {
				0.0
			} else {
				freq.count as f64 / total as f64
			};
		}
	}

	/// Adds every count of `other` to this table.
	///
	/// Percentages are left stale; call [`FrequencyTable::update`] afterwards.
	pub fn merge(&self, other: &FrequencyTable) {
		// Snapshot first: merging a table into itself must not deadlock
		let entries = other.entries();
		let mut frequencies = self.write();
		for entry in entries {
			match frequencies.get_mut(&entry.token) {
				Some(freq) => freq.count += entry.count,
				None => {
					frequencies.insert(entry.token.clone(), Frequency { percentage: 0.0, ..entry });
				}
			}
		}
	}

	/// Writes the table as CSV, sorted by [`FrequencyTable::entries_sorted_by_count`].
	///
	/// Percentages are written with 8 fractional digits. Tokens starting with
	/// `#` are quoted so they are not read back as comments.
	pub fn save<W: Write>(&self, mut writer: W) -> Result<()> {
		writeln!(writer, "{FREQUENCY_HEADER}")?;
		let mut csv_writer = csv::WriterBuilder::new()
			.has_headers(false)
			.comment(Some(b'#'))
			.from_writer(writer);

		for freq in self.entries_sorted_by_count() {
			csv_writer.serialize(FrequencyRecord {
				token: &freq.token,
				count: freq.count,
				percentage: format!("{:.8}", freq.percentage),
			})?;
		}

		csv_writer.flush().map_err(csv::Error::from)?;
		Ok(())
	}

	/// Saves the table to `path`, atomically replacing any existing file.
	pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		write_atomically(path, |w| self.save(w))
	}

	/// Tokenizes letter n-grams from `input` straight into the table.
	pub fn parse_letter_tokens<R: Read>(
		&self,
		cancel: &Cancellation,
		input: R,
		language: &Language,
		token_size: usize,
	) -> Result<()> {
		parse_letter_tokens(cancel, input, language, token_size, |token| {
			if let Ok(token) = token {
				self.add(token, 1);
			}
			Ok(())
		})
	}

	/// Tokenizes word n-grams from `input` straight into the table.
	pub fn parse_word_tokens<R: Read>(&self, cancel: &Cancellation, input: R, token_size: usize) -> Result<()> {
		parse_word_tokens(cancel, input, token_size, |token| {
			if let Ok(token) = token {
				self.add(token, 1);
			}
			Ok(())
		})
	}

	fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Frequency>> {
		self.frequencies.read().unwrap_or_else(PoisonError::into_inner)
	}

	fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Frequency>> {
		self.frequencies.write().unwrap_or_else(PoisonError::into_inner)
	}
}

/// One CSV row as written by [`FrequencyTable::save`].
#[derive(Serialize)]
struct FrequencyRecord<'a> {
	token: &'a str,
	count: u64,
	percentage: String,
}
