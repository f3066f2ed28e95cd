//! Source traversal engine.
//!
//! Walks an ordered list of input paths and streams every source through a
//! caller supplied consumer:
//! - plain files are a single source
//! - `.zip` archives (case-insensitive) yield one source per member file,
//!   skipping directories and hidden entries (base name starting with `.`)
//!
//! Any failure aborts the whole traversal and is returned wrapped with the
//! offending top-level path. There is no skip-and-continue mode.

/// Progress reporting capability and its implementations.
pub mod progress;

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, trace};
use zip::ZipArchive;

use crate::cancel::Cancellation;
use crate::error::{Error, Result};
use crate::io::{file_size, is_hidden_entry, is_zip, open_file};
use progress::{NoProgress, ProgressReporter};

/// Drives sources through a consumer, reporting progress along the way.
///
/// The consumer receives the cancellation flag and a stream positioned at the
/// start of one source. Each stream begins and ends on its own, so nothing
/// computed by the consumer can span two sources.
#[derive(Clone)]
pub struct SourceWalker {
	progress: Arc<dyn ProgressReporter>,
}

impl Default for SourceWalker {
	fn default() -> Self {
		Self { progress: Arc::new(NoProgress) }
	}
}

impl SourceWalker {
	/// Creates a walker that does not report progress.
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the progress reporter.
	pub fn set_progress_reporter(&mut self, reporter: Arc<dyn ProgressReporter>) {
		self.progress = reporter;
	}

	/// Streams every source found in `paths` through `consume`.
	///
	/// # Behavior
	/// - The expected total is first set to the sum of the on-disk sizes of `paths`
	/// - `started` is reported once per top-level path, never per zip entry
	/// - Zip archives swap their compressed size for the uncompressed size of
	///   the members that will actually be streamed
	/// - Cancellation is checked before each path; consumers check it per unit of input
	///
	/// # Errors
	/// The first failure is returned as [`Error::Source`] naming the top-level path.
	pub fn process_files<P, F>(&self, cancel: &Cancellation, paths: &[P], mut consume: F) -> Result<()>
	where
		P: AsRef<Path>,
		F: FnMut(&Cancellation, &mut dyn Read) -> Result<()>,
	{
		let total = paths.len();

		let mut total_size: u64 = 0;
		for path in paths {
			let path: &Path = path.as_ref();
			total_size += file_size(path).map_err(|e| e.in_source(path))?;
		}
		self.progress.add_to_total_size(saturating_i64(total_size));

		for (index, path) in paths.iter().enumerate() {
			let path: &Path = path.as_ref();
			cancel.check().map_err(|e| e.in_source(path))?;

			self.progress.started(path, index, total);
			self.process_path(cancel, path, &mut consume)
				.map_err(|e| e.in_source(path))?;
		}

		Ok(())
	}

	fn process_path<F>(&self, cancel: &Cancellation, path: &Path, consume: &mut F) -> Result<()>
	where
		F: FnMut(&Cancellation, &mut dyn Read) -> Result<()>,
	{
		if is_zip(path) {
			return self.process_zip(cancel, path, consume);
		}

		debug!(path = %path.display(), "processing file");
		let file = open_file(path)?;
		let mut reader = self.progress.reader(Box::new(file));
		consume(cancel, &mut reader)
	}

	fn process_zip<F>(&self, cancel: &Cancellation, path: &Path, consume: &mut F) -> Result<()>
	where
		F: FnMut(&Cancellation, &mut dyn Read) -> Result<()>,
	{
		let file = open_file(path)?;
		let zip_err = |source| Error::Zip { path: path.to_path_buf(), source };
		let mut archive = ZipArchive::new(file).map_err(zip_err)?;

		let members = list_members(&mut archive, path)?;
		let uncompressed: u64 = members.iter().map(|m| m.size).sum();
		let compressed = file_size(path)?;
		self.progress.add_to_total_size(-saturating_i64(compressed));
		self.progress.add_to_total_size(saturating_i64(uncompressed));

		debug!(path = %path.display(), entries = members.len(), uncompressed, "processing zip file");
		for member in members {
			let entry = archive.by_index(member.index).map_err(|source| Error::ZipEntry {
				path: path.to_path_buf(),
				entry: member.name.clone(),
				source,
			})?;
			trace!(entry = %member.name, "processing zip entry");

			let mut reader = self.progress.reader(Box::new(entry));
			consume(cancel, &mut reader)?;
		}

		Ok(())
	}
}

/// A zip member that will be streamed.
struct Member {
	index: usize,
	name: String,
	/// Uncompressed size in bytes.
	size: u64,
}

/// Lists the members of an archive, skipping directories and hidden files.
fn list_members(archive: &mut ZipArchive<File>, path: &Path) -> Result<Vec<Member>> {
	let mut members = Vec::new();
	for index in 0..archive.len() {
		let entry = archive.by_index_raw(index).map_err(|source| Error::ZipEntry {
			path: path.to_path_buf(),
			entry: format!("#{index}"),
			source,
		})?;

		// Hidden files are mostly archiver metadata (.DS_Store, __MACOSX/._*)
		if entry.is_dir() || is_hidden_entry(entry.name()) {
			trace!(entry = entry.name(), "skipping zip entry");
			continue;
		}
		members.push(Member { index, name: entry.name().to_owned(), size: entry.size() });
	}
	Ok(members)
}

fn saturating_i64(value: u64) -> i64 {
	i64::try_from(value).unwrap_or(i64::MAX)
}
