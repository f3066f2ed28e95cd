use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use tracing::info;

/// Receives progress updates from the traversal engine.
///
/// Implementations are shared with the engine behind an `Arc`, so all methods
/// take `&self`; use atomics or locks for any mutable state.
pub trait ProgressReporter: Send + Sync {
	/// Called once per top-level input path before it is processed.
	///
	/// `index` is 0-based, `total` is the number of top-level paths.
	fn started(&self, path: &Path, index: usize, total: usize);

	/// Wraps a source stream so that consumed bytes can be observed.
	fn reader<'a>(&'a self, reader: Box<dyn Read + 'a>) -> Box<dyn Read + 'a>;

	/// Corrects the expected total number of bytes. `delta` may be negative.
	fn add_to_total_size(&self, delta: i64);
}

/// Progress reporter that ignores every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
	fn started(&self, _path: &Path, _index: usize, _total: usize) {}

	fn reader<'a>(&'a self, reader: Box<dyn Read + 'a>) -> Box<dyn Read + 'a> {
		reader
	}

	fn add_to_total_size(&self, _delta: i64) {}
}

/// Byte counters shared between a [`ByteProgress`] and the readers it hands out.
#[derive(Debug, Default)]
struct Counters {
	total: AtomicI64,
	read: AtomicU64,
}

/// Progress reporter that counts bytes and reports through `tracing`.
///
/// - `started` logs `[index/total] path` together with the bytes read so far
/// - Readers count every byte pulled from the underlying source
/// - [`ByteProgress::snapshot`] returns `(bytes_read, expected_total)`
#[derive(Clone, Debug, Default)]
pub struct ByteProgress {
	counters: Arc<Counters>,
}

impl ByteProgress {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns `(bytes_read, expected_total)`.
	pub fn snapshot(&self) -> (u64, i64) {
		(
			self.counters.read.load(Ordering::Relaxed),
			self.counters.total.load(Ordering::Relaxed),
		)
	}
}

impl ProgressReporter for ByteProgress {
	fn started(&self, path: &Path, index: usize, total: usize) {
		let (read, expected) = self.snapshot();
		info!(path = %path.display(), bytes_read = read, bytes_expected = expected, "[{}/{}]", index + 1, total);
	}

	fn reader<'a>(&'a self, reader: Box<dyn Read + 'a>) -> Box<dyn Read + 'a> {
		Box::new(CountingReader { inner: reader, counters: &self.counters })
	}

	fn add_to_total_size(&self, delta: i64) {
		self.counters.total.fetch_add(delta, Ordering::Relaxed);
	}
}

struct CountingReader<'a> {
	inner: Box<dyn Read + 'a>,
	counters: &'a Counters,
}

impl Read for CountingReader<'_> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		let n = self.inner.read(buf)?;
		self.counters.read.fetch_add(n as u64, Ordering::Relaxed);
		Ok(n)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn counts_bytes_and_total() {
		let progress = ByteProgress::new();
		progress.add_to_total_size(10);
		progress.add_to_total_size(-3);

		let mut out = String::new();
		progress
			.reader(Box::new("hello".as_bytes()))
			.read_to_string(&mut out)
			.unwrap();

		assert_eq!(out, "hello");
		assert_eq!(progress.snapshot(), (5, 7));
	}

	#[test]
	fn no_progress_passes_the_stream_through() {
		let mut out = Vec::new();
		NoProgress.reader(Box::new(&b"abc"[..])).read_to_end(&mut out).unwrap();
		assert_eq!(out, b"abc");
	}
}
