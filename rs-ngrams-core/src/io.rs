use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::warn;

use crate::error::{Error, Result};

/// Decoded in place of byte sequences that are not valid UTF-8.
pub(crate) const REPLACEMENT: char = '\u{FFFD}';

/// Incremental UTF-8 decoder over a byte stream.
///
/// - Decodes one `char` at a time without loading the stream into memory
/// - A byte that cannot start a sequence yields one [`REPLACEMENT`]
/// - A truncated or malformed sequence yields one [`REPLACEMENT`] for the lead
///   byte and the continuation bytes read with it; decoding resumes at the
///   first byte that did not fit
/// - A corrupt byte never aborts a run
pub(crate) struct Runes<R> {
	reader: BufReader<R>,
}

impl<R: Read> Runes<R> {
	pub(crate) fn new(reader: R) -> Self {
		Self { reader: BufReader::new(reader) }
	}

	/// Returns the next decoded character, or `None` at end of stream.
	pub(crate) fn next_rune(&mut self) -> io::Result<Option<char>> {
		let first = match self.next_byte()? {
			Some(b) => b,
			None => return Ok(None),
		};

		let width = utf8_width(first);
		match width {
			0 => return Ok(Some(REPLACEMENT)),
			1 => return Ok(Some(first as char)),
			_ => (),
		}

		let mut buf = [first, 0, 0, 0];
		for slot in buf.iter_mut().take(width).skip(1) {
			match self.peek_byte()? {
				Some(b) if b & 0xC0 == 0x80 => {
					*slot = b;
					self.reader.consume(1);
				}
				// Leave the offending byte for the next call
				_ => return Ok(Some(REPLACEMENT)),
			}
		}

		Ok(std::str::from_utf8(&buf[..width])
			.ok()
			.and_then(|s| s.chars().next())
			.or(Some(REPLACEMENT)))
	}

	/// Returns the next whitespace-delimited word, or `None` at end of stream.
	pub(crate) fn next_word(&mut self) -> io::Result<Option<String>> {
		let mut word = String::new();
		while let Some(c) = self.next_rune()? {
			if c.is_whitespace() {
				if word.is_empty() {
					continue;
				}
				return Ok(Some(word));
			}
			word.push(c);
		}
		Ok(if word.is_empty() { None } else { Some(word) })
	}

	fn peek_byte(&mut self) -> io::Result<Option<u8>> {
		loop {
			match self.reader.fill_buf() {
				Ok(buf) => return Ok(buf.first().copied()),
				Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
				Err(e) => return Err(e),
			}
		}
	}

	fn next_byte(&mut self) -> io::Result<Option<u8>> {
		let byte = self.peek_byte()?;
		if byte.is_some() {
			self.reader.consume(1);
		}
		Ok(byte)
	}
}

/// Length of the UTF-8 sequence introduced by `lead`, or 0 if `lead` cannot start one.
fn utf8_width(lead: u8) -> usize {
	match lead {
		0x00..=0x7F => 1,
		0xC2..=0xDF => 2,
		0xE0..=0xEF => 3,
		0xF0..=0xF4 => 4,
		_ => 0,
	}
}

/// Returns `true` if the path has a `.zip` extension (case-insensitive).
pub(crate) fn is_zip<P: AsRef<Path>>(path: P) -> bool {
	path.as_ref()
		.extension()
		.is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Returns `true` if the final component of a zip entry name starts with `.`.
///
/// Zip entry names always use `/` as separator, whatever the host platform.
pub(crate) fn is_hidden_entry(name: &str) -> bool {
	name.trim_end_matches('/')
		.rsplit('/')
		.next()
		.is_some_and(|base| base.starts_with('.'))
}

/// Opens a file for reading, tagging failures with the path.
pub(crate) fn open_file<P: AsRef<Path>>(path: P) -> Result<File> {
	let path = path.as_ref();
	File::open(path).map_err(|source| Error::Open { path: path.to_path_buf(), source })
}

/// Size of a file on disk in bytes.
pub(crate) fn file_size<P: AsRef<Path>>(path: P) -> Result<u64> {
	let path = path.as_ref();
	std::fs::metadata(path)
		.map(|meta| meta.len())
		.map_err(|source| Error::Open { path: path.to_path_buf(), source })
}

/// Writes a file atomically.
///
/// - Content is written to a temporary file in the destination directory
/// - The temporary file replaces `path` only once `write` succeeded
/// - On failure the destination is left untouched
pub(crate) fn write_atomically<P, F>(path: P, write: F) -> Result<()>
where
	P: AsRef<Path>,
	F: FnOnce(&mut dyn Write) -> Result<()>,
{
	let path = path.as_ref();
	let wrap = |source: io::Error| Error::Write { path: path.to_path_buf(), source };

	let parent = match path.parent() {
		Some(p) if !p.as_os_str().is_empty() => p,
		_ => Path::new("."),
	};

	let temp_file = NamedTempFile::new_in(parent).map_err(wrap)?;
	let written = {
		let mut writer = BufWriter::new(temp_file.as_file());
		write(&mut writer).and_then(|()| writer.flush().map_err(wrap))
	};
	if let Err(e) = written {
		discard(temp_file);
		return Err(e);
	}

	temp_file.persist(path).map_err(|e| {
		discard(e.file);
		wrap(e.error)
	})?;
	Ok(())
}

/// Removes a temporary file. Failing to do so never hides the primary error.
fn discard(temp_file: NamedTempFile) {
	let path = temp_file.path().to_path_buf();
	if let Err(e) = temp_file.close() {
		warn!(path = %path.display(), error = %e, "failed to remove temporary file");
	}
}
