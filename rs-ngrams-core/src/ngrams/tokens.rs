use std::collections::VecDeque;
use std::io::Read;

use crate::alphabet::Language;
use crate::cancel::Cancellation;
use crate::error::{Error, Result};
use crate::io::Runes;

/// What a token receiver gets: a token, or the error that ended the parse.
pub type TokenResult<'a> = std::result::Result<&'a str, &'a Error>;

/// Parses letter n-grams of `token_size` letters from `input`.
///
/// # Parameters
/// - `cancel`: checked once per character read
/// - `input`: UTF-8 byte stream
/// - `language`: alphabet the letters must belong to
/// - `token_size`: number of letters per token (`>= 1`)
/// - `recv`: receives `Ok(token)` for each n-gram, or `Err(error)` exactly
///   once if reading fails or the run is cancelled
///
/// # Behavior
/// - Whitespace resets the window: a token never spans a whitespace run
/// - Characters are lowercased, then dropped if not part of `language`.
///   Dropping does not reset the window (`"don't"` yields `"do"`, `"on"`, `"nt"`)
/// - Once `token_size` letters are buffered the window is emitted and slides by one
/// - A partially filled window is never emitted at end of input
///
/// # Errors
/// - [`Error::InvalidTokenSize`] if `token_size` is 0
/// - [`Error::Cancelled`] or [`Error::Io`] after notifying `recv`
/// - Any error returned by `recv`, which stops the parser immediately
pub fn parse_letter_tokens<R, F>(
	cancel: &Cancellation,
	input: R,
	language: &Language,
	token_size: usize,
	recv: F,
) -> Result<()>
where
	R: Read,
	F: FnMut(TokenResult<'_>) -> Result<()>,
{
	match token_size {
		0 => Err(Error::InvalidTokenSize(token_size)),
		1 => parse_letter_monograms(cancel, input, language, recv),
		_ => parse_letter_ngrams(cancel, input, language, token_size, recv),
	}
}

/// Parses word n-grams of `token_size` words from `input`.
///
/// Words are whitespace-delimited and lowercased; they are not filtered by any
/// alphabet. Each token is the window of words joined by single spaces.
/// Errors and callback semantics match [`parse_letter_tokens`], with
/// cancellation checked once per word.
pub fn parse_word_tokens<R, F>(cancel: &Cancellation, input: R, token_size: usize, mut recv: F) -> Result<()>
where
	R: Read,
	F: FnMut(TokenResult<'_>) -> Result<()>,
{
	if token_size == 0 {
		return Err(Error::InvalidTokenSize(token_size));
	}

	let mut runes = Runes::new(input);
	let mut window: VecDeque<String> = VecDeque::with_capacity(token_size);
	let mut token = String::new();

	loop {
		if let Err(e) = cancel.check() {
			return fail(&mut recv, e);
		}

		let word = match runes.next_word() {
			Ok(Some(word)) => word,
			Ok(None) => break,
			Err(e) => return fail(&mut recv, e.into()),
		};

		window.push_back(word.to_lowercase());
		if window.len() == token_size {
			token.clear();
			for (i, word) in window.iter().enumerate() {
				if i > 0 {
					token.push(' ');
				}
				token.push_str(word);
			}
			window.pop_front();
			recv(Ok(token.as_str()))?;
		}
	}

	Ok(())
}

fn parse_letter_ngrams<R, F>(
	cancel: &Cancellation,
	input: R,
	language: &Language,
	token_size: usize,
	mut recv: F,
) -> Result<()>
where
	R: Read,
	F: FnMut(TokenResult<'_>) -> Result<()>,
{
	let mut runes = Runes::new(input);
	let mut window: VecDeque<char> = VecDeque::with_capacity(token_size);
	let mut token = String::with_capacity(token_size * 4);

	loop {
		if let Err(e) = cancel.check() {
			return fail(&mut recv, e);
		}

		let c = match runes.next_rune() {
			Ok(Some(c)) => c,
			Ok(None) => break,
			Err(e) => return fail(&mut recv, e.into()),
		};

		if c.is_whitespace() {
			window.clear();
			continue;
		}

		// Some characters lowercase to several (e.g. 'İ')
		for lower in c.to_lowercase() {
			if !language.contains_rune(lower) {
				continue;
			}

			window.push_back(lower);
			if window.len() == token_size {
				token.clear();
				token.extend(window.iter());
				window.pop_front();
				recv(Ok(token.as_str()))?;
			}
		}
	}

	Ok(())
}

/// Fast path for `token_size == 1`: no window needed.
fn parse_letter_monograms<R, F>(cancel: &Cancellation, input: R, language: &Language, mut recv: F) -> Result<()>
where
	R: Read,
	F: FnMut(TokenResult<'_>) -> Result<()>,
{
	let mut runes = Runes::new(input);
	let mut buf = [0u8; 4];

	loop {
		if let Err(e) = cancel.check() {
			return fail(&mut recv, e);
		}

		let c = match runes.next_rune() {
			Ok(Some(c)) => c,
			Ok(None) => break,
			Err(e) => return fail(&mut recv, e.into()),
		};

		if c.is_whitespace() {
			continue;
		}

		for lower in c.to_lowercase() {
			if language.contains_rune(lower) {
				recv(Ok(&*lower.encode_utf8(&mut buf)))?;
			}
		}
	}

	Ok(())
}

/// Notifies the receiver of a terminal error, then returns it.
///
/// The receiver's own result is ignored: the parser stops either way.
fn fail<F>(recv: &mut F, err: Error) -> Result<()>
where
	F: FnMut(TokenResult<'_>) -> Result<()>,
{
	let _ = recv(Err(&err));
	Err(err)
}
