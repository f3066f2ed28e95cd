use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

/// Short identifier of a language, usually an ISO 639-1 code (e.g. `en`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LanguageCode(String);

impl LanguageCode {
	pub fn new(code: impl Into<String>) -> Self {
		Self(code.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for LanguageCode {
	fn from(code: &str) -> Self {
		Self(code.to_owned())
	}
}

impl From<String> for LanguageCode {
	fn from(code: String) -> Self {
		Self(code)
	}
}

impl Borrow<str> for LanguageCode {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for LanguageCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// An alphabet: the set of lowercase letters allowed in letter n-grams.
///
/// # Invariants
/// - `letters` only holds lowercase characters
/// - Any character present in `letters` is a permitted letter, duplicates are harmless
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Language {
	/// Human readable name (e.g. `Afrikaans`).
	pub name: String,

	/// Identifier of the language (e.g. `af`).
	pub code: LanguageCode,

	/// Lowercase letters found in the language.
	letters: String,
}

impl Language {
	/// Creates a language, lowercasing `letters`.
	pub fn new(code: impl Into<LanguageCode>, name: impl Into<String>, letters: &str) -> Self {
		Self {
			name: name.into(),
			code: code.into(),
			letters: letters.to_lowercase(),
		}
	}

	/// Lowercase letters of the alphabet.
	pub fn letters(&self) -> &str {
		&self.letters
	}

	/// Returns `true` if `c` is one of the alphabet's letters.
	pub fn contains_rune(&self, c: char) -> bool {
		self.letters.contains(c)
	}
}

/// Languages indexed by code.
///
/// Codes are unique; inserting an existing code replaces the previous entry.
/// Iteration is ordered by code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LanguageMap {
	languages: BTreeMap<LanguageCode, Language>,
}

impl LanguageMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a language, returning the one it replaced (if any).
	pub fn insert(&mut self, language: Language) -> Option<Language> {
		self.languages.insert(language.code.clone(), language)
	}

	/// Looks up a language by code.
	///
	/// # Errors
	/// Returns [`Error::LanguageNotFound`] naming the missing code.
	pub fn get(&self, code: &str) -> Result<&Language> {
		self.languages
			.get(code)
			.ok_or_else(|| Error::LanguageNotFound(LanguageCode::from(code)))
	}

	pub fn contains(&self, code: &str) -> bool {
		self.languages.contains_key(code)
	}

	pub fn len(&self) -> usize {
		self.languages.len()
	}

	pub fn is_empty(&self) -> bool {
		self.languages.is_empty()
	}

	/// Codes in ascending order.
	pub fn codes(&self) -> impl Iterator<Item = &LanguageCode> {
		self.languages.keys()
	}

	/// Languages in ascending code order.
	pub fn iter(&self) -> impl Iterator<Item = &Language> {
		self.languages.values()
	}
}

impl FromIterator<Language> for LanguageMap {
	fn from_iter<I: IntoIterator<Item = Language>>(iter: I) -> Self {
		let mut map = Self::new();
		for language in iter {
			map.insert(language);
		}
		map
	}
}
