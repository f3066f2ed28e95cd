//! Alphabets used to scope letter n-grams.
//!
//! This module provides:
//! - The [`Language`] type and the code-indexed [`LanguageMap`]
//! - A static set of built-in languages
//! - Loading languages from CSV files (`code,name,letters`)
//! - Discovery of an unknown alphabet from sample text

/// Language, language code and language map types.
pub mod language;

/// Built-in alphabets.
///
/// Immutable, shipped with the library, looked up by code.
pub mod builtin;

/// CSV language files.
pub mod load;

/// Alphabet discovery.
///
/// Records every distinct character found in a set of sources and
/// serializes them as a synthetic `unknown` language.
pub mod discover;

pub use builtin::{builtin, builtin_languages};
pub use discover::{DiscoverProcessor, UNKNOWN, discover_letters, discover_letters_from_file};
pub use language::{Language, LanguageCode, LanguageMap};
pub use load::{LANGUAGES_HEADER, load_languages, load_languages_from_file};
