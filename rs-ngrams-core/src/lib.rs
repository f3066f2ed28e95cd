//! Letter and word n-gram frequency library.
//!
//! This crate provides:
//! - Alphabets ("languages"), built in or loaded from CSV, and their discovery
//! - Sliding-window letter and word n-gram tokenizers
//! - A concurrent-safe frequency table with deterministic CSV output
//! - A traversal engine streaming plain files and zip archives, with
//!   optional progress reporting and cooperative cancellation
//!
//! A typical run builds a [`ngrams::FrequencyProcessor`] from a
//! [`ngrams::ProcessorConfig`], feeds it a list of paths and saves the table.

/// Alphabets: languages, built-ins, CSV loading and discovery.
pub mod alphabet;

/// N-gram tokenizers, frequency table and frequency processor.
pub mod ngrams;

/// Source traversal (plain files and zip archives) and progress reporting.
pub mod traversal;

/// Cooperative cancellation.
pub mod cancel;

/// Crate-wide error type.
pub mod error;

/// I/O utilities (UTF-8 decoding, atomic writes, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use cancel::Cancellation;
pub use error::{Error, Result};
