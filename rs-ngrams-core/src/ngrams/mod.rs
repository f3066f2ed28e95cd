//! Letter and word n-gram frequencies.
//!
//! This module provides:
//! - Streaming tokenizers for letter and word n-grams (`tokens`)
//! - A concurrent-safe frequency table with CSV persistence (`frequency`)
//! - A processor driving files and zip archives through both (`processor`)

/// Sliding-window tokenizers.
///
/// Turn a byte stream into n-gram tokens, letter by letter or word by word,
/// with cooperative cancellation.
pub mod tokens;

/// Token frequency table.
///
/// Counting, percentage recomputation, deterministic ordering,
/// merging and CSV load/save.
pub mod frequency;

/// Frequency table generation from input files.
pub mod processor;

pub use frequency::{Frequency, FrequencyTable};
pub use processor::{FrequencyProcessor, ProcessorConfig, ProcessorMode};
pub use tokens::{TokenResult, parse_letter_tokens, parse_word_tokens};
