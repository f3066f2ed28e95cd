use std::fmt::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use rs_ngrams_core::alphabet::{LanguageMap, builtin_languages, load_languages_from_file};
use rs_ngrams_core::ngrams::{ProcessorConfig, ProcessorMode};

/// Letter and word n-gram frequency tables.
///
/// Zip archives are accepted as input: every file they contain is processed
/// as a separate source.
#[derive(Parser, Debug)]
#[command(name = "ngrams", version, about, long_about = None)]
pub struct Cli {
	/// Alphabet language code (e.g. en = English).
	#[arg(short = 'a', long = "lang", default_value = "en")]
	pub lang: String,

	/// Languages definition file (CSV rows: code,name,letters).
	#[arg(long, value_name = "CSV")]
	pub languages: Option<PathBuf>,

	/// Create letter n-grams (e.g. bigrams st, er, ae). This is the default.
	#[arg(short = 'l', long)]
	pub letters: bool,

	/// Create word n-grams (e.g. bigrams "he jumped"). Wins over --letters.
	#[arg(short = 'w', long)]
	pub words: bool,

	/// Number of letters or words forming a single n-gram.
	#[arg(short = 's', long, default_value_t = 1)]
	pub size: usize,

	/// Discover the non-whitespace letters used and write a languages file.
	#[arg(short = 'd', long)]
	pub discover: bool,

	/// Add to the counts of an existing output file.
	#[arg(short = 'u', long)]
	pub update: bool,

	/// Output path [default: ./languages.csv with --discover, else ./<lang>-<letters|words>-<size>.csv]
	#[arg(short = 'o', long, value_name = "PATH")]
	pub out: Option<PathBuf>,

	/// List the available languages (built-in, or from --languages).
	#[arg(long)]
	pub available: bool,

	/// Report byte progress for every input.
	#[arg(long)]
	pub progress: bool,

	/// Increase log verbosity (-v, -vv, -vvv).
	#[arg(short, long, action = ArgAction::Count)]
	pub verbose: u8,

	/// Input files, plain text or zip archives.
	#[arg(value_name = "FILE")]
	pub files: Vec<String>,
}

/// What a run produces.
#[derive(Debug, PartialEq)]
pub enum Task {
	/// A frequency table, optionally added on top of the existing output.
	Frequencies { config: ProcessorConfig, update: bool },
	/// A languages file holding the discovered alphabet.
	Discover,
}

/// Validated settings of a run.
#[derive(Debug, PartialEq)]
pub struct Options {
	pub task: Task,
	pub inputs: Vec<PathBuf>,
	pub out: PathBuf,
	pub progress: bool,
}

impl Options {
	/// Resolves the command line into a runnable configuration.
	///
	/// Every check happens here, before a single input byte is read:
	/// the language must exist, the size must be valid and at least one
	/// non-blank input must be given.
	pub fn resolve(cli: Cli) -> Result<Self> {
		let languages = languages(cli.languages.as_deref())?;
		let language = languages
			.get(&cli.lang)
			.with_context(|| format!("failed to find the language \"{}\"", cli.lang))?
			.clone();

		let mode = if cli.words { ProcessorMode::Words } else { ProcessorMode::Letters };
		let config = ProcessorConfig::new(language).mode(mode).token_size(cli.size);
		config.validate()?;

		let inputs: Vec<PathBuf> = cli
			.files
			.iter()
			.map(|file| file.trim())
			.filter(|file| !file.is_empty())
			.map(PathBuf::from)
			.collect();
		if inputs.is_empty() {
			bail!("expected at least one input path");
		}

		let out = match cli.out {
			Some(out) => out,
			None if cli.discover => PathBuf::from("./languages.csv"),
			None => PathBuf::from(format!("./{}-{}-{}.csv", cli.lang, mode.as_str(), cli.size)),
		};

		let task = if cli.discover {
			Task::Discover
		} else {
			Task::Frequencies { config, update: cli.update }
		};

		Ok(Self { task, inputs, out, progress: cli.progress })
	}
}

/// Built-in languages, or the ones defined in `path`.
pub fn languages(path: Option<&Path>) -> Result<LanguageMap> {
	match path {
		Some(path) => load_languages_from_file(path)
			.with_context(|| format!("failed to load languages from {}", path.display())),
		None => Ok(builtin_languages()),
	}
}

/// One `code : name` line per language, sorted by code.
pub fn available_languages(path: Option<&Path>) -> Result<String> {
	let mut listing = String::new();
	for language in languages(path)?.iter() {
		writeln!(listing, "{} : {}", language.code, language.name)?;
	}
	Ok(listing)
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rs_ngrams_core::alphabet::builtin;

	fn resolve(args: &str) -> Result<Options> {
		let cli = Cli::try_parse_from(std::iter::once("ngrams").chain(args.split_whitespace()))?;
		Options::resolve(cli)
	}

	fn write_languages_file(dir: &Path) -> PathBuf {
		let path = dir.join("languages.csv");
		std::fs::write(
			&path,
			"#code,name,letters\nen,English,abcdefghijklmnopqrstuvwxyz\ncoding,Coding,{}[]()/$\n",
		)
		.unwrap();
		path
	}

	#[test]
	fn defaults() {
		let options = resolve("alice.txt").unwrap();
		assert_eq!(
			options,
			Options {
				task: Task::Frequencies { config: ProcessorConfig::new(builtin("en").unwrap()), update: false },
				inputs: vec![PathBuf::from("alice.txt")],
				out: PathBuf::from("./en-letters-1.csv"),
				progress: false,
			}
		);
	}

	#[test]
	fn default_output_paths() {
		assert_eq!(resolve("-s 2 a.txt").unwrap().out, PathBuf::from("./en-letters-2.csv"));
		assert_eq!(resolve("-s 3 -w -a af a.txt").unwrap().out, PathBuf::from("./af-words-3.csv"));
		assert_eq!(resolve("-d a.txt").unwrap().out, PathBuf::from("./languages.csv"));
		assert_eq!(resolve("--out ./test.csv a.txt").unwrap().out, PathBuf::from("./test.csv"));
	}

	#[test]
	fn words_win_over_letters() {
		for args in ["-w -l a.txt", "-l -w a.txt", "--words a.txt"] {
			match resolve(args).unwrap().task {
				Task::Frequencies { config, .. } => assert_eq!(config.mode, ProcessorMode::Words),
				Task::Discover => panic!("unexpected discover task for {args}"),
			}
		}
	}

	#[test]
	fn discover_and_update_flags() {
		assert_eq!(resolve("--discover a.txt").unwrap().task, Task::Discover);
		match resolve("-u a.txt").unwrap().task {
			Task::Frequencies { update, .. } => assert!(update),
			Task::Discover => panic!("unexpected discover task"),
		}
	}

	#[test]
	fn invalid_size() {
		let err = resolve("-s 0 a.txt").unwrap_err();
		assert!(err.to_string().contains("invalid ngram size 0"), "{err}");
	}

	#[test]
	fn blank_inputs_are_dropped() {
		let cli = Cli::try_parse_from(["ngrams", " a.txt ", "   ", "b.zip"]).unwrap();
		let options = Options::resolve(cli).unwrap();
		assert_eq!(options.inputs, vec![PathBuf::from("a.txt"), PathBuf::from("b.zip")]);

		let err = resolve("").unwrap_err();
		assert!(err.to_string().contains("expected at least one input path"));
	}

	#[test]
	fn unknown_language() {
		let err = resolve("-a tlh a.txt").unwrap_err();
		assert!(err.to_string().contains("failed to find the language \"tlh\""), "{err}");
	}

	#[test]
	fn languages_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = write_languages_file(dir.path());

		let options = resolve(&format!("--languages {} -a coding a.txt", path.display())).unwrap();
		match options.task {
			Task::Frequencies { config, .. } => assert_eq!(config.language.letters(), "{}[]()/$"),
			Task::Discover => panic!("unexpected discover task"),
		}

		let err = resolve(&format!("--languages {} -a af a.txt", path.display())).unwrap_err();
		assert!(err.to_string().contains("\"af\""), "{err}");

		let empty = dir.path().join("empty.csv");
		std::fs::write(&empty, "").unwrap();
		let err = resolve(&format!("--languages {} a.txt", empty.display())).unwrap_err();
		assert!(err.to_string().contains("failed to load languages from"), "{err}");
	}

	#[test]
	fn listing() {
		let dir = tempfile::tempdir().unwrap();
		let path = write_languages_file(dir.path());
		assert_eq!(available_languages(Some(&path)).unwrap(), "coding : Coding\nen : English\n");

		let builtin = available_languages(None).unwrap();
		assert!(builtin.starts_with("af : Afrikaans\nar : Arabic\n"));
		assert_eq!(builtin.lines().count(), 11);
	}
}
