//! `ngrams` command line tool.
//!
//! Builds letter or word n-gram frequency tables from text files and zip
//! archives, or discovers the alphabet used by unfamiliar text.

mod options;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use rs_ngrams_core::Cancellation;
use rs_ngrams_core::alphabet::DiscoverProcessor;
use rs_ngrams_core::ngrams::{FrequencyProcessor, ProcessorConfig};
use rs_ngrams_core::traversal::progress::ByteProgress;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use options::{Cli, Options, Task, available_languages};

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_tracing(cli.verbose, cli.progress);

	match run(cli) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("ERROR: {e:#}");
			ExitCode::FAILURE
		}
	}
}

/// `RUST_LOG` wins; otherwise each `-v` raises the level one step from `warn`.
fn init_tracing(verbose: u8, progress: bool) {
	let filter = match verbose {
		0 if progress => "info",
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};

	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
		.with_writer(std::io::stderr)
		.init();
}

fn run(cli: Cli) -> Result<()> {
	if cli.available {
		print!("{}", available_languages(cli.languages.as_deref())?);
		return Ok(());
	}

	let options = Options::resolve(cli)?;
	let progress = options.progress.then(|| Arc::new(ByteProgress::new()));
	let cancel = Cancellation::new();

	match &options.task {
		Task::Frequencies { config, update } => {
			generate_ngrams(&options, config.clone(), *update, &cancel, progress.as_ref())?
		}
		Task::Discover => discover_letters(&options, &cancel, progress.as_ref())?,
	}

	if let Some(progress) = progress {
		let (read, expected) = progress.snapshot();
		info!(bytes_read = read, bytes_expected = expected, "done");
	}
	Ok(())
}

fn generate_ngrams(
	options: &Options,
	config: ProcessorConfig,
	update: bool,
	cancel: &Cancellation,
	progress: Option<&Arc<ByteProgress>>,
) -> Result<()> {
	info!(code = %config.language.code, name = %config.language.name, "language");
	let mut processor = FrequencyProcessor::new(config)?;
	if let Some(progress) = progress {
		processor.set_progress_reporter(progress.clone());
	}

	if update && exists(&options.out)? {
		info!(path = %options.out.display(), "loading existing frequency table");
		processor.load_frequencies_from_file(&options.out)?;
	}

	let config = processor.config();
	info!(size = config.token_size, mode = config.mode.as_str(), "generating ngrams");
	processor.process_files(cancel, &options.inputs)?;

	debug!("saving frequency table");
	processor.save(&options.out)?;
	info!(path = %options.out.display(), "created frequency table");
	Ok(())
}

fn discover_letters(options: &Options, cancel: &Cancellation, progress: Option<&Arc<ByteProgress>>) -> Result<()> {
	info!("discovering letters being used");
	let mut processor = DiscoverProcessor::new();
	if let Some(progress) = progress {
		processor.set_progress_reporter(progress.clone());
	}

	processor.process_files(cancel, &options.inputs)?;
	processor.save(&options.out)?;
	info!(path = %options.out.display(), "created language file");
	Ok(())
}

/// Returns `Ok(false)` only if `path` does not exist; any other failure is an error.
fn exists(path: &Path) -> Result<bool> {
	Ok(path.try_exists()?)
}
