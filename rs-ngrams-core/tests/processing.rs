use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rs_ngrams_core::Cancellation;
use rs_ngrams_core::alphabet::{DiscoverProcessor, builtin, load_languages_from_file};
use rs_ngrams_core::ngrams::{Frequency, FrequencyProcessor, FrequencyTable, ProcessorConfig};
use rs_ngrams_core::traversal::progress::ByteProgress;
use zip::write::SimpleFileOptions;

const ALICE: &str = "Alice was beginning to get very tired of sitting by her sister on the bank,\n\
	and of having nothing to do: once or twice she had peeped into the book her sister was reading,\n\
	but it had no pictures or conversations in it.";

const RABBIT: &str = "The rabbit-hole went straight on like a tunnel for some way,\n\
	and then dipped suddenly down, so suddenly that Alice had not a moment to think\n\
	about stopping herself before she found herself falling down a very deep well.";

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
	let path = dir.join(name);
	std::fs::write(&path, content).unwrap();
	path
}

fn write_zip(path: &Path, entries: &[(&str, &str)]) {
	let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
	for (name, content) in entries {
		zip.start_file(*name, SimpleFileOptions::default()).unwrap();
		zip.write_all(content.as_bytes()).unwrap();
	}
	zip.finish().unwrap();
}

fn run(config: ProcessorConfig, paths: &[PathBuf]) -> Vec<Frequency> {
	let processor = FrequencyProcessor::new(config).unwrap();
	processor.process_files(&Cancellation::new(), paths).unwrap();
	processor.table().entries_sorted_by_count()
}

#[test_log::test]
fn zip_archive_matches_loose_files() {
	let dir = tempfile::tempdir().unwrap();
	let a = write_file(dir.path(), "a.txt", ALICE);
	let b = write_file(dir.path(), "b.txt", RABBIT);
	let archive = dir.path().join("book.zip");
	write_zip(&archive, &[("chapter/a.txt", ALICE), ("chapter/b.txt", RABBIT), ("chapter/.notes", "zzzz")]);

	for size in 1..=3 {
		let english = builtin("en").unwrap();
		let loose = run(ProcessorConfig::new(english.clone()).token_size(size), &[a.clone(), b.clone()]);
		let zipped = run(ProcessorConfig::new(english.clone()).token_size(size), &[archive.clone()]);
		assert_eq!(loose, zipped);

		let loose = run(ProcessorConfig::new(english.clone()).words().token_size(size), &[a.clone(), b.clone()]);
		let zipped = run(ProcessorConfig::new(english).words().token_size(size), &[archive.clone()]);
		assert_eq!(loose, zipped);
	}
}

#[test_log::test]
fn sources_never_share_a_token() {
	let dir = tempfile::tempdir().unwrap();
	let a = write_file(dir.path(), "a.txt", "ab");
	let b = write_file(dir.path(), "b.txt", "cd");

	let table = run(ProcessorConfig::new(builtin("en").unwrap()).token_size(2), &[a, b]);
	let tokens: Vec<&str> = table.iter().map(|f| f.token.as_str()).collect();
	assert_eq!(tokens, vec!["ab", "cd"]);
}

#[test]
fn letter_tokens_stay_inside_the_alphabet() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_file(dir.path(), "mixed.txt", "Ça déçoit, naïve Zoë! 42 fois… peut-être");

	for code in ["en", "fr"] {
		let language = builtin(code).unwrap();
		for freq in run(ProcessorConfig::new(language.clone()).token_size(3), &[path.clone()]) {
			assert_eq!(freq.token.chars().count(), 3);
			assert!(freq.token.chars().all(|c| language.contains_rune(c)), "{}", freq.token);
		}
	}
}

#[test]
fn sorted_entries_are_a_total_order() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_file(dir.path(), "alice.txt", ALICE);

	let processor = FrequencyProcessor::new(ProcessorConfig::new(builtin("en").unwrap()).token_size(2)).unwrap();
	processor.process_files(&Cancellation::new(), &[path]).unwrap();

	let first = processor.table().entries_sorted_by_count();
	for pair in first.windows(2) {
		let (a, b) = (&pair[0], &pair[1]);
		assert!(a.count > b.count || (a.count == b.count && a.token < b.token), "{a:?} before {b:?}");
	}
	assert_eq!(processor.table().entries_sorted_by_count(), first);

	let sum: f64 = first.iter().map(|f| f.percentage).sum();
	assert!((sum - 1.0).abs() < 1e-9, "sum = {sum}");
}

#[test]
fn cancelled_run_leaves_the_table_empty() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_file(dir.path(), "alice.txt", ALICE);
	let cancel = Cancellation::new();
	cancel.cancel();

	let processor = FrequencyProcessor::new(ProcessorConfig::new(builtin("en").unwrap())).unwrap();
	let err = processor.process_files(&cancel, &[path]).unwrap_err();
	assert!(err.is_cancelled());
	assert!(processor.table().is_empty());
}

#[test]
fn concurrent_adds_are_not_lost() {
	let threads = num_cpus::get().max(2);
	let table = Arc::new(FrequencyTable::new());

	let handles: Vec<_> = (0..threads)
		.map(|i| {
			let table = Arc::clone(&table);
			std::thread::spawn(move || {
				for n in 0..1000 {
					table.add("shared", 1);
					table.add(&format!("t{i}-{}", n % 10), 1);
				}
			})
		})
		.collect();
	for handle in handles {
		handle.join().unwrap();
	}

	table.update();
	assert_eq!(table.get("shared").unwrap().count, 1000 * threads as u64);
	assert_eq!(table.len(), 1 + 10 * threads);
	assert_eq!(table.get("t0-3").unwrap().count, 100);
}

#[test_log::test]
fn byte_progress_follows_uncompressed_zip_content() {
	let dir = tempfile::tempdir().unwrap();
	let plain = write_file(dir.path(), "a.txt", ALICE);
	let archive = dir.path().join("book.zip");
	write_zip(&archive, &[("b.txt", RABBIT), (".DS_Store", "metadata")]);

	let progress = Arc::new(ByteProgress::new());
	let mut processor = FrequencyProcessor::new(ProcessorConfig::new(builtin("en").unwrap())).unwrap();
	processor.set_progress_reporter(progress.clone());
	processor.process_files(&Cancellation::new(), &[plain, archive]).unwrap();

	let expected = (ALICE.len() + RABBIT.len()) as u64;
	assert_eq!(progress.snapshot(), (expected, expected as i64));
}

#[test]
fn update_run_round_trips_through_csv() {
	let dir = tempfile::tempdir().unwrap();
	let input = write_file(dir.path(), "alice.txt", ALICE);
	let out = dir.path().join("en-letters-2.csv");
	let config = ProcessorConfig::new(builtin("en").unwrap()).token_size(2);

	let first = FrequencyProcessor::new(config.clone()).unwrap();
	first.process_files(&Cancellation::new(), &[input.clone()]).unwrap();
	first.save(&out).unwrap();

	let second = FrequencyProcessor::new(config).unwrap();
	second.load_frequencies_from_file(&out).unwrap();
	second.process_files(&Cancellation::new(), &[input]).unwrap();

	let before = first.table().entries_sorted_by_count();
	let after = second.table().entries_sorted_by_count();
	assert_eq!(before.len(), after.len());
	for (b, a) in before.iter().zip(&after) {
		assert_eq!(a.token, b.token);
		assert_eq!(a.count, 2 * b.count);
		assert!((a.percentage - b.percentage).abs() < 1e-8);
	}
}

#[test_log::test]
fn discovered_language_drives_a_frequency_run() {
	let dir = tempfile::tempdir().unwrap();
	let input = write_file(dir.path(), "bushido.txt", "武士道 武士 道");
	let languages = dir.path().join("languages.csv");

	let mut discover = DiscoverProcessor::new();
	discover.process_files(&Cancellation::new(), &[input.clone()]).unwrap();
	discover.save(&languages).unwrap();

	let unknown = load_languages_from_file(&languages).unwrap().get("unknown").unwrap().clone();
	assert_eq!(unknown.letters(), "士武道");

	let table = run(ProcessorConfig::new(unknown).token_size(2), &[input]);
	let counts: Vec<(&str, u64)> = table.iter().map(|f| (f.token.as_str(), f.count)).collect();
	assert_eq!(counts, vec![("武士", 2), ("士道", 1)]);
}
