use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::ConvertResult;
use crate::ErrorCategory;
use crate::config::ConvertConfig;
use crate::error::ConvertError;
use crate::files;
use crate::generator::ErbGenerator;
use crate::generator::GeneratorOptions;
use crate::parser::parse;
use crate::progress::ProgressSink;

/// Everything the conversion pipeline needs for one file or one batch.
#[derive(Debug, Clone)]
pub struct ConvertSettings {
	pub generator: GeneratorOptions,
	pub create_backup: bool,
	pub delete_original: bool,
	pub output_directory: Option<PathBuf>,
}

impl Default for ConvertSettings {
	fn default() -> Self {
		Self {
			generator: GeneratorOptions::default(),
			create_backup: true,
			delete_original: false,
			output_directory: None,
		}
	}
}

impl ConvertSettings {
	/// Construct settings from a loaded config, falling back to defaults when
	/// no config file was found.
	pub fn from_config(config: Option<&ConvertConfig>) -> Self {
		let Some(config) = config else {
			return Self::default();
		};

		Self {
			generator: GeneratorOptions {
				indent_size: config.indent_size,
				emit_comments: config.preserve_comments,
			},
			create_backup: config.create_backup,
			delete_original: config.delete_original,
			output_directory: config.output_directory.clone(),
		}
	}
}

/// Result of converting one file.
#[derive(Debug)]
pub struct FileOutcome {
	/// The `.slim` file that was read.
	pub input: PathBuf,
	/// The `.erb` file that was written.
	pub output: PathBuf,
	/// Advisory parse diagnostics. The file converts even when these are
	/// present.
	pub diagnostics: Vec<String>,
}

/// One reported problem from a batch run, tagged with its category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionIssue {
	pub category: ErrorCategory,
	pub path: Option<PathBuf>,
	pub message: String,
}

/// Aggregated outcome of a batch conversion. Per-file failures never abort
/// the batch; they are counted and collected here.
#[derive(Debug, Default)]
pub struct BatchSummary {
	pub total: usize,
	pub converted: usize,
	pub failed: usize,
	pub issues: Vec<ConversionIssue>,
}

impl BatchSummary {
	/// True when every file converted and no diagnostics were collected.
	pub fn is_ok(&self) -> bool {
		self.failed == 0 && self.issues.is_empty()
	}
}

/// Convert Slim source text to ERB, returning the output together with any
/// parse diagnostics. Pure string to string; no I/O.
pub fn convert_source(source: &str, options: &GeneratorOptions) -> (String, Vec<String>) {
	let result = parse(source);
	let generator = ErbGenerator::new(options.clone());
	(generator.generate(&result.nodes), result.diagnostics)
}

/// Convert a single `.slim` file on disk.
///
/// Validates the extension, reads the source, runs the parse/generate
/// pipeline, and writes the output according to the backup and
/// delete-original policy in `settings`.
pub fn convert_file(path: &Path, settings: &ConvertSettings) -> ConvertResult<FileOutcome> {
	if !files::is_source_file(path) {
		return Err(ConvertError::InvalidExtension {
			path: path.display().to_string(),
		});
	}

	debug!(path = %path.display(), "converting file");
	let source = files::read_source(path)?;
	let (output_text, diagnostics) = convert_source(&source, &settings.generator);
	let output = files::write_output(path, &output_text, settings)?;

	Ok(FileOutcome {
		input: path.to_path_buf(),
		output,
		diagnostics,
	})
}

/// Convert a list of files, continuing past per-file failures.
///
/// Progress is reported per file; `progress.cancelled()` is honored between
/// files, so a batch stops at file granularity. Parse diagnostics from
/// successfully converted files are collected as advisory issues without
/// counting the file as failed.
pub fn convert_batch(
	paths: &[PathBuf],
	settings: &ConvertSettings,
	progress: &mut dyn ProgressSink,
) -> BatchSummary {
	let mut summary = BatchSummary {
		total: paths.len(),
		..BatchSummary::default()
	};

	for (index, path) in paths.iter().enumerate() {
		if progress.cancelled() {
			debug!("batch conversion cancelled");
			break;
		}

		progress.step(index + 1, summary.total, path);

		match convert_file(path, settings) {
			Ok(outcome) => {
				summary.converted += 1;
				for diagnostic in outcome.diagnostics {
					summary.issues.push(ConversionIssue {
						category: ErrorCategory::Parse,
						path: Some(path.clone()),
						message: diagnostic,
					});
				}
			}
			Err(error) => {
				summary.failed += 1;
				progress.error(path, &error.to_string());
				summary.issues.push(ConversionIssue {
					category: error.category(),
					path: Some(path.clone()),
					message: error.to_string(),
				});
			}
		}
	}

	progress.complete(&format!(
		"converted {} of {} file(s)",
		summary.converted, summary.total
	));
	summary
}
