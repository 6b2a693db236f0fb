use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use slim2erb_cli::Commands;
use slim2erb_cli::Slim2ErbCli;
use slim2erb_cli::SummaryFormat;
use slim2erb_core::AnyEmptyResult;
use slim2erb_core::BatchSummary;
use slim2erb_core::ConvertSettings;
use slim2erb_core::ErrorCategory;
use slim2erb_core::ProgressSink;
use slim2erb_core::config::ConvertConfig;
use slim2erb_core::convert_batch;
use slim2erb_core::convert_file;
use slim2erb_core::convert_source;
use slim2erb_core::output_path;
use slim2erb_core::read_source;
use slim2erb_core::scanner::find_source_files;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = Slim2ErbCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	if args.verbose {
		let filter = tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("slim2erb_core=debug"));
		let _ = tracing_subscriber::fmt()
			.with_env_filter(filter)
			.with_writer(std::io::stderr)
			.try_init();
	}

	let result = match &args.command {
		Some(Commands::Convert { file }) => run_convert(&args, file),
		Some(Commands::Batch {
			dir,
			dry_run,
			format,
		}) => run_batch(&args, dir.as_deref(), *dry_run, *format),
		Some(Commands::Preview { file }) => run_preview(&args, file),
		None => {
			eprintln!("No subcommand specified. Run `slim2erb --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Render through miette when possible for codes and help text.
		match e.downcast::<slim2erb_core::ConvertError>() {
			Ok(convert_err) => {
				let report: miette::Report = (*convert_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn resolve_root(args: &Slim2ErbCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Load config from the project root and fold the command-line overrides on
/// top of it.
fn load_settings(
	args: &Slim2ErbCli,
) -> Result<(ConvertSettings, Option<ConvertConfig>), slim2erb_core::AnyError> {
	let root = resolve_root(args);
	let config = ConvertConfig::load(&root)?;
	let mut settings = ConvertSettings::from_config(config.as_ref());

	if let Some(indent_size) = args.indent_size {
		settings.generator.indent_size = indent_size;
	}
	if args.no_comments {
		settings.generator.emit_comments = false;
	}
	if args.no_backup {
		settings.create_backup = false;
	}
	if args.delete_original {
		settings.delete_original = true;
	}
	if let Some(output_dir) = &args.output_dir {
		settings.output_directory = Some(output_dir.clone());
	}

	Ok((settings, config))
}

fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}

fn print_parse_warnings(diagnostics: &[String], path: &Path, root: &Path) {
	let rel = make_relative(path, root);
	for diagnostic in diagnostics {
		eprintln!("{} {rel}: {diagnostic}", colored!("warning:", yellow));
	}
}

fn run_convert(args: &Slim2ErbCli, file: &Path) -> AnyEmptyResult {
	let (settings, _) = load_settings(args)?;
	let root = resolve_root(args);

	let outcome = convert_file(file, &settings)?;
	print_parse_warnings(&outcome.diagnostics, &outcome.input, &root);

	println!(
		"{} {} -> {}",
		colored!("Converted", green),
		make_relative(&outcome.input, &root),
		make_relative(&outcome.output, &root)
	);

	Ok(())
}

fn run_preview(args: &Slim2ErbCli, file: &Path) -> AnyEmptyResult {
	let (settings, _) = load_settings(args)?;

	let source = read_source(file)?;
	let (erb, diagnostics) = convert_source(&source, &settings.generator);
	print_parse_warnings(&diagnostics, file, &resolve_root(args));

	println!("{erb}");
	Ok(())
}

/// Prints per-file progress as the batch runs.
struct TerminalProgress {
	root: PathBuf,
}

impl ProgressSink for TerminalProgress {
	fn step(&mut self, current: usize, total: usize, path: &Path) {
		println!(
			"[{current}/{total}] Converting {}",
			make_relative(path, &self.root)
		);
	}

	fn error(&mut self, path: &Path, message: &str) {
		eprintln!(
			"{} {}: {message}",
			colored!("error:", red),
			make_relative(path, &self.root)
		);
	}

	fn complete(&mut self, message: &str) {
		println!("{}", colored!(message, bold));
	}
}

fn run_batch(
	args: &Slim2ErbCli,
	dir: Option<&Path>,
	dry_run: bool,
	format: SummaryFormat,
) -> AnyEmptyResult {
	let (settings, config) = load_settings(args)?;
	let root = resolve_root(args);
	let target = dir.map_or_else(|| root.clone(), Path::to_path_buf);

	let exclude_patterns = config
		.as_ref()
		.map(|c| c.exclude.patterns.clone())
		.unwrap_or_default();
	let disable_gitignore = config.as_ref().is_some_and(|c| c.disable_gitignore);

	let files = find_source_files(&target, &exclude_patterns, disable_gitignore)?;
	if files.is_empty() {
		println!("No .slim files found in {}", target.display());
		return Ok(());
	}

	if dry_run {
		return run_batch_dry_run(&files, &settings, &root);
	}

	let mut progress = TerminalProgress { root: root.clone() };
	let summary = convert_batch(&files, &settings, &mut progress);

	match format {
		SummaryFormat::Json => print_json_summary(&summary, &root),
		SummaryFormat::Text => print_text_summary(&summary, &root),
	}

	if summary.failed > 0 {
		process::exit(1);
	}
	Ok(())
}

fn run_batch_dry_run(files: &[PathBuf], settings: &ConvertSettings, root: &Path) -> AnyEmptyResult {
	for file in files {
		let source = read_source(file)?;
		let (erb, diagnostics) = convert_source(&source, &settings.generator);
		print_parse_warnings(&diagnostics, file, root);

		let output = output_path(file, settings.output_directory.as_deref());
		if output.exists() {
			let existing = std::fs::read_to_string(&output)?;
			if existing == erb {
				println!("unchanged: {}", make_relative(&output, root));
			} else {
				println!("would update: {}", make_relative(&output, root));
				print_diff(&existing, &erb);
			}
		} else {
			println!("would create: {}", make_relative(&output, root));
		}
	}

	println!("Dry run: no files were written.");
	Ok(())
}

fn print_diff(old: &str, new: &str) {
	let diff = TextDiff::from_lines(old, new);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => print!("{}", colored!(format!("-{change}"), red)),
			ChangeTag::Insert => print!("{}", colored!(format!("+{change}"), green)),
			ChangeTag::Equal => print!(" {change}"),
		}
	}
}

fn print_text_summary(summary: &BatchSummary, root: &Path) {
	println!(
		"Batch conversion complete: {}/{} file(s) converted successfully",
		summary.converted, summary.total
	);

	if summary.issues.is_empty() {
		return;
	}

	println!();
	println!("{}", colored!("Issues:", bold));
	for issue in &summary.issues {
		let location = issue
			.path
			.as_deref()
			.map(|path| make_relative(path, root))
			.unwrap_or_default();
		let label = match issue.category {
			ErrorCategory::Parse => colored!(format!("{}:", issue.category), yellow),
			_ => colored!(format!("{}:", issue.category), red),
		};
		println!("  {label} {location}: {}", issue.message);
	}
}

fn print_json_summary(summary: &BatchSummary, root: &Path) {
	let issues: Vec<serde_json::Value> = summary
		.issues
		.iter()
		.map(|issue| {
			serde_json::json!({
				"category": issue.category,
				"path": issue.path.as_deref().map(|path| make_relative(path, root)),
				"message": issue.message,
			})
		})
		.collect();

	println!(
		"{}",
		serde_json::json!({
			"total": summary.total,
			"converted": summary.converted,
			"failed": summary.failed,
			"issues": issues,
		})
	);
}
