use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Convert Slim templates to ERB.",
	long_about = "slim2erb converts Slim templates into equivalent ERB, reconstructing explicit \
	              tag nesting from Slim's significant indentation.\n\nQuick start:\n  slim2erb \
	              convert page.slim   Convert one file\n  slim2erb batch app/views  Convert a \
	              whole directory\n  slim2erb preview page.slim  Print the ERB without writing"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Slim2ErbCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory. Used for config discovery and as
	/// the default directory for `batch`.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,

	/// Spaces emitted per column of source indentation (1 preserves the
	/// source indentation). Overrides the config file.
	#[arg(long, global = true)]
	pub indent_size: Option<usize>,

	/// Skip creating a `.backup` copy of each input before writing.
	#[arg(long, global = true, default_value_t = false)]
	pub no_backup: bool,

	/// Delete each `.slim` input after its ERB file is written.
	#[arg(long, global = true, default_value_t = false)]
	pub delete_original: bool,

	/// Directory converted files are written into. Defaults to writing next
	/// to each input file.
	#[arg(long, global = true)]
	pub output_dir: Option<PathBuf>,

	/// Drop `/` comments instead of emitting them as `<%# ... %>`.
	#[arg(long, global = true, default_value_t = false)]
	pub no_comments: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Convert a single Slim file to ERB.
	///
	/// Writes `<name>.erb` next to the input (or into `--output-dir`),
	/// creating `<name>.slim.backup` first unless `--no-backup` is given.
	/// Parse diagnostics are printed as warnings; the file still converts.
	Convert {
		/// The `.slim` file to convert.
		file: PathBuf,
	},
	/// Convert every `.slim` file under a directory.
	///
	/// Files are discovered recursively, honoring `.gitignore` and any
	/// `[exclude]` patterns from `slim2erb.toml`. Per-file failures never
	/// abort the batch; a summary with per-category issues is printed at the
	/// end and the exit code is 1 when any file failed.
	Batch {
		/// Directory to scan. Defaults to `--path` or the current directory.
		dir: Option<PathBuf>,

		/// Show what would be written without touching any file. When an
		/// output file already exists, a unified diff against the new
		/// content is printed.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Output format for the batch summary. Use `text` for
		/// human-readable output or `json` for programmatic consumption.
		#[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
		format: SummaryFormat,
	},
	/// Print the converted ERB for a file without writing anything.
	///
	/// The ERB goes to stdout so it can be piped; parse diagnostics go to
	/// stderr.
	Preview {
		/// The `.slim` file to preview.
		file: PathBuf,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SummaryFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption. Includes counts and the
	/// categorized issue list.
	Json,
}
