use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::ConvertError;
use crate::ConvertResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["slim2erb.toml", ".slim2erb.toml"];

/// Configuration loaded from a `slim2erb.toml` file.
///
/// ```toml
/// indent_size = 1
/// preserve_comments = true
/// create_backup = true
/// delete_original = false
/// output_directory = "app/views"
///
/// [exclude]
/// patterns = ["vendor/", "node_modules/"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
	/// Spaces emitted per column of source indentation. The default of 1
	/// preserves the source indentation.
	#[serde(default = "default_indent_size")]
	pub indent_size: usize,
	/// Whether `/` comments are carried into the output as `<%# ... %>`.
	#[serde(default = "default_true")]
	pub preserve_comments: bool,
	/// Whether a `.backup` copy of each input is created before writing.
	#[serde(default = "default_true")]
	pub create_backup: bool,
	/// Whether the `.slim` input is deleted after a successful write.
	#[serde(default)]
	pub delete_original: bool,
	/// Directory generated files are written into. When absent, output lands
	/// next to each input file.
	#[serde(default)]
	pub output_directory: Option<PathBuf>,
	/// Exclusion configuration using gitignore-style patterns, applied during
	/// directory scans.
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// When true, `.gitignore` files are not consulted while scanning.
	#[serde(default)]
	pub disable_gitignore: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeConfig {
	/// Gitignore-style patterns to skip while scanning for `.slim` files.
	#[serde(default)]
	pub patterns: Vec<String>,
}

impl Default for ConvertConfig {
	fn default() -> Self {
		Self {
			indent_size: default_indent_size(),
			preserve_comments: true,
			create_backup: true,
			delete_original: false,
			output_directory: None,
			exclude: ExcludeConfig::default(),
			disable_gitignore: false,
		}
	}
}

impl ConvertConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> ConvertResult<Option<ConvertConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: ConvertConfig =
			toml::from_str(&content).map_err(|e| ConvertError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}
}

fn default_indent_size() -> usize {
	1
}

fn default_true() -> bool {
	true
}
