use std::path::Path;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ConvertError {
	#[error(transparent)]
	#[diagnostic(code(slim2erb::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to read `{path}`: {source}")]
	#[diagnostic(code(slim2erb::read_error))]
	Read {
		path: String,
		source: std::io::Error,
	},

	#[error("failed to write `{path}`: {source}")]
	#[diagnostic(code(slim2erb::write_error))]
	Write {
		path: String,
		source: std::io::Error,
	},

	#[error("failed to parse `{path}`: {message}")]
	#[diagnostic(code(slim2erb::parse_error))]
	Parse { path: String, message: String },

	#[error("conversion failed in {context}: {message}")]
	#[diagnostic(code(slim2erb::conversion_error))]
	Conversion { context: String, message: String },

	#[error("not a `.slim` file: `{path}`")]
	#[diagnostic(
		code(slim2erb::invalid_extension),
		help("only `.slim` files can be converted")
	)]
	InvalidExtension { path: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(slim2erb::config_parse),
		help("check that slim2erb.toml is valid TOML; see the configuration reference")
	)]
	ConfigParse(String),
}

/// Extension expected on input files.
pub const SOURCE_EXTENSION: &str = "slim";
/// Extension given to generated output files.
pub const OUTPUT_EXTENSION: &str = "erb";

/// Reporting category for aggregated batch summaries. Parse diagnostics are
/// advisory and carry the `Parse` category without failing the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub enum ErrorCategory {
	Read,
	Write,
	Parse,
	Conversion,
	Validation,
	Configuration,
}

impl std::fmt::Display for ErrorCategory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Read => write!(f, "read error"),
			Self::Write => write!(f, "write error"),
			Self::Parse => write!(f, "parse error"),
			Self::Conversion => write!(f, "conversion error"),
			Self::Validation => write!(f, "validation error"),
			Self::Configuration => write!(f, "configuration error"),
		}
	}
}

impl ConvertError {
	/// The reporting category this error belongs to.
	pub fn category(&self) -> ErrorCategory {
		match self {
			Self::Io(_) | Self::Read { .. } => ErrorCategory::Read,
			Self::Write { .. } => ErrorCategory::Write,
			Self::Parse { .. } => ErrorCategory::Parse,
			Self::Conversion { .. } => ErrorCategory::Conversion,
			Self::InvalidExtension { .. } => ErrorCategory::Validation,
			Self::ConfigParse(_) => ErrorCategory::Configuration,
		}
	}

	pub(crate) fn read(path: &Path, source: std::io::Error) -> Self {
		Self::Read {
			path: path.display().to_string(),
			source,
		}
	}

	pub(crate) fn write(path: &Path, source: std::io::Error) -> Self {
		Self::Write {
			path: path.display().to_string(),
			source,
		}
	}
}

pub type ConvertResult<T> = Result<T, ConvertError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
