use std::path::Path;
use std::path::PathBuf;

use crate::ConvertError;
use crate::ConvertResult;
use crate::OUTPUT_EXTENSION;
use crate::SOURCE_EXTENSION;
use crate::engine::ConvertSettings;

/// Whether a path carries the `.slim` extension.
pub fn is_source_file(path: &Path) -> bool {
	path.extension()
		.and_then(|ext| ext.to_str())
		.is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// Where the generated file lands: `<stem>.erb` next to the input, or inside
/// the configured output directory.
pub fn output_path(input: &Path, output_directory: Option<&Path>) -> PathBuf {
	let file_name = input.with_extension(OUTPUT_EXTENSION);
	match (output_directory, file_name.file_name()) {
		(Some(dir), Some(name)) => dir.join(name),
		_ => file_name,
	}
}

/// Backups sit next to the original with `.backup` appended to the full file
/// name (`layout.slim` becomes `layout.slim.backup`).
pub fn backup_path(input: &Path) -> PathBuf {
	let mut name = input.as_os_str().to_os_string();
	name.push(".backup");
	PathBuf::from(name)
}

pub fn read_source(path: &Path) -> ConvertResult<String> {
	std::fs::read_to_string(path).map_err(|source| ConvertError::read(path, source))
}

/// Write the generated content, honoring the backup and delete-original
/// policy. Returns the path that was written.
pub fn write_output(input: &Path, content: &str, settings: &ConvertSettings) -> ConvertResult<PathBuf> {
	let output = output_path(input, settings.output_directory.as_deref());

	if settings.create_backup && input.exists() {
		let backup = backup_path(input);
		std::fs::copy(input, &backup).map_err(|source| ConvertError::write(&backup, source))?;
	}

	if let Some(parent) = output.parent() {
		if !parent.as_os_str().is_empty() && !parent.exists() {
			std::fs::create_dir_all(parent).map_err(|source| ConvertError::write(parent, source))?;
		}
	}

	std::fs::write(&output, content).map_err(|source| ConvertError::write(&output, source))?;

	if settings.delete_original && input.exists() {
		std::fs::remove_file(input).map_err(|source| ConvertError::write(input, source))?;
	}

	Ok(output)
}
