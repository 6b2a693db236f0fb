use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use tracing::debug;

use crate::ConvertError;
use crate::ConvertResult;
use crate::files::is_source_file;

/// Find every `.slim` file under `root`, recursively.
///
/// When `disable_gitignore` is false (the default), files matched by the
/// project's `.gitignore` are skipped. `exclude_patterns` follow gitignore
/// syntax and are always applied on top. Results are sorted for deterministic
/// batch ordering.
pub fn find_source_files(
	root: &Path,
	exclude_patterns: &[String],
	disable_gitignore: bool,
) -> ConvertResult<Vec<PathBuf>> {
	let gitignore = if disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(root)
	};
	let custom_exclude = build_exclude_matcher(root, exclude_patterns)?;

	let mut files = Vec::new();
	let mut visited_dirs = HashSet::new();
	walk_dir(root, &mut files, &gitignore, &custom_exclude, &mut visited_dirs)?;
	files.sort();

	debug!(count = files.len(), root = %root.display(), "scanned for source files");
	Ok(files)
}

/// Build a `Gitignore` matcher from configured exclude patterns. These follow
/// `.gitignore` syntax and are applied on top of any `.gitignore` rules.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> ConvertResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			ConvertError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| ConvertError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

/// Build a `Gitignore` matcher from the project's `.gitignore` file (if any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		let _ = builder.add(gitignore_path);
	}
	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

fn walk_dir(
	dir: &Path,
	files: &mut Vec<PathBuf>,
	gitignore: &Gitignore,
	custom_exclude: &Gitignore,
	visited_dirs: &mut HashSet<PathBuf>,
) -> ConvertResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	// Symlink cycles are skipped rather than reported; a cycle only means the
	// directory was already scanned once.
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !visited_dirs.insert(canonical) {
		return Ok(());
	}

	for entry in std::fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
			if is_ignored_directory_name(name) {
				continue;
			}
		}

		let is_dir = path.is_dir();
		if gitignore.matched(&path, is_dir).is_ignore() {
			continue;
		}
		if custom_exclude.matched(&path, is_dir).is_ignore() {
			continue;
		}

		if is_dir {
			walk_dir(&path, files, gitignore, custom_exclude, visited_dirs)?;
		} else if is_source_file(&path) {
			files.push(path);
		}
	}

	Ok(())
}
