mod common;

use slim2erb_core::AnyEmptyResult;

#[test]
fn preview_prints_erb_without_writing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = tmp.path().join("page.slim");
	std::fs::write(&input, "div\n  p= @user.name")?;

	let mut cmd = common::slim2erb_cmd();
	cmd.arg("preview")
		.arg(&input)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("<div>"))
		.stdout(predicates::str::contains("<p><%= @user.name %></p>"))
		.stdout(predicates::str::contains("</div>"));

	assert!(!tmp.path().join("page.erb").exists());
	assert!(!tmp.path().join("page.slim.backup").exists());

	Ok(())
}

#[test]
fn preview_surfaces_diagnostics_on_stderr() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = tmp.path().join("odd.slim");
	std::fs::write(&input, "div title=\"oops")?;

	let mut cmd = common::slim2erb_cmd();
	cmd.arg("preview")
		.arg(&input)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("unterminated"));

	Ok(())
}

#[test]
fn preview_fails_for_missing_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let mut cmd = common::slim2erb_cmd();
	cmd.arg("preview")
		.arg(tmp.path().join("nope.slim"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.code(2);

	Ok(())
}
