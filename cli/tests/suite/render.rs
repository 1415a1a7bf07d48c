use anyhow::Result;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use super::chatmark_command;

#[test]
fn renders_stdin_to_stdout() -> Result<()> {
    let home = TempDir::new()?;

    let output = chatmark_command(home.path())?
        .write_stdin("**bold** and _em_")
        .output()?;
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout)?,
        "<p><strong>bold</strong> and <em>em</em></p>\n"
    );

    Ok(())
}

#[test]
fn strips_script_from_stdin() -> Result<()> {
    let home = TempDir::new()?;

    chatmark_command(home.path())?
        .write_stdin("<script>alert(1)</script>hello")
        .assert()
        .success()
        .stdout(contains("hello").and(contains("script").not()));

    Ok(())
}

#[test]
fn renders_file_to_output_file() -> Result<()> {
    let home = TempDir::new()?;
    let work = TempDir::new()?;
    let input = work.path().join("message.md");
    let output = work.path().join("message.html");
    std::fs::write(&input, "[click](https://evil.example)")?;

    chatmark_command(home.path())?
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout("");

    let html = std::fs::read_to_string(&output)?;
    assert!(html.contains(r#"target="_blank""#), "{html}");
    assert!(html.contains(r#"rel="noopener noreferrer""#), "{html}");

    Ok(())
}

#[test]
fn dash_reads_stdin() -> Result<()> {
    let home = TempDir::new()?;

    chatmark_command(home.path())?
        .arg("-")
        .write_stdin("plain")
        .assert()
        .success()
        .stdout("<p>plain</p>\n");

    Ok(())
}

#[test]
fn no_breaks_flag_keeps_soft_breaks() -> Result<()> {
    let home = TempDir::new()?;

    chatmark_command(home.path())?
        .arg("--no-breaks")
        .write_stdin("line1\nline2")
        .assert()
        .success()
        .stdout("<p>line1\nline2</p>\n");

    Ok(())
}

#[test]
fn no_gfm_flag_disables_strikethrough() -> Result<()> {
    let home = TempDir::new()?;

    chatmark_command(home.path())?
        .arg("--no-gfm")
        .write_stdin("~~gone~~")
        .assert()
        .success()
        .stdout("<p>~~gone~~</p>\n");

    Ok(())
}

#[test]
fn missing_input_file_fails_with_context() -> Result<()> {
    let home = TempDir::new()?;

    chatmark_command(home.path())?
        .arg(home.path().join("does-not-exist.md"))
        .assert()
        .failure()
        .stderr(contains("read input from"));

    Ok(())
}

#[test]
fn help_lists_flags() -> Result<()> {
    let home = TempDir::new()?;

    chatmark_command(home.path())?
        .arg("--help")
        .assert()
        .success()
        .stdout(
            contains("--jsonl")
                .and(contains("--no-breaks"))
                .and(contains("--no-gfm"))
                .and(contains("--config")),
        );

    Ok(())
}
