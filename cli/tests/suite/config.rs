use anyhow::Result;
use predicates::str::contains;
use tempfile::TempDir;

use super::chatmark_command;

#[test]
fn print_config_shows_defaults() -> Result<()> {
    let home = TempDir::new()?;

    chatmark_command(home.path())?
        .arg("--print-config")
        .assert()
        .success()
        .stdout("[render]\nbreaks = true\ngfm = true\n");

    Ok(())
}

#[test]
fn config_file_is_honored() -> Result<()> {
    let home = TempDir::new()?;
    std::fs::write(home.path().join("config.toml"), "[render]\nbreaks = false\n")?;

    chatmark_command(home.path())?
        .write_stdin("line1\nline2")
        .assert()
        .success()
        .stdout("<p>line1\nline2</p>\n");

    Ok(())
}

#[test]
fn cli_override_beats_config_file() -> Result<()> {
    let home = TempDir::new()?;
    std::fs::write(home.path().join("config.toml"), "[render]\nbreaks = false\n")?;

    chatmark_command(home.path())?
        .args(["-c", "render.breaks=true", "--print-config"])
        .assert()
        .success()
        .stdout(contains("breaks = true"));

    Ok(())
}

#[test]
fn invalid_config_fails_with_path() -> Result<()> {
    let home = TempDir::new()?;
    std::fs::write(home.path().join("config.toml"), "[render]\nbreakz = true\n")?;

    chatmark_command(home.path())?
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(contains("load config"))
        .stderr(contains("config.toml"));

    Ok(())
}

#[test]
fn malformed_override_is_rejected() -> Result<()> {
    let home = TempDir::new()?;

    chatmark_command(home.path())?
        .args(["-c", "render.breaks"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(contains("missing '='"));

    Ok(())
}
