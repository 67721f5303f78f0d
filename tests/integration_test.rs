use anyhow::Result;
use std::io::Write;
use std::process::{Command, Stdio};

/// Helper to run sage in mock mode with the given stdin and capture output
fn run_sage_command(args: &[&str], stdin: &str) -> Result<std::process::Output> {
    let mut cmd = Command::new("cargo");
    cmd.arg("run");
    cmd.arg("--");
    cmd.args(args);

    // Enable mock mode for deterministic, offline testing
    cmd.env("SHELLSAGE_USE_MOCK", "1");
    cmd.stdin(Stdio::piped());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn()?;
    child
        .stdin
        .as_mut()
        .expect("stdin should be piped")
        .write_all(stdin.as_bytes())?;
    let output = child.wait_with_output()?;
    Ok(output)
}

#[test]
fn test_declined_suggestion_is_shown_but_not_executed() -> Result<()> {
    let output = run_sage_command(
        &["list", "files", "in", "the", "current", "directory"],
        "n\n",
    )?;

    assert!(output.status.success(), "declining should not be a failure");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Suggested command"), "should present the command");
    assert!(stdout.contains("ls -la"), "mock suggestion for listing files");
    assert!(stdout.contains("cancelled"), "should report the cancellation");

    // The directory listing never ran, so none of its output appears
    assert!(
        !stdout.contains("Cargo.toml"),
        "declined command must not be executed"
    );

    Ok(())
}

#[test]
fn test_confirmed_command_runs_and_relays_output() -> Result<()> {
    let output = run_sage_command(
        &["list", "files", "in", "the", "current", "directory"],
        "y\n",
    )?;

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ls -la"));
    assert!(stdout.contains("Executing command"));
    assert!(
        stdout.contains("Cargo.toml"),
        "confirmed command output should be relayed"
    );

    Ok(())
}

#[test]
fn test_unsafe_suggestion_shows_warning() -> Result<()> {
    let output = run_sage_command(&["delete", "the", "old", "build", "output"], "n\n")?;

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("unsafe"), "safety rating should be shown");
    assert!(stdout.contains("Warning"), "warning panel should be shown");
    assert!(stdout.contains("cancelled"));

    Ok(())
}

#[test]
fn test_invalid_confirmation_answer_reprompts() -> Result<()> {
    let output = run_sage_command(&["what", "is", "the", "date"], "maybe\nn\n")?;

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Please answer y or n."));
    assert!(stdout.contains("cancelled"));

    Ok(())
}

#[test]
fn test_eof_on_confirmation_declines() -> Result<()> {
    // No stdin at all: the confirmation prompt hits EOF and must decline
    let output = run_sage_command(&["what", "is", "the", "date"], "")?;

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("date"));
    assert!(stdout.contains("cancelled"));

    Ok(())
}

#[test]
fn test_config_flag_shows_configuration_info() -> Result<()> {
    let output = run_sage_command(&["--config"], "")?;

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration file:"));
    assert!(stdout.contains("--set-api-key"));

    Ok(())
}
