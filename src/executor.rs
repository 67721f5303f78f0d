//! Command execution module.
//!
//! A confirmed command line is handed to the host shell (`$SHELL`, falling
//! back to `/bin/sh`) as `shell -c command`; stdout and stderr are captured
//! and relayed, and a non-zero exit becomes an [`AssistantError::Execution`]
//! carrying the status. No sandboxing and no rollback: commands run with the
//! caller's full privileges.

use crate::error::AssistantError;
use anyhow::Result;
use std::process::{Command, Output};
use tracing::{error, info};

/// Trait for running system processes.
///
/// This abstraction enables testing without spawning real processes.
pub trait ProcessRunner: Send + Sync {
    /// Executes a command and returns its output.
    fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
}

/// Default process runner using std::process::Command.
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        Ok(cmd.output()?)
    }
}

/// Executes confirmed command lines through the host shell.
pub struct Executor {
    shell: String,
}

impl Executor {
    /// Creates an executor using `$SHELL`, or `/bin/sh` when unset.
    pub fn new() -> Self {
        Self {
            shell: std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string()),
        }
    }

    /// Creates an executor with an explicit shell (for testing).
    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    /// Runs a command line through the shell, relaying output to the real
    /// stdout/stderr.
    ///
    /// Returns whether the command produced any stdout output.
    ///
    /// # Errors
    ///
    /// * [`AssistantError::Launch`] when the command line is empty or the
    ///   shell cannot be spawned
    /// * [`AssistantError::Execution`] when the command exits non-zero
    pub fn run_command(&self, command: &str) -> Result<bool> {
        self.run_command_with_deps(
            command,
            &SystemProcessRunner,
            &mut std::io::stdout(),
            &mut std::io::stderr(),
        )
    }

    /// Runs a command line with injected dependencies (for testing).
    pub fn run_command_with_deps<P, W1, W2>(
        &self,
        command: &str,
        runner: &P,
        stdout: &mut W1,
        stderr: &mut W2,
    ) -> Result<bool>
    where
        P: ProcessRunner,
        W1: std::io::Write,
        W2: std::io::Write,
    {
        if command.trim().is_empty() {
            return Err(AssistantError::Launch("no command provided".to_string()).into());
        }

        info!("Executing through {}: {}", self.shell, command);

        let output = runner
            .run(&self.shell, &["-c", command])
            .map_err(|err| AssistantError::Launch(err.to_string()))?;

        Self::relay_output(&output, stdout, stderr)
    }

    /// Writes captured output through and turns the exit status into a
    /// result. Returns whether any stdout was produced.
    fn relay_output<W1: std::io::Write, W2: std::io::Write>(
        output: &Output,
        stdout: &mut W1,
        stderr: &mut W2,
    ) -> Result<bool> {
        let had_stdout = !output.stdout.is_empty();
        if had_stdout {
            write!(stdout, "{}", String::from_utf8_lossy(&output.stdout))?;
        }
        if !output.stderr.is_empty() {
            write!(stderr, "{}", String::from_utf8_lossy(&output.stderr))?;
        }

        if output.status.success() {
            Ok(had_stdout)
        } else {
            error!("Command failed with status: {}", output.status);
            let code = output.status.code().unwrap_or(-1);
            Err(AssistantError::Execution { code }.into())
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}
