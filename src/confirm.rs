//! User confirmation dialog for command execution.
//!
//! Nothing is ever executed without an explicit affirmative answer collected
//! here; an end of input on the prompt counts as a refusal.

use anyhow::Result;
use std::io::{self, BufRead, Write};
use tracing::info;

/// The user's answer to the execution prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    Yes,
    No,
}

pub struct ConfirmationUi;

impl ConfirmationUi {
    pub fn new() -> Self {
        Self
    }

    /// Prompts the user for confirmation using custom I/O streams.
    ///
    /// `y`/`yes` affirms, `n`/`no` declines, anything else reprompts.
    /// EOF on the input declines.
    ///
    /// # Errors
    ///
    /// Returns an error if I/O operations fail.
    pub fn prompt_for_confirmation_with_io<R: BufRead, W: Write>(
        &self,
        command: &str,
        input: &mut R,
        output: &mut W,
    ) -> Result<Consent> {
        loop {
            write!(output, "\nDo you want to execute this command? (y/n): ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                info!("End of input on confirmation prompt for '{}', declining", command);
                return Ok(Consent::No);
            }

            match line.trim().to_lowercase().as_str() {
                "y" | "yes" => {
                    info!("User confirmed execution of '{}'", command);
                    return Ok(Consent::Yes);
                }
                "n" | "no" => {
                    info!("User declined execution of '{}'", command);
                    return Ok(Consent::No);
                }
                _ => {
                    writeln!(output, "Please answer y or n.")?;
                }
            }
        }
    }

    /// Prompts on stdin/stdout.
    ///
    /// This is a convenience wrapper around
    /// [`Self::prompt_for_confirmation_with_io`].
    pub fn prompt_for_confirmation(&self, command: &str) -> Result<Consent> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        self.prompt_for_confirmation_with_io(command, &mut input, &mut output)
    }
}

impl Default for ConfirmationUi {
    fn default() -> Self {
        Self::new()
    }
}
