//! Terminal rendering of suggestions, fallbacks, and status messages.
//!
//! Every message has a `_with_io` variant taking the output writer, so tests
//! capture rendering in buffers; the plain methods write to stdout/stderr
//! and swallow I/O errors, matching the fire-and-forget nature of UI text.

use crate::response::{Safety, Suggestion};
use anyhow::Result;
use colored::{ColoredString, Colorize};
use std::io::{self, Write};

pub struct Presenter {
    verbose: bool,
}

impl Presenter {
    /// Creates a new presenter.
    ///
    /// # Arguments
    ///
    /// * `verbose` - If true, prints additional progress output
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    // =========================================================================
    // Core methods with I/O injection (testable)
    // =========================================================================

    pub fn show_welcome_with_io<W: Write>(&self, output: &mut W) -> Result<()> {
        writeln!(output)?;
        writeln!(
            output,
            "{}",
            "sage: ask for shell commands in plain English".bold().green()
        )?;
        writeln!(
            output,
            "Describe what you want to do; every command is shown and confirmed before it runs."
        )?;
        writeln!(
            output,
            "Type {} or {} to leave.",
            "exit".bold(),
            "quit".bold()
        )?;
        Ok(())
    }

    /// Renders one suggestion: command, explanation, safety line, and the
    /// warning panel when there is one.
    ///
    /// `program_in_path` adds a hint when the suggested program does not
    /// exist on this machine.
    pub fn show_suggestion_with_io<W: Write>(
        &self,
        suggestion: &Suggestion,
        program_in_path: bool,
        output: &mut W,
    ) -> Result<()> {
        writeln!(output)?;
        writeln!(output, "{}", "Suggested command:".bold())?;
        writeln!(output, "  {}", suggestion.command.cyan().bold())?;
        if !program_in_path {
            if let Some(program) = suggestion.program() {
                writeln!(
                    output,
                    "  {}",
                    format!("('{}' was not found in PATH on this machine)", program).yellow()
                )?;
            }
        }

        if !suggestion.explanation.is_empty() {
            writeln!(output)?;
            writeln!(output, "{}", "Explanation:".bold())?;
            writeln!(output, "  {}", suggestion.explanation)?;
        }

        writeln!(output)?;
        writeln!(output, "Safety: {}", render_safety(suggestion.safety))?;
        if let Some(warning) = &suggestion.warning {
            writeln!(output, "{} {}", "⚠️ Warning:".red().bold(), warning.red())?;
        }

        Ok(())
    }

    /// Fallback for replies the parser could not make sense of.
    pub fn show_raw_reply_with_io<W: Write>(&self, raw: &str, output: &mut W) -> Result<()> {
        writeln!(output)?;
        writeln!(
            output,
            "{}",
            "Could not parse the model reply into a command; showing it as-is.".yellow()
        )?;
        writeln!(output)?;
        writeln!(output, "{}", raw.trim())?;
        Ok(())
    }

    pub fn show_processing_with_io<W: Write>(&self, query: &str, output: &mut W) -> Result<()> {
        if self.verbose {
            writeln!(output, "{} {}", "Processing:".blue(), query.bold())?;
        }
        Ok(())
    }

    pub fn show_executing_with_io<W: Write>(&self, output: &mut W) -> Result<()> {
        writeln!(output)?;
        writeln!(output, "{}", "Executing command...".bold())?;
        Ok(())
    }

    pub fn show_no_output_with_io<W: Write>(&self, output: &mut W) -> Result<()> {
        writeln!(
            output,
            "{}",
            "Command executed successfully with no output.".dimmed()
        )?;
        Ok(())
    }

    pub fn show_no_command_with_io<W: Write>(&self, output: &mut W) -> Result<()> {
        writeln!(
            output,
            "{}",
            "Sorry, no command could be generated for that query.".red()
        )?;
        Ok(())
    }

    pub fn show_cancelled_with_io<W: Write>(&self, output: &mut W) -> Result<()> {
        writeln!(output, "{}", "Command execution cancelled.".yellow())?;
        Ok(())
    }

    pub fn show_goodbye_with_io<W: Write>(&self, output: &mut W) -> Result<()> {
        writeln!(output, "{}", "Goodbye!".green())?;
        Ok(())
    }

    pub fn show_error_with_io<W: Write>(&self, error: &anyhow::Error, output: &mut W) -> Result<()> {
        writeln!(output, "{} {}", "❌ Error:".red().bold(), format!("{error:#}").red())?;
        Ok(())
    }

    // =========================================================================
    // Convenience methods using standard I/O
    // =========================================================================

    pub fn show_welcome(&self) {
        let _ = self.show_welcome_with_io(&mut io::stdout());
    }

    pub fn show_suggestion(&self, suggestion: &Suggestion, program_in_path: bool) {
        let _ = self.show_suggestion_with_io(suggestion, program_in_path, &mut io::stdout());
    }

    pub fn show_raw_reply(&self, raw: &str) {
        let _ = self.show_raw_reply_with_io(raw, &mut io::stdout());
    }

    pub fn show_processing(&self, query: &str) {
        let _ = self.show_processing_with_io(query, &mut io::stdout());
    }

    pub fn show_executing(&self) {
        let _ = self.show_executing_with_io(&mut io::stdout());
    }

    pub fn show_no_output(&self) {
        let _ = self.show_no_output_with_io(&mut io::stdout());
    }

    pub fn show_no_command(&self) {
        let _ = self.show_no_command_with_io(&mut io::stdout());
    }

    pub fn show_cancelled(&self) {
        let _ = self.show_cancelled_with_io(&mut io::stdout());
    }

    pub fn show_goodbye(&self) {
        let _ = self.show_goodbye_with_io(&mut io::stdout());
    }

    pub fn show_error(&self, error: &anyhow::Error) {
        let _ = self.show_error_with_io(error, &mut io::stderr());
    }
}

fn render_safety(safety: Safety) -> ColoredString {
    match safety {
        Safety::Safe => safety.to_string().green(),
        Safety::Caution => safety.to_string().yellow(),
        Safety::Unsafe => safety.to_string().red().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(command: &str, safety: Safety, warning: Option<&str>) -> Suggestion {
        Suggestion {
            command: command.to_string(),
            explanation: "Test explanation.".to_string(),
            safety,
            warning: warning.map(|w| w.to_string()),
        }
    }

    fn captured<F: FnOnce(&mut Vec<u8>)>(render: F) -> String {
        let mut output = Vec::new();
        render(&mut output);
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_show_suggestion_includes_command_and_explanation() {
        let presenter = Presenter::new(false);
        let output = captured(|out| {
            presenter
                .show_suggestion_with_io(&suggestion("ls -la", Safety::Safe, None), true, out)
                .unwrap();
        });

        assert!(output.contains("Suggested command:"));
        assert!(output.contains("ls -la"));
        assert!(output.contains("Test explanation."));
        assert!(output.contains("safe"));
    }

    #[test]
    fn test_show_suggestion_renders_warning() {
        let presenter = Presenter::new(false);
        let output = captured(|out| {
            presenter
                .show_suggestion_with_io(
                    &suggestion("rm -rf build", Safety::Unsafe, Some("Deletes files.")),
                    true,
                    out,
                )
                .unwrap();
        });

        assert!(output.contains("unsafe"));
        assert!(output.contains("Warning:"));
        assert!(output.contains("Deletes files."));
    }

    #[test]
    fn test_show_suggestion_hints_missing_program() {
        let presenter = Presenter::new(false);
        let output = captured(|out| {
            presenter
                .show_suggestion_with_io(
                    &suggestion("frobnicate --all", Safety::Safe, None),
                    false,
                    out,
                )
                .unwrap();
        });

        assert!(output.contains("'frobnicate' was not found in PATH"));
    }

    #[test]
    fn test_show_suggestion_skips_empty_explanation() {
        let presenter = Presenter::new(false);
        let sparse = Suggestion {
            command: "pwd".to_string(),
            explanation: String::new(),
            safety: Safety::Safe,
            warning: None,
        };
        let output = captured(|out| {
            presenter.show_suggestion_with_io(&sparse, true, out).unwrap();
        });

        assert!(!output.contains("Explanation:"));
    }

    #[test]
    fn test_show_raw_reply_contains_text() {
        let presenter = Presenter::new(false);
        let output = captured(|out| {
            presenter
                .show_raw_reply_with_io("free form model text", out)
                .unwrap();
        });

        assert!(output.contains("showing it as-is"));
        assert!(output.contains("free form model text"));
    }

    #[test]
    fn test_show_processing_only_in_verbose_mode() {
        let quiet = captured(|out| {
            Presenter::new(false)
                .show_processing_with_io("list files", out)
                .unwrap();
        });
        assert!(quiet.is_empty());

        let verbose = captured(|out| {
            Presenter::new(true)
                .show_processing_with_io("list files", out)
                .unwrap();
        });
        assert!(verbose.contains("list files"));
    }

    #[test]
    fn test_show_error_includes_message() {
        let presenter = Presenter::new(false);
        let error = anyhow::anyhow!("network error: connection refused");
        let output = captured(|out| {
            presenter.show_error_with_io(&error, out).unwrap();
        });

        assert!(output.contains("Error:"));
        assert!(output.contains("connection refused"));
    }

    #[test]
    fn test_status_messages() {
        let presenter = Presenter::new(false);

        let cancelled = captured(|out| presenter.show_cancelled_with_io(out).unwrap());
        assert!(cancelled.contains("cancelled"));

        let no_output = captured(|out| presenter.show_no_output_with_io(out).unwrap());
        assert!(no_output.contains("no output"));

        let no_command = captured(|out| presenter.show_no_command_with_io(out).unwrap());
        assert!(no_command.contains("no command could be generated"));
    }
}
