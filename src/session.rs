//! The assistant loop: wires the query client, presenter, confirmation
//! dialog, and executor into the per-query pipeline, and hosts the
//! interactive prompt.

use crate::{
    config::Config,
    confirm::{ConfirmationUi, Consent},
    error::AssistantError,
    executor::Executor,
    llm_client::{SuggestionGenerator, generator_from_config},
    presenter::Presenter,
    response::Suggestion,
};
use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fs;
use tracing::{info, warn};
use which::which;

const EXIT_WORDS: [&str; 3] = ["exit", "quit", "q"];

/// Programs the shell resolves itself, so a PATH lookup would wrongly flag
/// them as missing.
const SHELL_BUILTINS: [&str; 8] = [
    "cd", "export", "source", "alias", "unalias", "set", "unset", "echo",
];

pub struct Session {
    generator: Box<dyn SuggestionGenerator>,
    presenter: Presenter,
    confirm: ConfirmationUi,
    executor: Executor,
}

impl Session {
    pub fn new(config: &Config, verbose: bool) -> Result<Self, AssistantError> {
        Ok(Self {
            generator: generator_from_config(config)?,
            presenter: Presenter::new(verbose),
            confirm: ConfirmationUi::new(),
            executor: Executor::new(),
        })
    }

    /// Resolves one query end to end: generate, present, confirm, execute.
    ///
    /// Parse failures are handled here by showing the raw reply; network,
    /// auth, and execution failures propagate so the caller decides whether
    /// to keep the loop running.
    pub async fn process_query(&self, query: &str) -> Result<()> {
        info!("Processing query: {}", query);
        self.presenter.show_processing(query);

        let suggestion = match self.generator.suggest(query).await {
            Ok(suggestion) => suggestion,
            Err(AssistantError::Parse { raw }) => {
                warn!("Model reply matched no known format, falling back to raw text");
                self.presenter.show_raw_reply(&raw);
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        if suggestion.command.is_empty() {
            self.presenter.show_no_command();
            return Ok(());
        }

        self.presenter
            .show_suggestion(&suggestion, program_available(&suggestion));

        match self.confirm.prompt_for_confirmation(&suggestion.command)? {
            Consent::No => {
                info!("User declined to run: {}", suggestion.command);
                self.presenter.show_cancelled();
                Ok(())
            }
            Consent::Yes => {
                self.presenter.show_executing();
                let produced_output = self.executor.run_command(&suggestion.command)?;
                if !produced_output {
                    self.presenter.show_no_output();
                }
                Ok(())
            }
        }
    }

    /// Interactive prompt loop. One query is fully resolved before the next
    /// is read; errors are reported and the loop continues.
    pub async fn run_interactive(&self) -> Result<()> {
        self.presenter.show_welcome();

        let mut editor = DefaultEditor::new()?;
        let history_path = Config::history_file_path().ok();
        if let Some(path) = &history_path {
            if editor.load_history(path).is_err() {
                info!("No existing prompt history at {}", path.display());
            }
        }

        loop {
            match editor.readline("sage> ") {
                Ok(line) => {
                    let query = line.trim();
                    if query.is_empty() {
                        continue;
                    }
                    let lower = query.to_lowercase();
                    if EXIT_WORDS.contains(&lower.as_str()) {
                        break;
                    }
                    let _ = editor.add_history_entry(query);
                    if let Err(err) = self.process_query(query).await {
                        self.presenter.show_error(&err);
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }

        if let Some(path) = &history_path {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Err(err) = editor.save_history(path) {
                warn!("Failed to save prompt history to {}: {}", path.display(), err);
            }
        }

        self.presenter.show_goodbye();
        Ok(())
    }
}

/// Whether the program a suggestion would invoke exists on this machine.
fn program_available(suggestion: &Suggestion) -> bool {
    match suggestion.program() {
        Some(program) => SHELL_BUILTINS.contains(&program) || which(program).is_ok(),
        None => true,
    }
}
