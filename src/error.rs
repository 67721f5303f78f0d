//! Error kinds shared across the assistant pipeline.
//!
//! Callers branch on these kinds: network and auth failures are reported and
//! the prompt loop continues, parse failures fall back to showing the raw
//! reply, and execution failures surface the exit status.

use thiserror::Error;

/// Errors produced while resolving a single query.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The language model API could not be reached or answered with a
    /// non-auth failure status.
    #[error("network error: {0}")]
    Network(String),

    /// The API rejected the key, or no key is configured at all.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The model reply matched none of the known formats. Carries the raw
    /// reply text so the caller can show it instead of crashing.
    #[error("unrecognized reply format")]
    Parse { raw: String },

    /// The confirmed command ran but exited non-zero.
    #[error("command exited with status {code}")]
    Execution { code: i32 },

    /// The command could not be started at all (empty command line, shell
    /// missing, spawn failure).
    #[error("failed to launch command: {0}")]
    Launch(String),
}
