//! Shellsage - natural language shell assistant library.
//!
//! This library turns plain-language queries into shell commands by asking a
//! hosted language model, and runs them only after explicit user
//! confirmation. It provides:
//!
//! - **Command suggestion** via the Claude API
//! - **Reply parsing** tolerant of JSON, fenced JSON, and labeled sections
//! - **Safety assessment** surfaced before anything runs
//! - **Confirmed execution** through the host shell, relaying output
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management (API key, model, paths)
//! - [`error`] - Error kinds the pipeline branches on
//! - [`http_client`] - HTTP client abstraction
//! - [`llm_client`] - Query client for the language model API
//! - [`response`] - Reply parsing and the suggestion data model
//! - [`presenter`] - Terminal rendering
//! - [`confirm`] - Execution confirmation dialog
//! - [`executor`] - Shell command execution
//! - [`session`] - The per-query pipeline and interactive loop
//!
//! # Example
//!
//! ```ignore
//! use shellsage::{config::Config, session::Session};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let session = Session::new(&config, false)?;
//!
//!     // Suggest, display, confirm, and maybe execute one command
//!     session.process_query("list files in the current directory").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod confirm;
pub mod error;
pub mod executor;
pub mod http_client;
pub mod llm_client;
pub mod presenter;
pub mod response;
pub mod session;
