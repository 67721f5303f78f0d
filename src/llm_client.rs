//! Query client for the hosted language model.
//!
//! Sends a natural language query to the Claude messages API and turns the
//! reply into a [`Suggestion`]. No retry, backoff, or caching; one request
//! per query.

use crate::config::Config;
use crate::error::AssistantError;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::response::{self, Safety, Suggestion};
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

/// Trait for turning a natural language query into a command suggestion.
#[async_trait]
pub trait SuggestionGenerator: Send + Sync {
    async fn suggest(&self, query: &str) -> Result<Suggestion, AssistantError>;
}

/// Picks the generator for the given configuration.
///
/// Mock mode short-circuits to the offline [`MockClient`]; otherwise an API
/// key is required.
///
/// # Errors
///
/// Returns [`AssistantError::Auth`] with setup guidance when no key is
/// configured.
pub fn generator_from_config(config: &Config) -> Result<Box<dyn SuggestionGenerator>, AssistantError> {
    if config.is_mock_mode() {
        info!("Using mock generator (SHELLSAGE_USE_MOCK=1)");
        return Ok(Box::new(MockClient::new()));
    }

    match config.get_api_key() {
        Some(api_key) => {
            info!("Using Claude API for command suggestions");
            Ok(Box::new(LlmClient::new(
                api_key.clone(),
                config.model().to_string(),
            )))
        }
        None => Err(AssistantError::Auth(
            "No Anthropic API key found. Please set it using one of these methods:\n\
             \n\
             1. Store it in the config file:\n\
                sage --set-api-key sk-ant-your-key-here\n\
             \n\
             2. Set the environment variable:\n\
                export ANTHROPIC_API_KEY=sk-ant-your-key-here\n\
             \n\
             3. Check the current config:\n\
                sage --config\n\
             \n\
             Get your API key from: https://console.anthropic.com"
                .to_string(),
        )),
    }
}

/// Production client backed by the Claude messages API.
pub struct LlmClient {
    http: Box<dyn HttpClient>,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_http_client(Box::new(ReqwestHttpClient::new()), api_key, model)
    }

    /// Creates a client with an injected HTTP transport (for testing).
    pub fn with_http_client(http: Box<dyn HttpClient>, api_key: String, model: String) -> Self {
        Self {
            http,
            api_key,
            model,
        }
    }

    fn build_prompt(query: &str) -> String {
        format!(
            "You are a terminal assistant for {}. Interpret this natural language request as a shell command:\n\
             \n\
             \"{}\"\n\
             \n\
             RESPOND WITH EXACTLY ONE JSON OBJECT AND NOTHING ELSE:\n\
             {{\n\
               \"command\": \"the shell command\",\n\
               \"explanation\": \"clear explanation of what the command does\",\n\
               \"safe\": true,\n\
               \"warning\": \"warning message if the command is potentially destructive\"\n\
             }}\n\
             \n\
             RULES:\n\
             - Prefer portable, widely available tools\n\
             - Never invent flags\n\
             - Set \"safe\" to false for destructive or privileged commands\n\
             - Omit \"warning\" when there is nothing to warn about\n\
             - NO markdown code fences, NO text outside the JSON object",
            std::env::consts::OS,
            query
        )
    }

    /// Pulls the assistant text out of the messages API response envelope.
    fn extract_reply_text(body: &str) -> Result<String, AssistantError> {
        let envelope: serde_json::Value =
            serde_json::from_str(body).map_err(|_| AssistantError::Parse {
                raw: body.to_string(),
            })?;

        envelope
            .get("content")
            .and_then(|c| c.as_array())
            .and_then(|arr| arr.first())
            .and_then(|item| item.get("text"))
            .and_then(|text| text.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| AssistantError::Parse {
                raw: body.to_string(),
            })
    }

    /// Best-effort extraction of the API's own error message.
    fn api_error_message(body: &str) -> String {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("error")?
                    .get("message")?
                    .as_str()
                    .map(|s| s.to_string())
            })
            .unwrap_or_else(|| body.to_string())
    }
}

#[async_trait]
impl SuggestionGenerator for LlmClient {
    async fn suggest(&self, query: &str) -> Result<Suggestion, AssistantError> {
        let prompt = Self::build_prompt(query);
        let request_body = json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ]
        });

        debug!("Sending query to {}", API_URL);
        let response = self
            .http
            .post_json(
                API_URL,
                &[
                    ("x-api-key", self.api_key.as_str()),
                    ("content-type", "application/json"),
                    ("anthropic-version", API_VERSION),
                ],
                &request_body,
            )
            .await
            .map_err(|err| AssistantError::Network(err.to_string()))?;

        if response.status == 401 || response.status == 403 {
            return Err(AssistantError::Auth(Self::api_error_message(&response.body)));
        }
        if !response.is_success() {
            return Err(AssistantError::Network(format!(
                "API returned status {}: {}",
                response.status,
                Self::api_error_message(&response.body)
            )));
        }

        let reply = Self::extract_reply_text(&response.body)?;
        debug!("Model reply: {}", reply);
        response::parse_reply(&reply)
    }
}

/// Offline generator with canned, keyword-driven suggestions.
///
/// Used in mock mode for deterministic testing without network access.
pub struct MockClient;

impl MockClient {
    pub fn new() -> Self {
        Self
    }

    pub fn canned_suggestion(query: &str) -> Suggestion {
        let lower = query.to_lowercase();

        if lower.contains("list") && lower.contains("file") {
            Suggestion {
                command: "ls -la".to_string(),
                explanation: "Lists all files in the current directory, including hidden ones, in long format.".to_string(),
                safety: Safety::Safe,
                warning: None,
            }
        } else if lower.contains("disk") {
            Suggestion {
                command: "df -h".to_string(),
                explanation: "Shows disk usage of all mounted filesystems in human readable units.".to_string(),
                safety: Safety::Safe,
                warning: None,
            }
        } else if lower.contains("memory") || lower.contains("ram") {
            Suggestion {
                command: "free -h".to_string(),
                explanation: "Shows total, used and available memory in human readable units.".to_string(),
                safety: Safety::Safe,
                warning: None,
            }
        } else if lower.contains("process") {
            Suggestion {
                command: "ps aux".to_string(),
                explanation: "Lists every running process with its owner and resource usage.".to_string(),
                safety: Safety::Safe,
                warning: None,
            }
        } else if lower.contains("delete") || lower.contains("remove") {
            Suggestion {
                command: "rm -r ./build-artifacts".to_string(),
                explanation: "Removes the build-artifacts directory and everything under it.".to_string(),
                safety: Safety::Unsafe,
                warning: Some(
                    "This permanently deletes files; double-check the path before running."
                        .to_string(),
                ),
            }
        } else if lower.contains("date") || lower.contains("time") {
            Suggestion {
                command: "date".to_string(),
                explanation: "Prints the current date and time.".to_string(),
                safety: Safety::Safe,
                warning: None,
            }
        } else {
            Suggestion {
                command: format!("echo '{}'", query.replace('\'', "")),
                explanation: "No canned suggestion matched; echoes the query back.".to_string(),
                safety: Safety::Safe,
                warning: None,
            }
        }
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SuggestionGenerator for MockClient {
    async fn suggest(&self, query: &str) -> Result<Suggestion, AssistantError> {
        Ok(Self::canned_suggestion(query))
    }
}
