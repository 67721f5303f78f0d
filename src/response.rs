//! Parsing of model replies into command suggestions.
//!
//! The model is asked for a strict JSON object, but replies arrive in the
//! wild in several shapes. Parsing tries, in order:
//!
//! 1. The whole reply as a JSON object
//! 2. The first balanced `{ ... }` blob embedded in the reply (models like
//!    wrapping JSON in prose or code fences)
//! 3. Labeled sections (`Command:`, `Explanation:`, `Safety:`)
//!
//! Anything else fails with a parse error that carries the raw reply, so the
//! caller can show the text as-is instead of crashing.

use crate::error::AssistantError;
use serde::Deserialize;
use std::fmt;
use tracing::debug;

/// Safety assessment of a suggested command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Safety {
    Safe,
    Caution,
    Unsafe,
}

impl Safety {
    /// Derives a safety level from a free-text label such as the content of
    /// a `Safety:` section. Unknown labels map to [`Safety::Caution`].
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        // "unsafe" contains "safe", so check the stronger words first
        if label.contains("unsafe") || label.contains("danger") {
            Safety::Unsafe
        } else if label.contains("caution") || label.contains("warning") || label.contains("careful")
        {
            Safety::Caution
        } else if label.contains("safe") {
            Safety::Safe
        } else {
            Safety::Caution
        }
    }
}

impl fmt::Display for Safety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Safety::Safe => write!(f, "safe"),
            Safety::Caution => write!(f, "caution"),
            Safety::Unsafe => write!(f, "unsafe"),
        }
    }
}

/// A parsed command suggestion: the result of one query.
///
/// Built fresh per query and discarded after the display/confirm/execute
/// cycle; nothing here persists.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub command: String,
    pub explanation: String,
    pub safety: Safety,
    pub warning: Option<String>,
}

impl Suggestion {
    /// First whitespace-separated token of the command, i.e. the program
    /// that would be invoked.
    pub fn program(&self) -> Option<&str> {
        self.command.split_whitespace().next()
    }
}

/// The JSON shape the model is instructed to reply with.
#[derive(Debug, Deserialize)]
struct RawReply {
    #[serde(default)]
    command: String,
    #[serde(default)]
    explanation: String,
    #[serde(default = "default_safe")]
    safe: bool,
    #[serde(default)]
    warning: Option<String>,
}

fn default_safe() -> bool {
    true
}

impl From<RawReply> for Suggestion {
    fn from(raw: RawReply) -> Self {
        let warning = raw.warning.filter(|w| !w.trim().is_empty());
        let safety = if !raw.safe {
            Safety::Unsafe
        } else if warning.is_some() {
            Safety::Caution
        } else {
            Safety::Safe
        };

        Suggestion {
            command: raw.command.trim().to_string(),
            explanation: raw.explanation.trim().to_string(),
            safety,
            warning,
        }
    }
}

/// Parses a raw model reply into a [`Suggestion`].
///
/// # Errors
///
/// Fails with [`AssistantError::Parse`] carrying the raw text when none of
/// the known formats match.
pub fn parse_reply(raw: &str) -> Result<Suggestion, AssistantError> {
    let text = raw.trim();

    if let Ok(reply) = serde_json::from_str::<RawReply>(text) {
        debug!("Parsed reply as a bare JSON object");
        return Ok(reply.into());
    }

    if let Some(blob) = extract_json_object(text) {
        if let Ok(reply) = serde_json::from_str::<RawReply>(blob) {
            debug!("Parsed reply from an embedded JSON object");
            return Ok(reply.into());
        }
    }

    if let Some(suggestion) = parse_labeled_sections(text) {
        debug!("Parsed reply from labeled sections");
        return Ok(suggestion);
    }

    Err(AssistantError::Parse {
        raw: raw.to_string(),
    })
}

/// Returns the first balanced `{ ... }` slice of `text`, respecting string
/// literals and escapes so braces inside JSON strings don't end the scan.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parses a reply written as labeled sections.
///
/// Labels are matched case-insensitively at the start of a line; lines that
/// carry no label continue the current section. A reply without a command is
/// not a suggestion, but missing explanation or safety sections just leave
/// those fields empty / defaulted.
fn parse_labeled_sections(text: &str) -> Option<Suggestion> {
    #[derive(Clone, Copy)]
    enum Section {
        Command,
        Explanation,
        Safety,
    }

    let mut command = String::new();
    let mut explanation = String::new();
    let mut safety_label = String::new();
    let mut current: Option<Section> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        let lower = trimmed.to_lowercase();

        if lower.starts_with("command:") {
            current = Some(Section::Command);
            append_section_line(&mut command, trimmed["command:".len()..].trim());
        } else if lower.starts_with("explanation:") {
            current = Some(Section::Explanation);
            append_section_line(&mut explanation, trimmed["explanation:".len()..].trim());
        } else if lower.starts_with("safety:") {
            current = Some(Section::Safety);
            append_section_line(&mut safety_label, trimmed["safety:".len()..].trim());
        } else {
            match current {
                Some(Section::Command) => append_section_line(&mut command, trimmed),
                Some(Section::Explanation) => append_section_line(&mut explanation, trimmed),
                Some(Section::Safety) => append_section_line(&mut safety_label, trimmed),
                None => {}
            }
        }
    }

    // Models like fencing the command in backticks
    let command = command.trim().trim_matches('`').trim().to_string();
    if command.is_empty() {
        return None;
    }

    let safety = if safety_label.is_empty() {
        Safety::Safe
    } else {
        Safety::from_label(&safety_label)
    };

    Some(Suggestion {
        command,
        explanation: explanation.trim().to_string(),
        safety,
        warning: None,
    })
}

fn append_section_line(section: &mut String, line: &str) {
    if line.is_empty() {
        return;
    }
    if !section.is_empty() {
        section.push('\n');
    }
    section.push_str(line);
}
