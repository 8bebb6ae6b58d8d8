use crate::error::LlmError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── ProviderKind ─────────────────────────────────────────────────────────

/// The closed set of backends `bob` can talk to.
///
/// `Ollama` is a local HTTP daemon; the other three are hosted vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Ollama,
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
    Groq,
}

impl ProviderKind {
    pub fn all() -> &'static [ProviderKind] {
        &[
            ProviderKind::Ollama,
            ProviderKind::OpenAi,
            ProviderKind::Anthropic,
            ProviderKind::Groq,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Ollama => "ollama",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Groq => "groq",
        }
    }

    /// Endpoint root used when the settings carry no `base_url`.
    pub fn default_base_url(self) -> &'static str {
        match self {
            ProviderKind::Ollama => "http://localhost:11434",
            ProviderKind::OpenAi => "https://api.openai.com/v1",
            ProviderKind::Anthropic => "https://api.anthropic.com/v1",
            ProviderKind::Groq => "https://api.groq.com/openai/v1",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Ollama => "llama2",
            ProviderKind::OpenAi => "gpt-4",
            ProviderKind::Anthropic => "claude-3-sonnet",
            ProviderKind::Groq => "mixtral-8x7b-32768",
        }
    }

    /// Environment variable consulted when the configured API key is empty.
    pub fn api_key_env(self) -> Option<&'static str> {
        match self {
            ProviderKind::Ollama => None,
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderKind::Groq => Some("GROQ_API_KEY"),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(ProviderKind::Ollama),
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "groq" => Ok(ProviderKind::Groq),
            _ => Err(LlmError::UnsupportedProvider(s.to_string())),
        }
    }
}

// ─── ProviderSettings ─────────────────────────────────────────────────────

/// Per-provider entry under `providers` in `llm_config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(
        default,
        alias = "ollama_base_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl ProviderSettings {
    pub fn for_kind(kind: ProviderKind) -> Self {
        Self {
            model: kind.default_model().to_string(),
            api_key: String::new(),
            base_url: match kind {
                ProviderKind::Ollama => Some(kind.default_base_url().to_string()),
                _ => None,
            },
            timeout_seconds: None,
        }
    }

    /// First eight characters of the key followed by `...`, or empty.
    pub fn masked_api_key(&self) -> String {
        if self.api_key.is_empty() {
            return String::new();
        }
        let prefix: String = self.api_key.chars().take(8).collect();
        format!("{prefix}...")
    }
}

// ─── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ChatMessage<'a> {
    pub fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

/// `POST /api/chat` on an Ollama daemon.
#[derive(Debug, Serialize)]
pub(crate) struct OllamaChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OllamaChatResponse {
    pub message: ResponseMessage,
}

/// OpenAI-compatible `POST /chat/completions` (OpenAI and Groq).
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Anthropic `POST /messages`.
#[derive(Debug, Serialize)]
pub(crate) struct AnthropicRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicResponse {
    pub content: Vec<AnthropicBlock>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}
