use crate::error::LlmError;
use crate::resolver::ResolvedProvider;
use crate::types::{
    AnthropicRequest, AnthropicResponse, ChatCompletionRequest, ChatCompletionResponse,
    ChatMessage, OllamaChatRequest, OllamaChatResponse, ProviderKind,
};
use crate::Result;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: u32 = 1024;

/// Anything that turns a prompt into text. Workflow code depends on this
/// rather than on [`LlmClient`] directly.
pub trait Complete {
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Blocking HTTP client bound to one resolved provider.
#[derive(Debug)]
pub struct LlmClient {
    provider: ResolvedProvider,
    http: Client,
}

impl LlmClient {
    pub fn new(provider: ResolvedProvider) -> Result<Self> {
        let http = Client::builder().timeout(provider.timeout).build()?;
        Ok(Self { provider, http })
    }

    pub fn kind(&self) -> ProviderKind {
        self.provider.kind
    }

    pub fn model(&self) -> &str {
        &self.provider.model
    }

    /// Send a single user-role prompt and return the model's text.
    pub fn send(&self, prompt: &str) -> Result<String> {
        tracing::debug!(
            provider = %self.provider.kind,
            model = %self.provider.model,
            prompt_len = prompt.len(),
            "sending prompt"
        );
        let result = match self.provider.kind {
            ProviderKind::Ollama => self.send_ollama(prompt),
            ProviderKind::OpenAi | ProviderKind::Groq => self.send_chat_completions(prompt),
            ProviderKind::Anthropic => self.send_anthropic(prompt),
        };
        if let Err(e) = &result {
            tracing::warn!(provider = %self.provider.kind, error = %e, "provider call failed");
        }
        result
    }

    fn send_ollama(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.provider.base_url);
        let body = OllamaChatRequest {
            model: &self.provider.model,
            messages: vec![ChatMessage::user(prompt)],
            stream: false,
        };
        let resp: OllamaChatResponse = self.post_json(&url, &body, self.http.post(&url))?;
        resp.message
            .content
            .ok_or_else(|| self.malformed("missing message.content"))
    }

    fn send_chat_completions(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.provider.base_url);
        let body = ChatCompletionRequest {
            model: &self.provider.model,
            messages: vec![ChatMessage::user(prompt)],
        };
        let mut req = self.http.post(&url);
        if let Some(key) = &self.provider.api_key {
            req = req.bearer_auth(key);
        }
        let resp: ChatCompletionResponse = self.post_json(&url, &body, req)?;
        resp.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| self.malformed("missing choices[0].message.content"))
    }

    fn send_anthropic(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/messages", self.provider.base_url);
        let body = AnthropicRequest {
            model: &self.provider.model,
            max_tokens: ANTHROPIC_MAX_TOKENS,
            messages: vec![ChatMessage::user(prompt)],
        };
        let mut req = self
            .http
            .post(&url)
            .header("anthropic-version", ANTHROPIC_VERSION);
        if let Some(key) = &self.provider.api_key {
            req = req.header("x-api-key", key);
        }
        let resp: AnthropicResponse = self.post_json(&url, &body, req)?;
        let text: Vec<String> = resp
            .content
            .into_iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text)
            .collect();
        if text.is_empty() {
            return Err(self.malformed("no text content blocks"));
        }
        Ok(text.join(""))
    }

    fn post_json<B, R>(&self, url: &str, body: &B, req: RequestBuilder) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let resp = req.json(body).send().map_err(|e| {
            if e.is_connect() {
                LlmError::Connect {
                    provider: self.provider.kind.to_string(),
                    url: url.to_string(),
                    source: e,
                }
            } else {
                LlmError::Http(e)
            }
        })?;

        let status = resp.status();
        let text = resp.text()?;
        if !status.is_success() {
            return Err(LlmError::Status {
                provider: self.provider.kind.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_str(&text).map_err(|e| self.malformed(&e.to_string()))
    }

    fn malformed(&self, detail: &str) -> LlmError {
        LlmError::MalformedResponse {
            provider: self.provider.kind.to_string(),
            detail: detail.to_string(),
        }
    }
}

impl Complete for LlmClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        self.send(prompt)
    }
}
