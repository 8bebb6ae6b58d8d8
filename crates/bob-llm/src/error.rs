use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("unsupported provider '{0}': valid values are ollama, openai, anthropic, groq")]
    UnsupportedProvider(String),

    #[error("provider '{0}' has no settings in llm_config.json (run 'bob llm init')")]
    ProviderNotConfigured(String),

    #[error("no model configured for provider '{0}'")]
    MissingModel(String),

    #[error(
        "no API key configured for provider '{provider}': \
         run 'bob llm set {provider} api_key <key>' or export {env_var}"
    )]
    MissingApiKey { provider: String, env_var: String },

    #[error("could not connect to {provider} at {url}: is the server running?")]
    Connect {
        provider: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("unexpected response format from {provider}: {detail}")]
    MalformedResponse { provider: String, detail: String },
}
