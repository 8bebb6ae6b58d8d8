use crate::client::LlmClient;
use crate::error::LlmError;
use crate::types::{ProviderKind, ProviderSettings};
use crate::Result;
use std::collections::BTreeMap;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// A provider whose settings have been validated. Holding one means the
/// model is known and, for hosted vendors, an API key is present.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProvider {
    pub kind: ProviderKind,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

/// Resolve `name` against `providers`, reading fallback API keys from the
/// process environment.
pub fn resolve(
    name: &str,
    providers: &BTreeMap<String, ProviderSettings>,
) -> Result<ResolvedProvider> {
    resolve_with_env(name, providers, |var| std::env::var(var).ok())
}

/// Same as [`resolve`] with an injectable environment lookup.
pub fn resolve_with_env<F>(
    name: &str,
    providers: &BTreeMap<String, ProviderSettings>,
    env: F,
) -> Result<ResolvedProvider>
where
    F: Fn(&str) -> Option<String>,
{
    let kind: ProviderKind = name.parse()?;
    let settings = providers
        .get(kind.as_str())
        .ok_or_else(|| LlmError::ProviderNotConfigured(kind.to_string()))?;

    let model = settings.model.trim();
    if model.is_empty() {
        return Err(LlmError::MissingModel(kind.to_string()));
    }

    let api_key = match kind.api_key_env() {
        Some(env_var) => Some(
            non_empty(&settings.api_key)
                .map(str::to_string)
                .or_else(|| env(env_var).filter(|k| !k.trim().is_empty()))
                .ok_or_else(|| LlmError::MissingApiKey {
                    provider: kind.to_string(),
                    env_var: env_var.to_string(),
                })?,
        ),
        None => non_empty(&settings.api_key).map(str::to_string),
    };

    let base_url = settings
        .base_url
        .as_deref()
        .and_then(non_empty)
        .unwrap_or(kind.default_base_url())
        .trim_end_matches('/')
        .to_string();

    Ok(ResolvedProvider {
        kind,
        model: model.to_string(),
        api_key,
        base_url,
        timeout: Duration::from_secs(settings.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    })
}

/// Resolve and bind an HTTP client in one step.
pub fn connect(name: &str, providers: &BTreeMap<String, ProviderSettings>) -> Result<LlmClient> {
    let provider = resolve(name, providers)?;
    tracing::debug!(
        provider = %provider.kind,
        model = %provider.model,
        base_url = %provider.base_url,
        "resolved provider"
    );
    LlmClient::new(provider)
}

fn non_empty(s: &str) -> Option<&str> {
    let t = s.trim();
    (!t.is_empty()).then_some(t)
}
