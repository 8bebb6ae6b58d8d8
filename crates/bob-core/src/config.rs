use crate::error::{BobError, Result};
use crate::paths;
use bob_llm::{ProviderKind, ProviderSettings};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_MAX_TEST_RETRIES: u32 = 3;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_TEST_RETRIES
}

fn validate_max_retries(value: u32) -> Result<u32> {
    if value < 1 {
        return Err(BobError::InvalidConfigValue {
            key: "max_test_retries".to_string(),
            value: value.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// ProjectConfig (bob_config.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub project_name: String,
    #[serde(default, deserialize_with = "crate::timestamp::option::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    /// Carried for compatibility; no command retries provider calls.
    #[serde(default = "default_max_retries")]
    pub max_test_retries: u32,
    #[serde(default = "default_project_provider")]
    pub ai_provider: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_platform")]
    pub platform: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_project_provider() -> String {
    ProviderKind::Ollama.to_string()
}

fn default_language() -> String {
    "python".to_string()
}

fn default_platform() -> String {
    "linux".to_string()
}

impl ProjectConfig {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            created_at: Some(Utc::now()),
            version: default_version(),
            description: String::new(),
            author: String::new(),
            max_test_retries: DEFAULT_MAX_TEST_RETRIES,
            ai_provider: default_project_provider(),
            language: default_language(),
            platform: default_platform(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        Self::load_optional(root)?.ok_or(BobError::NotInitialized)
    }

    /// `None` when the project has not been initialized.
    pub fn load_optional(root: &Path) -> Result<Option<Self>> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: ProjectConfig = serde_json::from_str(&data)?;
        Ok(Some(cfg))
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_json::to_string_pretty(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn set_ai_provider(&mut self, name: &str) -> Result<ProviderKind> {
        let kind: ProviderKind = name.parse()?;
        self.ai_provider = kind.to_string();
        Ok(kind)
    }

    pub fn set_max_test_retries(&mut self, value: u32) -> Result<()> {
        self.max_test_retries = validate_max_retries(value)?;
        Ok(())
    }

    /// Restore provider and retry defaults. Everything else is kept.
    pub fn reset(&mut self) {
        self.max_test_retries = DEFAULT_MAX_TEST_RETRIES;
        self.ai_provider = default_project_provider();
    }

    /// Display order used by `bob config show`.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("project_name", self.project_name.clone()),
            (
                "created_at",
                self.created_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
            ),
            ("version", self.version.clone()),
            ("description", self.description.clone()),
            ("author", self.author.clone()),
            ("max_test_retries", self.max_test_retries.to_string()),
            ("ai_provider", self.ai_provider.clone()),
            ("language", self.language.clone()),
            ("platform", self.platform.clone()),
        ]
    }
}

// ---------------------------------------------------------------------------
// LlmConfig (llm_config.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Carried for compatibility; no command retries provider calls.
    #[serde(default = "default_max_retries")]
    pub max_test_retries: u32,
    #[serde(default = "default_llm_provider")]
    pub ai_provider: String,
    #[serde(default = "default_providers")]
    pub providers: BTreeMap<String, ProviderSettings>,
}

fn default_llm_provider() -> String {
    ProviderKind::OpenAi.to_string()
}

fn default_providers() -> BTreeMap<String, ProviderSettings> {
    ProviderKind::all()
        .iter()
        .map(|&k| (k.to_string(), ProviderSettings::for_kind(k)))
        .collect()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            max_test_retries: DEFAULT_MAX_TEST_RETRIES,
            ai_provider: default_llm_provider(),
            providers: default_providers(),
        }
    }
}

/// Keys accepted by [`LlmConfig::set_value`].
pub const PROVIDER_KEYS: &[&str] = &["model", "api_key", "base_url", "timeout_seconds"];

impl LlmConfig {
    /// Defaults when `llm_config.json` is absent; a malformed file is an error.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::llm_config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: LlmConfig = serde_json::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::llm_config_path(root);
        let data = serde_json::to_string_pretty(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    fn settings_mut(&mut self, kind: ProviderKind) -> &mut ProviderSettings {
        self.providers
            .entry(kind.to_string())
            .or_insert_with(|| ProviderSettings::for_kind(kind))
    }

    /// Set one provider key. Unknown providers and keys are rejected.
    pub fn set_value(&mut self, provider: &str, key: &str, value: &str) -> Result<ProviderKind> {
        let kind: ProviderKind = provider.parse()?;
        let settings = self.settings_mut(kind);
        match key {
            "model" => settings.model = value.to_string(),
            "api_key" => settings.api_key = value.to_string(),
            "base_url" | "ollama_base_url" => {
                let v = value.trim();
                settings.base_url = (!v.is_empty()).then(|| v.to_string());
            }
            "timeout_seconds" => {
                let secs = value
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|s| *s > 0)
                    .ok_or_else(|| BobError::InvalidConfigValue {
                        key: key.to_string(),
                        value: value.to_string(),
                        reason: "must be a positive number of seconds".to_string(),
                    })?;
                settings.timeout_seconds = Some(secs);
            }
            other => {
                return Err(BobError::UnknownConfigKey {
                    key: other.to_string(),
                    valid: PROVIDER_KEYS.join(", "),
                })
            }
        }
        Ok(kind)
    }

    /// Make `provider` the active one, creating default settings if needed.
    pub fn use_provider(&mut self, provider: &str) -> Result<ProviderKind> {
        let kind: ProviderKind = provider.parse()?;
        self.settings_mut(kind);
        self.ai_provider = kind.to_string();
        Ok(kind)
    }

    pub fn validate(&self, active: &str) -> Vec<ConfigWarning> {
        self.validate_with_env(active, |var| std::env::var(var).ok())
    }

    /// Check that `active` would resolve, without any network traffic.
    pub fn validate_with_env<F>(&self, active: &str, env: F) -> Vec<ConfigWarning>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        if let Err(e) = bob_llm::resolve_with_env(active, &self.providers, env) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: e.to_string(),
            });
        }

        for name in self.providers.keys() {
            if name.parse::<ProviderKind>().is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("unknown provider '{name}' in providers is ignored"),
                });
            }
        }

        if self.max_test_retries < 1 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "max_test_retries must be at least 1".to_string(),
            });
        } else if self.max_test_retries > 10 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "max_test_retries={} (>10 is unusual)",
                    self.max_test_retries
                ),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Active provider
// ---------------------------------------------------------------------------

/// Provider name in effect: explicit override, then the project config,
/// then the LLM config.
pub fn active_provider(
    explicit: Option<&str>,
    project: Option<&ProjectConfig>,
    llm: &LlmConfig,
) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| project.map(|p| p.ai_provider.clone()))
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| llm.ai_provider.clone())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
