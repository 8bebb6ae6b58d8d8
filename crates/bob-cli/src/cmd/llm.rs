use crate::output::{print_json, print_table};
use anyhow::Context;
use bob_core::config::{LlmConfig, ProjectConfig, WarnLevel};
use bob_core::paths;
use bob_llm::{ProviderKind, ProviderSettings};
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum LlmSubcommand {
    /// Write llm_config.json with default provider settings
    Init {
        /// Overwrite an existing llm_config.json
        #[arg(long)]
        force: bool,
    },

    /// Set one provider setting (model, api_key, base_url, timeout_seconds)
    Set {
        provider: String,
        key: String,
        value: String,
    },

    /// Show provider settings (API keys are masked)
    Get { provider: Option<String> },

    /// Make a provider the active one
    Use { provider: String },

    /// Check that the active provider is usable, without calling it
    Test,
}

pub fn run(
    root: &Path,
    subcmd: LlmSubcommand,
    provider: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        LlmSubcommand::Init { force } => init(root, force, json),
        LlmSubcommand::Set {
            provider,
            key,
            value,
        } => set(root, &provider, &key, &value, json),
        LlmSubcommand::Get { provider } => get(root, provider.as_deref(), json),
        LlmSubcommand::Use { provider } => use_provider(root, &provider, json),
        LlmSubcommand::Test => test(root, provider, json),
    }
}

fn load(root: &Path) -> anyhow::Result<LlmConfig> {
    LlmConfig::load(root).context("failed to load llm_config.json")
}

fn save(root: &Path, config: &LlmConfig) -> anyhow::Result<()> {
    config.save(root).context("failed to save llm_config.json")
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn init(root: &Path, force: bool, json: bool) -> anyhow::Result<()> {
    let path = paths::llm_config_path(root);
    let written = force || !path.exists();
    if written {
        save(root, &LlmConfig::default())?;
    }

    if json {
        return print_json(&serde_json::json!({
            "path": path.display().to_string(),
            "written": written,
        }));
    }
    if written {
        println!("Wrote default provider settings to {}", paths::LLM_CONFIG_FILE);
    } else {
        println!(
            "{} already exists (use --force to overwrite)",
            paths::LLM_CONFIG_FILE
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// set
// ---------------------------------------------------------------------------

fn set(root: &Path, provider: &str, key: &str, value: &str, json: bool) -> anyhow::Result<()> {
    let mut config = load(root)?;
    let kind = config.set_value(provider, key, value)?;
    save(root, &config)?;

    let shown = if key == "api_key" {
        config.providers[kind.as_str()].masked_api_key()
    } else {
        value.to_string()
    };
    if json {
        return print_json(&serde_json::json!({
            "provider": kind.as_str(),
            "key": key,
            "value": shown,
        }));
    }
    println!("{kind}.{key} = {shown}");
    Ok(())
}

// ---------------------------------------------------------------------------
// get
// ---------------------------------------------------------------------------

#[derive(serde::Serialize)]
struct ProviderView<'a> {
    provider: &'a str,
    active: bool,
    model: &'a str,
    api_key: String,
    base_url: String,
    timeout_seconds: Option<u64>,
}

fn view<'a>(name: &'a str, settings: &'a ProviderSettings, active: &str) -> ProviderView<'a> {
    let base_url = settings.base_url.clone().unwrap_or_else(|| {
        name.parse::<ProviderKind>()
            .map(|k| k.default_base_url().to_string())
            .unwrap_or_default()
    });
    ProviderView {
        provider: name,
        active: name == active,
        model: &settings.model,
        api_key: settings.masked_api_key(),
        base_url,
        timeout_seconds: settings.timeout_seconds,
    }
}

fn get(root: &Path, provider: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = load(root)?;
    let active = super::provider_name(root, None)?;

    let views: Vec<ProviderView<'_>> = match provider {
        Some(name) => {
            let kind: ProviderKind = name.parse()?;
            let settings = config.providers.get(kind.as_str()).ok_or_else(|| {
                bob_llm::LlmError::ProviderNotConfigured(kind.to_string())
            })?;
            vec![view(kind.as_str(), settings, &active)]
        }
        None => config
            .providers
            .iter()
            .map(|(name, s)| view(name, s, &active))
            .collect(),
    };

    if json {
        return print_json(&views);
    }
    let rows = views
        .iter()
        .map(|v| {
            vec![
                if v.active { "*" } else { "" }.to_string(),
                v.provider.to_string(),
                v.model.to_string(),
                v.api_key.clone(),
                v.base_url.clone(),
                v.timeout_seconds.map(|t| format!("{t}s")).unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["", "PROVIDER", "MODEL", "API KEY", "BASE URL", "TIMEOUT"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// use
// ---------------------------------------------------------------------------

fn use_provider(root: &Path, provider: &str, json: bool) -> anyhow::Result<()> {
    let mut config = load(root)?;
    let kind = config.use_provider(provider)?;
    save(root, &config)?;

    // The project setting outranks llm_config.json, so keep both in step.
    let mut project_updated = false;
    if let Some(mut project) =
        ProjectConfig::load_optional(root).context("failed to load bob_config.json")?
    {
        project.set_ai_provider(kind.as_str())?;
        project.save(root).context("failed to save bob_config.json")?;
        project_updated = true;
    }

    if json {
        return print_json(&serde_json::json!({
            "ai_provider": kind.as_str(),
            "project_config_updated": project_updated,
        }));
    }
    println!("Active provider is now '{kind}'.");
    Ok(())
}

// ---------------------------------------------------------------------------
// test
// ---------------------------------------------------------------------------

fn test(root: &Path, provider: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = load(root)?;
    let active = super::provider_name(root, provider)?;
    let warnings = config.validate(&active);

    if json {
        print_json(&serde_json::json!({
            "provider": active,
            "warnings": warnings,
        }))?;
    } else if warnings.is_empty() {
        println!("Provider '{active}' is configured.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("provider '{active}' is not usable");
    }
    Ok(())
}
