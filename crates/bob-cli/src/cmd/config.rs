use crate::interact::Console;
use crate::output::{print_json, print_table};
use anyhow::Context;
use bob_core::config::ProjectConfig;
use clap::Subcommand;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the project configuration
    Show,

    /// Change project settings
    Set {
        /// Provider used by default: ollama, openai, anthropic, or groq
        #[arg(long)]
        ai_provider: Option<String>,

        /// Maximum test retries (at least 1)
        #[arg(long)]
        max_retries: Option<u32>,
    },

    /// Restore the default provider and retry count
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Set {
            ai_provider,
            max_retries,
        } => set(root, ai_provider.as_deref(), max_retries, json),
        ConfigSubcommand::Reset { yes } => reset(root, yes, json),
    }
}

fn load(root: &Path) -> anyhow::Result<ProjectConfig> {
    ProjectConfig::load(root).context("failed to load bob_config.json")
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = load(root)?;
    if json {
        return print_json(&config);
    }
    let rows = config
        .entries()
        .into_iter()
        .map(|(k, v)| vec![k.to_string(), v])
        .collect();
    print_table(&["KEY", "VALUE"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// set
// ---------------------------------------------------------------------------

fn set(
    root: &Path,
    ai_provider: Option<&str>,
    max_retries: Option<u32>,
    json: bool,
) -> anyhow::Result<()> {
    if ai_provider.is_none() && max_retries.is_none() {
        anyhow::bail!("nothing to set: pass --ai-provider and/or --max-retries");
    }
    let mut config = load(root)?;
    if let Some(p) = ai_provider {
        config.set_ai_provider(p)?;
    }
    if let Some(n) = max_retries {
        config.set_max_test_retries(n)?;
    }
    config.save(root).context("failed to save bob_config.json")?;

    if json {
        return print_json(&config);
    }
    if ai_provider.is_some() {
        println!("ai_provider set to '{}'.", config.ai_provider);
    }
    if max_retries.is_some() {
        println!("max_test_retries set to {}.", config.max_test_retries);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// reset
// ---------------------------------------------------------------------------

fn reset(root: &Path, yes: bool, json: bool) -> anyhow::Result<()> {
    let mut config = load(root)?;
    if !yes && !Console::stdio().confirm("Reset configuration to defaults?")? {
        println!("Aborted.");
        return Ok(());
    }
    config.reset();
    config.save(root).context("failed to save bob_config.json")?;

    if json {
        return print_json(&config);
    }
    println!("Configuration reset to defaults.");
    Ok(())
}
