pub mod build;
pub mod chat;
pub mod config;
pub mod design;
pub mod init;
pub mod llm;
pub mod objectives;
pub mod stories;

use crate::interact::Console;
use anyhow::Context;
use bob_core::config::{active_provider, LlmConfig, ProjectConfig};
use bob_core::stage::{Refinable, StageDocument};
use bob_core::{workflow, BobError};
use bob_llm::{Complete, LlmClient};
use std::io::{BufRead, Write};
use std::path::Path;

/// Name of the provider in effect for this invocation.
pub fn provider_name(root: &Path, explicit: Option<&str>) -> anyhow::Result<String> {
    let project = ProjectConfig::load_optional(root).context("failed to load bob_config.json")?;
    let llm = LlmConfig::load(root).context("failed to load llm_config.json")?;
    Ok(active_provider(explicit, project.as_ref(), &llm))
}

/// Resolve and bind the active provider. Fails before any prompt is sent.
pub fn open_provider(root: &Path, explicit: Option<&str>) -> anyhow::Result<LlmClient> {
    let name = provider_name(root, explicit)?;
    let llm = LlmConfig::load(root).context("failed to load llm_config.json")?;
    let client = bob_llm::connect(&name, &llm.providers)
        .with_context(|| format!("cannot use provider '{name}'"))?;
    tracing::debug!(provider = %client.kind(), model = client.model(), "provider ready");
    Ok(client)
}

// ---------------------------------------------------------------------------
// Refinement helpers shared by `stories` and `design`
// ---------------------------------------------------------------------------

/// Offer refinement rounds on a freshly generated entry until the user
/// declines. A failed round is reported and the entry is left as it was.
/// Returns the number of rounds added.
pub fn refine_interactively<E, R, W>(
    console: &mut Console<R, W>,
    entry: &mut E,
    llm: &dyn Complete,
) -> anyhow::Result<usize>
where
    E: Refinable,
    R: BufRead,
    W: Write,
{
    let mut rounds = 0;
    while console.confirm(&format!("\nWould you like to refine the {}?", E::SUBJECT))? {
        let Some(feedback) = console.ask_required("What would you like to clarify or modify? ")?
        else {
            break;
        };
        match workflow::refine(entry, &feedback, llm) {
            Ok(r) => {
                rounds += 1;
                console.say(&format!("\n{}", r.refined_result))?;
            }
            Err(e) => {
                tracing::warn!(error = %e, "refinement failed");
                console.say(&format!("error: {e}"))?;
            }
        }
    }
    Ok(rounds)
}

/// Refine the entry at 1-based `index` (default: latest) of a stage document
/// and save it. Nothing is written if the provider call fails.
pub fn refine_saved<D>(
    root: &Path,
    index: Option<usize>,
    feedback: &str,
    provider: Option<&str>,
    json: bool,
    missing: BobError,
) -> anyhow::Result<()>
where
    D: StageDocument,
    D::Entry: Refinable,
{
    if feedback.trim().is_empty() {
        anyhow::bail!("refinement feedback must not be empty");
    }
    let mut doc = D::load(root).with_context(|| format!("failed to load {}", D::STAGE))?;
    if doc.entries().is_empty() {
        return Err(missing.into());
    }
    let index = index.unwrap_or(doc.entries().len());
    doc.entry_mut(index)?;

    let llm = open_provider(root, provider)?;
    let refined = workflow::refine(doc.entry_mut(index)?, feedback, &llm)?.clone();
    doc.touch();
    doc.save(root)
        .with_context(|| format!("failed to save {}", D::STAGE))?;
    tracing::debug!(stage = D::STAGE, index, "refinement saved");

    if json {
        return crate::output::print_json(&refined);
    }
    println!("Refined {} entry {index}:\n", D::STAGE);
    println!("{}", refined.refined_result);
    Ok(())
}
