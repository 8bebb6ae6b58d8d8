//! Provider-backed stage operations.
//!
//! Each function builds the prompt, calls the provider, and returns the new
//! entry (or appends the refinement) without touching disk. Callers persist
//! only after every provider call has succeeded.

use crate::design::DesignEntry;
use crate::error::{BobError, Result};
use crate::objective::Objective;
use crate::prompt;
use crate::stage::{Refinable, Refinement};
use crate::stories::UserStoryBatch;
use bob_llm::Complete;

/// Call the provider and reject blank output.
pub fn ask(llm: &dyn Complete, prompt: &str) -> Result<String> {
    let text = llm.complete(prompt)?;
    if text.trim().is_empty() {
        return Err(BobError::EmptyOutput);
    }
    Ok(text)
}

pub fn generate_user_stories(objectives: &[Objective], llm: &dyn Complete) -> Result<UserStoryBatch> {
    if objectives.is_empty() {
        return Err(BobError::NoObjectives);
    }
    let stories = ask(llm, &prompt::user_stories(objectives))?;
    Ok(UserStoryBatch::new(objectives.to_vec(), stories))
}

pub fn generate_design(
    objectives: &[Objective],
    batches: &[UserStoryBatch],
    llm: &dyn Complete,
) -> Result<DesignEntry> {
    if objectives.is_empty() {
        return Err(BobError::NoObjectives);
    }
    if batches.is_empty() {
        return Err(BobError::NoUserStories);
    }
    let design = ask(llm, &prompt::design(objectives, batches))?;
    Ok(DesignEntry::new(objectives.to_vec(), batches, design))
}

/// Revise the entry's current text. On provider failure the entry is left
/// unchanged.
pub fn refine<'a, E: Refinable>(
    entry: &'a mut E,
    feedback: &str,
    llm: &dyn Complete,
) -> Result<&'a Refinement> {
    let result = ask(llm, &prompt::refinement(entry, feedback))?;
    Ok(entry.add_refinement(feedback.to_string(), result))
}
