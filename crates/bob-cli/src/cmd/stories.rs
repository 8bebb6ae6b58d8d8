use super::{open_provider, refine_interactively, refine_saved};
use crate::interact::Console;
use crate::output::{print_json, short_time};
use anyhow::Context;
use bob_core::objective::ObjectivesDoc;
use bob_core::stage::{Refinable, StageDocument};
use bob_core::stories::UserStoriesDoc;
use bob_core::{workflow, BobError};
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum StoriesSubcommand {
    /// Generate a new batch of user stories from the current objectives
    Generate {
        /// Save the generated stories without offering refinement
        #[arg(long)]
        no_interactive: bool,
    },

    /// Show every generated batch with its latest text
    List,

    /// Revise a batch with feedback
    Refine {
        #[arg(required = true)]
        feedback: Vec<String>,

        /// 1-based batch number (default: latest)
        #[arg(long)]
        batch: Option<usize>,
    },
}

pub fn run(
    root: &Path,
    subcmd: StoriesSubcommand,
    provider: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        StoriesSubcommand::Generate { no_interactive } => {
            generate(root, provider, !no_interactive && !json, json)
        }
        StoriesSubcommand::List => list(root, json),
        StoriesSubcommand::Refine { feedback, batch } => refine_saved::<UserStoriesDoc>(
            root,
            batch,
            &feedback.join(" "),
            provider,
            json,
            BobError::NoUserStories,
        ),
    }
}

fn generate(
    root: &Path,
    provider: Option<&str>,
    interactive: bool,
    json: bool,
) -> anyhow::Result<()> {
    let objectives = ObjectivesDoc::load(root).context("failed to load bob_objectives.yaml")?;
    if objectives.objectives.is_empty() {
        return Err(BobError::NoObjectives.into());
    }
    let llm = open_provider(root, provider)?;

    if !json {
        println!(
            "Generating user stories from {} objective(s)...",
            objectives.objectives.len()
        );
    }
    let mut batch = workflow::generate_user_stories(&objectives.objectives, &llm)?;

    if interactive {
        println!("\n{}", batch.stories);
        refine_interactively(&mut Console::stdio(), &mut batch, &llm)?;
    }

    let mut doc = UserStoriesDoc::load(root).context("failed to load bob_userstories.yaml")?;
    doc.append(batch);
    doc.save(root).context("failed to save bob_userstories.yaml")?;
    let saved = doc.user_stories.len();
    tracing::debug!(batch = saved, "user stories saved");

    if json {
        return print_json(&doc.user_stories[saved - 1]);
    }
    if !interactive {
        println!("\n{}", doc.user_stories[saved - 1].current_text());
    }
    println!("\nSaved as batch {saved} in bob_userstories.yaml");
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let doc = UserStoriesDoc::load(root).context("failed to load bob_userstories.yaml")?;
    if json {
        return print_json(&doc.user_stories);
    }
    if doc.user_stories.is_empty() {
        println!("No user stories yet. Run 'bob stories generate'.");
        return Ok(());
    }
    for (i, batch) in doc.user_stories.iter().enumerate() {
        println!(
            "Batch {}  generated {}  objectives: {}  refinements: {}",
            i + 1,
            short_time(&batch.generated_at),
            batch.objectives_snapshot.len(),
            batch.refined_stories.len()
        );
        println!("{}\n", batch.current_text().trim_end());
    }
    Ok(())
}
